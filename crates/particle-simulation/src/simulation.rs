//! Particle collection and the per-tick update/render cycle

use glam::Vec2;
use particle_physics::{Particle, Rgba, CONNECTION_COLOR, FRAME_DT, PALETTE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{DrawContext, Rect, Segment};
use crate::controls::{ControlError, ControlId, ControlValue, SettingChange};
use crate::input::PointerState;
use crate::params::Settings;

/// All particles of the field plus the random source used to (re)seed them
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    /// Populate a canvas of size `bounds` from an OS-seeded generator
    pub fn new(bounds: Vec2, settings: &Settings) -> Self {
        Self::from_rng(StdRng::from_os_rng(), bounds, settings)
    }

    /// Deterministic variant of [`ParticleSystem::new`]
    pub fn with_seed(bounds: Vec2, settings: &Settings, seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), bounds, settings)
    }

    fn from_rng(rng: StdRng, bounds: Vec2, settings: &Settings) -> Self {
        let mut system = Self {
            particles: Vec::new(),
            rng,
        };
        system.reinitialize(bounds, settings);
        system
    }

    /// Throw away every particle and spawn `settings.particle_count` new ones
    pub fn reinitialize(&mut self, bounds: Vec2, settings: &Settings) {
        let rng = &mut self.rng;
        self.particles = (0..settings.particle_count)
            .map(|_| spawn_particle(rng, bounds, settings))
            .collect();

        log::info!(
            "Initialized {} particles on a {}x{} canvas",
            self.particles.len(),
            bounds.x,
            bounds.y
        );
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance the physics by one fixed step.
    ///
    /// Particles are visited in index order. Each one is integrated, then
    /// interacts with every later particle, then feels the pointer if the
    /// button is held. Later particles therefore see impulses from earlier
    /// ones before their own integration.
    pub fn step(&mut self, bounds: Vec2, settings: &Settings, pointer: &PointerState) {
        let motion = settings.motion();
        let interaction = settings.interaction();
        let explosion = settings.explosion();

        for i in 0..self.particles.len() {
            let (head, tail) = self.particles.split_at_mut(i + 1);
            let particle = &mut head[i];

            particle.update(bounds, FRAME_DT, &motion);

            for other in tail.iter_mut() {
                particle.interact_with(other, &interaction);
            }

            if pointer.pressed {
                particle.apply_mouse_force(pointer.position, &explosion);
            }
        }
    }

    /// Segments joining every pair closer than the interaction radius
    pub fn connections(&self, settings: &Settings) -> Vec<Segment> {
        let radius_sq = settings.interaction_radius * settings.interaction_radius;
        let mut segments = Vec::new();

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                if a.position.distance_squared(b.position) < radius_sq {
                    segments.push(Segment {
                        from: a.position,
                        to: b.position,
                    });
                }
            }
        }

        segments
    }

    /// One frame: fade or clear the canvas, step the physics, then draw the
    /// connections and the particles on top.
    ///
    /// The canvas size is read from `ctx` every call, so a resized surface
    /// immediately moves the walls.
    pub fn tick(&mut self, settings: &Settings, pointer: &PointerState, ctx: &mut impl DrawContext) {
        let bounds = ctx.size();
        let full = Rect::from_size(bounds);

        if settings.trail_enabled {
            ctx.fill_rect(full, Rgba::BLACK.with_alpha(1.0 - settings.trail_opacity));
        } else {
            ctx.clear_rect(full);
            ctx.fill_rect(full, Rgba::BLACK);
        }

        self.step(bounds, settings, pointer);

        let segments = self.connections(settings);
        if !segments.is_empty() {
            ctx.stroke_segments(
                &segments,
                CONNECTION_COLOR.with_alpha(settings.connection_opacity),
            );
        }

        for particle in &self.particles {
            ctx.fill_circle(particle.position, particle.radius, particle.color);
        }
    }

    /// Apply a control change and rebuild the collection when the particle
    /// count moved.
    pub fn apply_control(
        &mut self,
        bounds: Vec2,
        settings: &mut Settings,
        id: ControlId,
        value: ControlValue,
    ) -> Result<SettingChange, ControlError> {
        let change = settings.apply(id, value)?;
        log::debug!("{} <- {}", id, value);

        if change == SettingChange::Reinitialize {
            self.reinitialize(bounds, settings);
        }
        Ok(change)
    }
}

fn spawn_particle(rng: &mut StdRng, bounds: Vec2, settings: &Settings) -> Particle {
    let position = Vec2::new(rng.random::<f32>() * bounds.x, rng.random::<f32>() * bounds.y);
    let velocity = Vec2::new(
        (rng.random::<f32>() - 0.5) * settings.initial_velocity,
        (rng.random::<f32>() - 0.5) * settings.initial_velocity,
    );
    let radius =
        settings.min_radius + rng.random::<f32>() * (settings.max_radius - settings.min_radius);
    let color = PALETTE[rng.random_range(0..PALETTE.len())];

    Particle::new(position, velocity, radius, color)
}
