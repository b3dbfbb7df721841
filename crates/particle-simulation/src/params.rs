//! Tunable simulation settings

use particle_physics::{ExplosionSettings, InteractionSettings, MotionSettings};

/// Every knob of the simulation in one flat record.
///
/// The host owns the instance and hands it to each tick; changes made
/// between ticks are picked up by the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    // Population
    pub particle_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub initial_velocity: f32,

    // Forces
    pub attract_constant: f32,
    pub interaction_radius: f32,
    pub smoothing_factor: f32,
    pub gravity: f32,
    pub drag_constant: f32,
    pub elasticity: f32,

    // Pointer explosion
    pub explosion_radius: f32,
    pub explosion_force: f32,

    // Rendering
    pub connection_opacity: f32,
    pub trail_opacity: f32,
    pub trail_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particle_count: 1200,
            min_radius: 1.0,
            max_radius: 4.0,
            initial_velocity: 2.0,

            attract_constant: -900.0,
            interaction_radius: 100.0,
            smoothing_factor: 0.2,
            gravity: 0.0,
            drag_constant: 0.13,
            elasticity: 0.3,

            explosion_radius: 200.0,
            explosion_force: 25.0,

            connection_opacity: 0.3,
            trail_opacity: 0.1,
            trail_enabled: true,
        }
    }
}

impl Settings {
    pub fn motion(&self) -> MotionSettings {
        MotionSettings {
            gravity: self.gravity,
            drag_constant: self.drag_constant,
            elasticity: self.elasticity,
        }
    }

    pub fn interaction(&self) -> InteractionSettings {
        InteractionSettings {
            attract_constant: self.attract_constant,
            interaction_radius: self.interaction_radius,
            smoothing_factor: self.smoothing_factor,
        }
    }

    pub fn explosion(&self) -> ExplosionSettings {
        ExplosionSettings {
            explosion_radius: self.explosion_radius,
            explosion_force: self.explosion_force,
        }
    }
}
