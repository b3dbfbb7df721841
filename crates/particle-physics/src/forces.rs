//! Pairwise interaction and pointer explosion
//!
//! Both forces are applied as velocity impulses. The pair force is softened:
//! separations below `smoothing_factor · interaction_radius` are evaluated at
//! that floor, so the force stays bounded as two bodies overlap.

use glam::Vec2;

use crate::constants::{EXPLOSION_FALLOFF_EXPONENT, INTERACTION_DT};
use crate::particle::Particle;

/// Settings consumed by [`Particle::interact_with`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSettings {
    /// Signed coupling: positive attracts, negative repels
    pub attract_constant: f32,
    /// Pairs at or beyond this distance do not interact
    pub interaction_radius: f32,
    /// Softening floor as a fraction of `interaction_radius`
    pub smoothing_factor: f32,
}

impl InteractionSettings {
    /// Distance below which the force no longer grows
    pub fn smoothing_distance(&self) -> f32 {
        self.smoothing_factor * self.interaction_radius
    }
}

/// Settings consumed by [`Particle::apply_mouse_force`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionSettings {
    pub explosion_radius: f32,
    pub explosion_force: f32,
}

/// Softened inverse-square force exerted on `p1` by `p2`
/// F = k * m1 * m2 / max(r, s)²
///
/// Returns zero for coincident particles and for pairs outside the
/// interaction radius.
pub fn pair_force(p1: &Particle, p2: &Particle, settings: &InteractionSettings) -> Vec2 {
    let delta = p2.position - p1.position;
    let dist_sq = delta.length_squared();
    let radius_sq = settings.interaction_radius * settings.interaction_radius;

    if !(dist_sq > 0.0 && dist_sq < radius_sq) {
        return Vec2::ZERO;
    }

    let distance = dist_sq.sqrt();
    let smoothed = distance.max(settings.smoothing_distance());

    let force = settings.attract_constant * (p1.mass * p2.mass) / (smoothed * smoothed);
    delta * (force / smoothed)
}

/// Quartic falloff of the explosion: 1 at the pointer, 0 at the rim
pub fn explosion_falloff(dist: f32, radius: f32) -> f32 {
    1.0 - (dist / radius).powi(EXPLOSION_FALLOFF_EXPONENT)
}

impl Particle {
    /// Exchange equal and opposite impulses with `other`.
    ///
    /// Returns the force applied to `self`; `other` receives its negation.
    pub fn interact_with(&mut self, other: &mut Particle, settings: &InteractionSettings) -> Vec2 {
        let force = pair_force(self, other, settings);
        if force != Vec2::ZERO {
            self.velocity += force / self.mass * INTERACTION_DT;
            other.velocity -= force / other.mass * INTERACTION_DT;
        }
        force
    }

    /// Push the particle radially away from `pointer`.
    ///
    /// Only acts strictly inside the explosion radius. A particle sitting
    /// exactly on the pointer has no outward direction and is left alone.
    /// Returns the velocity change applied.
    pub fn apply_mouse_force(&mut self, pointer: Vec2, settings: &ExplosionSettings) -> Vec2 {
        let delta = self.position - pointer;
        let dist = delta.length();

        if dist <= 0.0 || dist >= settings.explosion_radius {
            return Vec2::ZERO;
        }

        let strength = settings.explosion_force * explosion_falloff(dist, settings.explosion_radius);
        let impulse = delta / dist * strength;
        self.velocity += impulse;
        impulse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PALETTE;

    fn interaction() -> InteractionSettings {
        InteractionSettings {
            attract_constant: 900.0,
            interaction_radius: 100.0,
            smoothing_factor: 0.2,
        }
    }

    fn at(x: f32, y: f32, radius: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, radius, PALETTE[0])
    }

    #[test]
    fn test_positive_constant_attracts() {
        let mut a = at(100.0, 100.0, 2.0);
        let mut b = at(150.0, 100.0, 2.0);
        a.interact_with(&mut b, &interaction());
        assert!(a.velocity.x > 0.0);
        assert!(b.velocity.x < 0.0);
    }

    #[test]
    fn test_negative_constant_repels() {
        let mut a = at(100.0, 100.0, 2.0);
        let mut b = at(150.0, 100.0, 2.0);
        let settings = InteractionSettings {
            attract_constant: -900.0,
            ..interaction()
        };
        a.interact_with(&mut b, &settings);
        assert!(a.velocity.x < 0.0);
        assert!(b.velocity.x > 0.0);
    }

    #[test]
    fn test_momentum_is_conserved() {
        let mut a = at(100.0, 100.0, 1.5);
        let mut b = at(130.0, 140.0, 3.5);
        let force = a.interact_with(&mut b, &interaction());
        assert_ne!(force, Vec2::ZERO);

        let momentum = a.velocity * a.mass + b.velocity * b.mass;
        assert!(momentum.length() < 1e-3);
        assert!((a.velocity * a.mass - force * INTERACTION_DT).length() < 1e-3);
    }

    #[test]
    fn test_coincident_particles_do_not_interact() {
        let mut a = at(100.0, 100.0, 2.0);
        let mut b = at(100.0, 100.0, 2.0);
        assert_eq!(a.interact_with(&mut b, &interaction()), Vec2::ZERO);
        assert_eq!(a.velocity, Vec2::ZERO);
        assert_eq!(b.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pairs_beyond_radius_do_not_interact() {
        let a = at(0.0, 0.0, 2.0);
        let b = at(100.0, 0.0, 2.0);
        assert_eq!(pair_force(&a, &b, &interaction()), Vec2::ZERO);
    }

    #[test]
    fn test_force_is_bounded_below_smoothing_distance() {
        let settings = interaction();
        let a = at(0.0, 0.0, 2.0);
        let floor = pair_force(&a, &at(settings.smoothing_distance(), 0.0, 2.0), &settings);

        for x in [0.001, 1.0, 5.0, 19.99] {
            let closer = pair_force(&a, &at(x, 0.0, 2.0), &settings);
            assert!(closer.length() <= floor.length() + 1e-3);
        }

        let outside = pair_force(&a, &at(40.0, 0.0, 2.0), &settings);
        assert!(outside.length() < floor.length());
    }

    fn explosion() -> ExplosionSettings {
        ExplosionSettings {
            explosion_radius: 200.0,
            explosion_force: 25.0,
        }
    }

    #[test]
    fn test_explosion_pushes_outward() {
        let mut p = at(150.0, 100.0, 2.0);
        let impulse = p.apply_mouse_force(Vec2::new(100.0, 100.0), &explosion());
        let expected = 25.0 * (1.0 - 0.25_f32.powi(4));
        assert!((impulse.x - expected).abs() < 1e-4);
        assert_eq!(impulse.y, 0.0);
        assert_eq!(p.velocity, impulse);
    }

    #[test]
    fn test_explosion_vanishes_at_rim() {
        assert_eq!(explosion_falloff(200.0, 200.0), 0.0);
        assert_eq!(explosion_falloff(0.0, 200.0), 1.0);

        let mut rim = at(300.0, 100.0, 2.0);
        assert_eq!(rim.apply_mouse_force(Vec2::new(100.0, 100.0), &explosion()), Vec2::ZERO);

        let mut outside = at(400.0, 100.0, 2.0);
        outside.apply_mouse_force(Vec2::new(100.0, 100.0), &explosion());
        assert_eq!(outside.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_explosion_ignores_particle_on_pointer() {
        let mut p = at(100.0, 100.0, 2.0);
        p.apply_mouse_force(Vec2::new(100.0, 100.0), &explosion());
        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pair_impulse_ignores_update_step() {
        use crate::particle::MotionSettings;

        let still = MotionSettings {
            gravity: 0.0,
            drag_constant: 0.0,
            elasticity: 1.0,
        };
        let bounds = Vec2::new(800.0, 600.0);

        let mut impulses = Vec::new();
        for dt in [1.0 / 60.0, 0.5] {
            let mut a = at(100.0, 100.0, 2.0);
            let mut b = at(140.0, 100.0, 3.0);
            a.update(bounds, dt, &still);
            b.update(bounds, dt, &still);

            let force = a.interact_with(&mut b, &interaction());
            assert!((a.velocity - force / a.mass * INTERACTION_DT).length() < 1e-6);
            assert!((b.velocity + force / b.mass * INTERACTION_DT).length() < 1e-6);
            impulses.push(a.velocity);
        }
        assert_eq!(impulses[0], impulses[1]);
    }
}
