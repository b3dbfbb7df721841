//! Particle state and per-step motion

use std::f32::consts::PI;

use glam::Vec2;

use crate::color::Rgba;

/// Settings consumed by [`Particle::update`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSettings {
    /// Downward acceleration (canvas y grows downwards)
    pub gravity: f32,
    /// Quadratic drag coefficient
    pub drag_constant: f32,
    /// Fraction of the normal velocity kept after a wall bounce, 0..=1
    pub elasticity: f32,
}

/// A circular body moving inside the canvas
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Area of the disc, `π·r²`. Fixed at construction.
    pub mass: f32,
    pub color: Rgba,
    /// Colour the particle was created with, kept for recolouring
    pub original_color: Rgba,
    /// Reserved for cluster aggregation. Nothing reads or writes it yet.
    pub cluster_mass: Option<f32>,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            position,
            velocity,
            radius,
            mass: PI * radius * radius,
            color,
            original_color: color,
            cluster_mass: None,
        }
    }

    /// Advance one step: gravity, drag, Euler integration, then wall bounces
    /// against the box `[0, bounds.x] × [0, bounds.y]`.
    pub fn update(&mut self, bounds: Vec2, dt: f32, settings: &MotionSettings) {
        self.velocity.y += settings.gravity * dt;

        self.apply_drag(settings.drag_constant, dt);

        self.position += self.velocity * dt;

        self.collide_with_walls(bounds, settings.elasticity);
    }

    /// Quadratic drag opposing the direction of travel.
    ///
    /// One explicit step: when `drag_force / mass · dt` exceeds the current
    /// speed the velocity overshoots and points backwards.
    fn apply_drag(&mut self, drag_constant: f32, dt: f32) {
        let speed = self.velocity.length();
        if speed > 0.0 {
            let drag_force = drag_constant * speed * speed;
            self.velocity -= self.velocity / speed * (drag_force / self.mass * dt);
        }
    }

    fn collide_with_walls(&mut self, bounds: Vec2, elasticity: f32) {
        if self.position.x - self.radius < 0.0 {
            self.position.x = self.radius;
            self.velocity.x = self.velocity.x.abs() * elasticity;
        } else if self.position.x + self.radius > bounds.x {
            self.position.x = bounds.x - self.radius;
            self.velocity.x = -self.velocity.x.abs() * elasticity;
        }

        if self.position.y - self.radius < 0.0 {
            self.position.y = self.radius;
            self.velocity.y = self.velocity.y.abs() * elasticity;
        } else if self.position.y + self.radius > bounds.y {
            self.position.y = bounds.y - self.radius;
            self.velocity.y = -self.velocity.y.abs() * elasticity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PALETTE;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn still() -> MotionSettings {
        MotionSettings {
            gravity: 0.0,
            drag_constant: 0.0,
            elasticity: 0.5,
        }
    }

    #[test]
    fn test_mass_is_disc_area() {
        let p = Particle::new(Vec2::ZERO, Vec2::ZERO, 2.0, PALETTE[0]);
        assert!((p.mass - 4.0 * PI).abs() < 1e-5);
        assert_eq!(p.original_color, p.color);
        assert_eq!(p.cluster_mass, None);
    }

    #[test]
    fn test_gravity_accelerates_downwards() {
        let mut p = Particle::new(Vec2::new(400.0, 300.0), Vec2::ZERO, 1.0, PALETTE[0]);
        let settings = MotionSettings {
            gravity: 60.0,
            ..still()
        };
        p.update(BOUNDS, 0.5, &settings);
        assert_eq!(p.velocity, Vec2::new(0.0, 30.0));
        assert_eq!(p.position, Vec2::new(400.0, 315.0));
    }

    #[test]
    fn test_left_wall_reflects_with_elasticity() {
        let mut p = Particle::new(Vec2::new(5.0, 300.0), Vec2::new(-10.0, 0.0), 3.0, PALETTE[0]);
        p.update(BOUNDS, 1.0, &still());
        assert_eq!(p.position.x, 3.0);
        assert_eq!(p.velocity.x, 5.0);
    }

    #[test]
    fn test_right_and_bottom_walls_mirror() {
        let mut p = Particle::new(
            Vec2::new(795.0, 595.0),
            Vec2::new(10.0, 20.0),
            2.0,
            PALETTE[1],
        );
        p.update(BOUNDS, 1.0, &still());
        assert_eq!(p.position, Vec2::new(798.0, 598.0));
        assert_eq!(p.velocity, Vec2::new(-5.0, -10.0));
    }

    #[test]
    fn test_top_wall_with_zero_elasticity_stops() {
        let mut p = Particle::new(Vec2::new(100.0, 2.0), Vec2::new(0.0, -30.0), 1.0, PALETTE[2]);
        let settings = MotionSettings {
            elasticity: 0.0,
            ..still()
        };
        p.update(BOUNDS, 1.0, &settings);
        assert_eq!(p.position.y, 1.0);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_drag_skipped_at_rest() {
        let mut p = Particle::new(Vec2::new(400.0, 300.0), Vec2::ZERO, 1.0, PALETTE[0]);
        let settings = MotionSettings {
            drag_constant: 1.0,
            ..still()
        };
        p.update(BOUNDS, 1.0 / 60.0, &settings);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert!(p.position.is_finite());
    }

    #[test]
    fn test_drag_decelerates_without_reversing() {
        // drag_constant · dt < 1 and speed < mass / (drag_constant · dt)
        let settings = MotionSettings {
            drag_constant: 0.5,
            ..still()
        };
        for v in [Vec2::new(3.0, -4.0), Vec2::new(-200.0, 150.0), Vec2::new(0.1, 0.0)] {
            let mut p = Particle::new(Vec2::new(400.0, 300.0), v, 1.0, PALETTE[0]);
            p.update(BOUNDS, 1.0 / 60.0, &settings);
            assert!(p.velocity.length() <= v.length());
            assert!(p.velocity.x * v.x >= 0.0);
            assert!(p.velocity.y * v.y >= 0.0);
        }
    }

    #[test]
    fn test_drag_magnitude() {
        // speed 10, r = 1 => mass π, loss = 0.1 * 100 / π * 0.1
        let mut p = Particle::new(Vec2::new(400.0, 300.0), Vec2::new(10.0, 0.0), 1.0, PALETTE[0]);
        let settings = MotionSettings {
            drag_constant: 0.1,
            ..still()
        };
        p.update(BOUNDS, 0.1, &settings);
        let expected = 10.0 - 1.0 / PI;
        assert!((p.velocity.x - expected).abs() < 1e-4);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_strong_drag_overshoots_at_high_speed() {
        // r = 1 => mass π, loss = 1.0 * 300² / π / 60 ≈ 477.46 > 300
        let mut p = Particle::new(Vec2::new(400.0, 300.0), Vec2::new(300.0, 0.0), 1.0, PALETTE[0]);
        let settings = MotionSettings {
            drag_constant: 1.0,
            ..still()
        };
        p.update(BOUNDS, 1.0 / 60.0, &settings);

        let expected = 300.0 - 90_000.0 / PI / 60.0;
        assert!(expected < 0.0);
        assert!((p.velocity.x - expected).abs() < 1e-2);
        assert_eq!(p.velocity.y, 0.0);
        assert!((p.position.x - (400.0 + expected / 60.0)).abs() < 1e-3);
    }
}
