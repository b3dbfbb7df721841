//! # Particle Physics
//!
//! Kinematics and force response for the circular bodies of the 2D particle
//! field: gravity, quadratic drag, wall collisions, softened pairwise
//! attraction/repulsion and the pointer explosion.

pub mod color;
pub mod constants;
pub mod forces;
pub mod particle;

pub use color::*;
pub use constants::*;
pub use forces::*;
pub use particle::*;

/// Re-exported so downstream crates share one vector type.
pub use glam::Vec2;
