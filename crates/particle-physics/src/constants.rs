//! Simulation constants
//!
//! Time steps are fixed: the frame loop advances one logical step per tick
//! regardless of how much wall time actually elapsed.

/// Logical time step of one tick (60 ticks per simulated second)
pub const FRAME_DT: f32 = 1.0 / 60.0;

/// Time step used when converting pairwise forces into impulses.
/// Independent of the `dt` handed to [`crate::Particle::update`].
pub const INTERACTION_DT: f32 = 1.0 / 60.0;

/// Exponent of the explosion falloff curve `1 - (d/r)^n`
pub const EXPLOSION_FALLOFF_EXPONENT: i32 = 4;
