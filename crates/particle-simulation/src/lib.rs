//! # Particle Simulation
//!
//! CPU particle system for the 2D particle field: owns the particle
//! collection, advances it one fixed tick at a time and emits canvas drawing
//! commands. The host supplies the drawing surface, pointer state and
//! settings on every tick and decides when the next tick runs.

pub mod canvas;
pub mod controls;
pub mod input;
pub mod params;
pub mod simulation;

pub use canvas::*;
pub use controls::*;
pub use input::*;
pub use params::*;
pub use simulation::*;
