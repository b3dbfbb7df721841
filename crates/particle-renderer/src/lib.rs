//! # Particle Renderer
//!
//! GPU backend for the particle canvas: records the simulation's draw calls
//! into batches and paints them onto a persistent texture.

pub mod batch;
pub mod renderer;
pub mod viewport;

pub use batch::*;
pub use renderer::*;
pub use viewport::*;
