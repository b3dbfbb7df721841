//! Pointer capture
//!
//! Event callbacks write here between ticks, each tick reads it once.

use glam::Vec2;

/// Latest pointer position (canvas-local) and whether the button is held
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub pressed: bool,
}

impl PointerState {
    pub fn moved(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Pointer left the canvas: a held button no longer counts
    pub fn leave(&mut self) {
        self.pressed = false;
    }
}
