//! Drawing surface abstraction
//!
//! The simulation draws through [`DrawContext`] using canvas-style pixel
//! coordinates: origin top-left, y pointing down. Calls are immediate and
//! ordered; later calls paint over earlier ones.

use glam::Vec2;
use particle_physics::Rgba;

/// Axis-aligned rectangle in canvas pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Rectangle covering a whole canvas of the given size
    pub fn from_size(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

/// Line segment between two canvas points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

/// 2D drawing primitives offered by the host surface
pub trait DrawContext {
    /// Current canvas size in pixels
    fn size(&self) -> Vec2;

    /// Reset the area to fully transparent
    fn clear_rect(&mut self, rect: Rect);

    /// Blend a solid rectangle over the area
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Stroke all segments as one path with a single colour
    fn stroke_segments(&mut self, segments: &[Segment], color: Rgba);

    /// Fill a disc
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
}

/// A recorded [`DrawContext`] call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    ClearRect(Rect),
    FillRect(Rect, Rgba),
    StrokeSegments(Vec<Segment>, Rgba),
    FillCircle { center: Vec2, radius: f32, color: Rgba },
}

/// Surface that only remembers what was drawn.
///
/// Useful for headless runs and for asserting on a tick's output.
#[derive(Clone, Debug, Default)]
pub struct CommandRecorder {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand out the recorded commands and start over
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawContext for CommandRecorder {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClearRect(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn stroke_segments(&mut self, segments: &[Segment], color: Rgba) {
        self.commands
            .push(DrawCommand::StrokeSegments(segments.to_vec(), color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }
}
