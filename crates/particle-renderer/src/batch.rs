//! CPU-side recording of one frame's canvas calls
//!
//! [`FrameBatch`] implements the simulation's `DrawContext` by appending
//! vertices and instances to flat buffers. Consecutive calls of the same kind
//! are merged into one draw so painter's order is kept with few draw calls.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use particle_physics::Rgba;
use particle_simulation::{DrawContext, Rect, Segment};

/// Vertex of a rectangle triangle or a line segment
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ShapeVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One filled disc, expanded to a quad in the vertex shader
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Which pipeline and buffer a draw uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    /// Triangles written without blending
    Clear,
    /// Triangles alpha-blended over the canvas
    Fill,
    Lines,
    Circles,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawBatch {
    pub kind: DrawKind,
    /// Vertex range for shapes, instance range for circles
    pub range: Range<u32>,
}

/// Everything drawn during one tick, ready for upload
#[derive(Clone, Debug, Default)]
pub struct FrameBatch {
    size: Vec2,
    pub(crate) triangles: Vec<ShapeVertex>,
    pub(crate) lines: Vec<ShapeVertex>,
    pub(crate) circles: Vec<CircleInstance>,
    pub(crate) batches: Vec<DrawBatch>,
}

impl FrameBatch {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Extend the previous draw if it has the same kind, else start a new one
    fn push_range(&mut self, kind: DrawKind, range: Range<u32>) {
        if let Some(last) = self.batches.last_mut() {
            if last.kind == kind && last.range.end == range.start {
                last.range.end = range.end;
                return;
            }
        }
        self.batches.push(DrawBatch { kind, range });
    }

    fn push_quad(&mut self, kind: DrawKind, rect: Rect, color: Rgba) {
        let color = color.to_array();
        let (min, max) = (rect.min, rect.max());
        let corners = [
            [min.x, min.y],
            [max.x, min.y],
            [max.x, max.y],
            [min.x, min.y],
            [max.x, max.y],
            [min.x, max.y],
        ];

        let start = self.triangles.len() as u32;
        self.triangles.extend(corners.map(|position| ShapeVertex { position, color }));
        self.push_range(kind, start..self.triangles.len() as u32);
    }
}

impl DrawContext for FrameBatch {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.push_quad(DrawKind::Clear, rect, Rgba::TRANSPARENT);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.push_quad(DrawKind::Fill, rect, color);
    }

    fn stroke_segments(&mut self, segments: &[Segment], color: Rgba) {
        if segments.is_empty() {
            return;
        }
        let color = color.to_array();

        let start = self.lines.len() as u32;
        self.lines.reserve(segments.len() * 2);
        for segment in segments {
            self.lines.push(ShapeVertex {
                position: segment.from.to_array(),
                color,
            });
            self.lines.push(ShapeVertex {
                position: segment.to.to_array(),
                color,
            });
        }
        self.push_range(DrawKind::Lines, start..self.lines.len() as u32);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let start = self.circles.len() as u32;
        self.circles.push(CircleInstance {
            center: center.to_array(),
            radius,
            color: color.to_array(),
        });
        self.push_range(DrawKind::Circles, start..start + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_consecutive_circles_share_one_draw() {
        let mut batch = FrameBatch::new(SIZE);
        for i in 0..5 {
            batch.fill_circle(Vec2::splat(i as f32), 2.0, Rgba::BLACK);
        }
        assert_eq!(
            batch.batches(),
            &[DrawBatch {
                kind: DrawKind::Circles,
                range: 0..5,
            }]
        );
    }

    #[test]
    fn test_clear_and_fill_stay_separate_and_ordered() {
        let mut batch = FrameBatch::new(SIZE);
        let full = Rect::from_size(SIZE);
        batch.clear_rect(full);
        batch.fill_rect(full, Rgba::BLACK);

        let kinds: Vec<DrawKind> = batch.batches().iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![DrawKind::Clear, DrawKind::Fill]);
        assert_eq!(batch.batches()[1].range, 6..12);
        assert_eq!(batch.triangles[0].color, [0.0; 4]);
    }

    #[test]
    fn test_segments_become_vertex_pairs() {
        let mut batch = FrameBatch::new(SIZE);
        let segments = [
            Segment {
                from: Vec2::ZERO,
                to: Vec2::ONE,
            },
            Segment {
                from: Vec2::ONE,
                to: Vec2::new(5.0, 5.0),
            },
        ];
        batch.stroke_segments(&segments, Rgba::BLACK);
        batch.stroke_segments(&[], Rgba::BLACK);

        assert_eq!(batch.lines.len(), 4);
        assert_eq!(batch.batches().len(), 1);
        assert_eq!(batch.lines[3].position, [5.0, 5.0]);
    }

    #[test]
    fn test_instance_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<ShapeVertex>(), 24);
        assert_eq!(std::mem::size_of::<CircleInstance>(), 28);
    }
}
