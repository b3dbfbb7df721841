//! Pixel-space projection for the 2D canvas

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Viewport uniform for GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ViewportUniform {
    pub size: [f32; 2],
    pub _padding: [f32; 2],
}

/// Canvas-sized viewport: pixel (0, 0) is the top-left corner, y grows down
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Map a canvas pixel to normalized device coordinates.
    /// Mirrors `to_clip` in `canvas.wgsl`.
    pub fn to_ndc(&self, pixel: Vec2) -> Vec2 {
        let size = self.size();
        Vec2::new(pixel.x / size.x * 2.0 - 1.0, 1.0 - pixel.y / size.y * 2.0)
    }

    pub fn to_uniform(&self) -> ViewportUniform {
        ViewportUniform {
            size: self.size().to_array(),
            _padding: [0.0; 2],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_ndc() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(viewport.to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let mut viewport = Viewport::new(800, 600);
        viewport.resize(0, 0);
        assert_eq!(viewport.size(), Vec2::ONE);
    }
}
