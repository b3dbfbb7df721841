//! Straight-alpha colours and the particle palette

use bytemuck::{Pod, Zeroable};

/// RGBA colour with normalized channels, alpha not premultiplied.
///
/// Laid out for direct upload into GPU vertex and instance buffers.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgba(0, 0, 0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0.0);

    /// Build a colour from 8-bit channels and a `[0, 1]` alpha, the way a
    /// CSS `rgba(r, g, b, a)` literal is written.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Same colour with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Earth-tone palette new particles are coloured from
pub const PALETTE: [Rgba; 5] = [
    Rgba::rgba(142, 106, 63, 0.6),
    Rgba::rgba(113, 98, 83, 0.6),
    Rgba::rgba(94, 75, 60, 0.6),
    Rgba::rgba(66, 92, 73, 0.6),
    Rgba::rgba(152, 151, 100, 0.6),
];

/// Stroke colour of the proximity connections; alpha comes from settings
pub const CONNECTION_COLOR: Rgba = Rgba::rgba(73, 35, 209, 1.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_normalizes_channels() {
        let c = Rgba::rgba(255, 0, 51, 0.5);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.2, 0.5]);
    }

    #[test]
    fn test_with_alpha_keeps_channels() {
        let c = CONNECTION_COLOR.with_alpha(0.3);
        assert_eq!(c.r, CONNECTION_COLOR.r);
        assert_eq!(c.b, CONNECTION_COLOR.b);
        assert_eq!(c.a, 0.3);
    }
}
