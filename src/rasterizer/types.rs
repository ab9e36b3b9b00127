//! Core types for the rasterizer

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::math::{Vec2, Vec3};

/// Alpha below this is treated as a cut-out hole (alpha test)
pub const ALPHA_CUTOFF: u8 = 128;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque_alpha")]
    pub a: u8,
}

fn opaque_alpha() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    /// Fully transparent (never rendered)
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Check if this color fails the alpha test
    pub fn is_transparent(&self) -> bool {
        self.a < ALPHA_CUTOFF
    }

    /// Component-wise multiply, 255 = unchanged
    pub fn modulate(self, tint: Color) -> Self {
        Self {
            r: ((self.r as u16 * tint.r as u16) / 255) as u8,
            g: ((self.g as u16 * tint.g as u16) / 255) as u8,
            b: ((self.b as u16 * tint.b as u16) / 255) as u8,
            a: self.a,
        }
    }

    /// Scale RGB by a light value (0.0-1.0)
    pub fn shade(self, light: f32) -> Self {
        let l = light.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * l) as u8,
            g: (self.g as f32 * l) as u8,
            b: (self.b as f32 * l) as u8,
            a: self.a,
        }
    }

    /// Interpolate between two colors (RGB only, keeps self's alpha)
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;
        Self {
            r: (self.r as f32 * inv_t + other.r as f32 * t) as u8,
            g: (self.g as f32 * inv_t + other.g as f32 * t) as u8,
            b: (self.b as f32 * inv_t + other.b as f32 * t) as u8,
            a: self.a,
        }
    }

    /// Framebuffer bytes; anything that passed the alpha test is written opaque
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Shared RGBA texture sampled with nearest filtering
#[derive(Debug, Clone)]
pub struct Texture {
    image: Arc<RgbaImage>,
}

impl Texture {
    pub fn new(image: Arc<RgbaImage>) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Sample with wrapping UVs, v = 0 at the top row
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 {
            return Color::TRANSPARENT;
        }
        let x = ((u.rem_euclid(1.0) * w as f32) as u32).min(w - 1);
        let y = ((v.rem_euclid(1.0) * h as f32) as u32).min(h - 1);
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Color::with_alpha(r, g, b, a)
    }
}

/// Mesh vertex
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// Triangle referencing three vertices
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
    /// Index into the texture slice passed to `render_mesh`
    #[serde(default)]
    pub texture_id: Option<usize>,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2, texture_id: None }
    }
}

/// Shading mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    None, // Raw texture/tint colors (sprites)
    Flat, // One light calculation per face
}

/// Infinite white light (like the sun)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Direction the light travels, normalized
    pub direction: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn directional(direction: Vec3, intensity: f32) -> Self {
        Self { direction: direction.normalize(), intensity }
    }
}

/// Per-draw rasterizer settings
#[derive(Debug, Clone)]
pub struct RasterSettings {
    /// Use Z-buffer (false = draw order wins)
    pub use_zbuffer: bool,
    pub shading: ShadingMode,
    /// Skip triangles wound clockwise on screen
    pub backface_cull: bool,
    pub lights: Vec<Light>,
    /// Ambient light intensity (0.0-1.0)
    pub ambient: f32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            use_zbuffer: true,
            shading: ShadingMode::Flat,
            backface_cull: false,
            lights: vec![Light::directional(Vec3::new(-0.4, -1.0, 0.6), 0.8)],
            ambient: 0.35,
        }
    }
}
