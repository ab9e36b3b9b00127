//! Puzzle pieces
//!
//! A piece is an identity plus a visual. The identity string is the only
//! thing targets compare against; the visual decides how the piece is shown
//! in its slot and while it is being dragged.

use std::path::Path;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::rasterizer::Color;

use super::model::Model;
use super::AssetError;

/// How a piece looks
#[derive(Debug, Clone)]
pub enum PieceVisual {
    /// Flat sprite, shown as-is in the slot and as a textured quad when dragged
    Image(Arc<RgbaImage>),
    /// 3D model, shown as a rendered thumbnail in the slot
    Model(Arc<Model>),
}

impl PieceVisual {
    pub fn kind(&self) -> &'static str {
        match self {
            PieceVisual::Image(_) => "image",
            PieceVisual::Model(_) => "model",
        }
    }
}

/// An immutable, cheaply cloned puzzle piece
#[derive(Debug, Clone)]
pub struct PieceAsset {
    pub id: String,
    pub visual: PieceVisual,
}

impl PieceAsset {
    pub fn image(id: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            id: id.into(),
            visual: PieceVisual::Image(Arc::new(image)),
        }
    }

    pub fn model(id: impl Into<String>, model: Model) -> Self {
        Self {
            id: id.into(),
            visual: PieceVisual::Model(Arc::new(model)),
        }
    }
}

/// Decode a sprite from an image file
pub fn load_sprite(path: &Path) -> Result<RgbaImage, AssetError> {
    let img = image::open(path).map_err(|source| AssetError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Generated sprite: a filled rectangle with a darker border and
/// transparent corners, for pieces without artwork
pub fn swatch(width: u32, height: u32, fill: Color) -> RgbaImage {
    let border = fill.lerp(Color::BLACK, 0.5);
    let bw = (width.min(height) / 10).max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let dx = x.min(width - 1 - x);
        let dy = y.min(height - 1 - y);
        if dx + dy < bw {
            Rgba([0, 0, 0, 0])
        } else if dx < bw || dy < bw {
            Rgba([border.r, border.g, border.b, 255])
        } else {
            Rgba([fill.r, fill.g, fill.b, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_corners_transparent() {
        let img = swatch(40, 20, Color::new(200, 100, 50));
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(20, 10).0, [200, 100, 50, 255]);
    }

    #[test]
    fn test_clone_shares_visual() {
        let piece = PieceAsset::image("Aster", swatch(4, 4, Color::WHITE));
        let copy = piece.clone();
        match (&piece.visual, &copy.visual) {
            (PieceVisual::Image(a), PieceVisual::Image(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected image visuals"),
        }
    }

    #[test]
    fn test_load_sprite_missing_file() {
        let err = load_sprite(Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
