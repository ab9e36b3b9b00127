//! Piece assets
//!
//! ```text
//! AssetCatalog (deck)
//! └── PieceAsset
//!     ├── id: String           (identity checked by targets)
//!     └── visual: PieceVisual
//!         ├── Image(sprite)
//!         └── Model(parts: Vec<ModelPart { mesh, offset, rotation, color }>)
//! ```

mod catalog;
mod mesh;
mod model;
mod piece;

use thiserror::Error;

pub use catalog::AssetCatalog;
pub use mesh::Mesh;
pub use model::{Model, ModelPart};
pub use piece::{load_sprite, swatch, PieceAsset, PieceVisual};

/// Errors loading piece artwork
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode sprite {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}
