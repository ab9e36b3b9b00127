//! Scene components
//!
//! Plain data attached to entities. Behaviour lives in `World` methods and in
//! the puzzle systems that drive them.

use std::sync::Arc;

use crate::asset::Mesh;
use crate::rasterizer::{Color, Texture, Vec3};

/// Something the rasterizer draws at the entity's global transform
#[derive(Debug, Clone)]
pub struct Renderable {
    pub mesh: Arc<Mesh>,
    /// Bound as texture 0 for faces that reference it
    pub texture: Option<Texture>,
    pub tint: Color,
    pub visible: bool,
    /// Skip lighting (sprites keep their artwork colors)
    pub unlit: bool,
}

impl Renderable {
    pub fn new(mesh: Arc<Mesh>, tint: Color) -> Self {
        Self {
            mesh,
            texture: None,
            tint,
            visible: true,
            unlit: false,
        }
    }

    /// Unlit textured mesh, used for sprites
    pub fn textured(mesh: Arc<Mesh>, texture: Texture) -> Self {
        Self {
            mesh,
            texture: Some(texture),
            tint: Color::WHITE,
            visible: true,
            unlit: true,
        }
    }
}

/// Collision layer an entity's collider lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Board and decoration
    Scene,
    /// Drop targets
    Target,
}

impl Layer {
    pub const fn mask(self) -> LayerMask {
        LayerMask(1 << self as u32)
    }
}

/// Set of layers a ray cast may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const TARGETS: LayerMask = Layer::Target.mask();

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.mask().0 != 0
    }
}

/// Oriented box collider in the entity's local space
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub layer: Layer,
    /// Disabled colliders are skipped by ray casts
    pub enabled: bool,
}

impl Collider {
    pub fn cuboid(half_extents: Vec3, layer: Layer) -> Self {
        Self {
            center: Vec3::ZERO,
            half_extents,
            layer,
            enabled: true,
        }
    }

    /// Collider fitted to local bounds
    pub fn from_bounds(min: Vec3, max: Vec3, layer: Layer) -> Self {
        Self {
            center: (min + max).scale(0.5),
            half_extents: (max - min).scale(0.5),
            layer,
            enabled: true,
        }
    }
}

/// Camera lens settings for an entity used as a viewpoint
#[derive(Debug, Clone, Copy)]
pub struct Lens {
    pub fov_degrees: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_masks() {
        assert!(LayerMask::TARGETS.contains(Layer::Target));
        assert!(!LayerMask::TARGETS.contains(Layer::Scene));
        assert!(Layer::Scene.mask().contains(Layer::Scene));
        assert!(!Layer::Scene.mask().contains(Layer::Target));
    }

    #[test]
    fn test_collider_from_bounds() {
        let c = Collider::from_bounds(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0), Layer::Scene);
        assert_eq!(c.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(c.half_extents, Vec3::new(1.0, 2.0, 3.0));
    }
}
