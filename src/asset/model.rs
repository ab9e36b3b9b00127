//! Multi-part 3D models
//!
//! A model is a small hierarchy of colored meshes. Instantiating one into the
//! scene creates a root entity with one child per part.

use std::sync::Arc;

use crate::rasterizer::{mat4_from_trs, mat4_transform_point, Color, Vec3};

use super::mesh::Mesh;

/// One colored mesh of a model, placed relative to the model origin
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub mesh: Arc<Mesh>,
    pub offset: Vec3,
    /// Euler angles (degrees)
    pub rotation: Vec3,
    pub color: Color,
    /// Whether the instance gets a box collider fitted to this part
    pub collider: bool,
}

impl ModelPart {
    pub fn new(mesh: Mesh, color: Color) -> Self {
        Self {
            mesh: Arc::new(mesh),
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
            color,
            collider: true,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A reusable 3D piece visual
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub parts: Vec<ModelPart>,
}

impl Model {
    pub fn new(name: impl Into<String>, parts: Vec<ModelPart>) -> Self {
        Self { name: name.into(), parts }
    }

    /// Bounds of all part vertices in model space
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut result: Option<(Vec3, Vec3)> = None;
        for part in &self.parts {
            let m = mat4_from_trs(part.offset, part.rotation, 1.0);
            for v in &part.mesh.vertices {
                let p = mat4_transform_point(&m, v.pos);
                result = Some(match result {
                    Some((lo, hi)) => (lo.min(p), hi.max(p)),
                    None => (p, p),
                });
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_include_part_offsets() {
        let model = Model::new(
            "tower",
            vec![
                ModelPart::new(Mesh::cuboid(Vec3::new(1.0, 1.0, 1.0)), Color::WHITE),
                ModelPart::new(Mesh::cuboid(Vec3::new(1.0, 1.0, 1.0)), Color::WHITE).with_offset(Vec3::new(0.0, 2.0, 0.0)),
            ],
        );
        let (lo, hi) = model.bounds().unwrap();
        assert!((lo.y + 0.5).abs() < 1e-5);
        assert!((hi.y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_empty_model_has_no_bounds() {
        assert!(Model::new("empty", Vec::new()).bounds().is_none());
    }
}
