//! Transform Components
//!
//! - Transform: local position/rotation/scale (relative to parent)
//! - GlobalTransform: world-space matrix, resolved on demand by walking parents
//!
//! Scale is uniform, so every matrix here is a rotation times a positive
//! scalar plus a translation. That keeps the inverse cheap and exact.

use crate::rasterizer::{
    look_rotation, mat4_from_trs, mat4_mul, mat4_transform_point, mat4_transform_vector, Mat4, Vec3,
};

/// Local transform relative to parent (or world if no parent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles (degrees), applied Z * Y * X
    pub rotation: Vec3,
    /// Uniform scale factor
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation, scale: 1.0 }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        mat4_from_trs(self.position, self.rotation, self.scale)
    }

    /// Turn local +Z towards a point (no roll). Ignored if the point is
    /// at our own position.
    pub fn face_towards(&mut self, point: Vec3) {
        let dir = point - self.position;
        if dir.len() > 1e-6 {
            self.rotation = look_rotation(dir);
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World-space transform, computed from the hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct GlobalTransform {
    matrix: Mat4,
}

impl GlobalTransform {
    pub fn from_transform(transform: &Transform) -> Self {
        Self { matrix: transform.to_matrix() }
    }

    /// Child's global transform from parent's global and child's local
    pub fn from_parent_and_local(parent: &GlobalTransform, local: &Transform) -> Self {
        Self {
            matrix: mat4_mul(&parent.matrix, &local.to_matrix()),
        }
    }

    /// World position (translation component)
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.matrix[0][3], self.matrix[1][3], self.matrix[2][3])
    }

    /// Uniform scale (length of the first basis column)
    pub fn scale(&self) -> f32 {
        Vec3::new(self.matrix[0][0], self.matrix[1][0], self.matrix[2][0]).len()
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        mat4_transform_point(&self.matrix, point)
    }

    /// World point into local space
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.inverse_transform_vector(point - self.position())
    }

    /// World direction into local space. Lengths are divided by the scale,
    /// so ray parameters are preserved.
    pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 {
        let s2 = self.scale() * self.scale();
        if s2 == 0.0 {
            return Vec3::ZERO;
        }
        let m = &self.matrix;
        // Transpose of the rotation-scale block, divided by scale squared
        Vec3::new(
            m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
            m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
            m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
        )
        .scale(1.0 / s2)
    }

    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        mat4_transform_vector(&self.matrix, v)
    }
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self::from_transform(&Transform::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 0.001
    }

    #[test]
    fn test_parent_child_transform() {
        let parent = GlobalTransform::from_transform(&Transform::from_position(Vec3::new(100.0, 0.0, 0.0)));
        let child_local = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        let child = GlobalTransform::from_parent_and_local(&parent, &child_local);
        assert!(close(child.position(), Vec3::new(110.0, 0.0, 0.0)));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = Transform::from_position_rotation(Vec3::new(1.0, -2.0, 3.0), Vec3::new(20.0, 45.0, -10.0)).with_scale(2.5);
        let g = GlobalTransform::from_transform(&t);
        let p = Vec3::new(0.3, 0.7, -1.1);
        assert!(close(g.inverse_transform_point(g.transform_point(p)), p));
        assert!((g.scale() - 2.5).abs() < 0.001);
    }

    #[test]
    fn test_face_towards() {
        let mut t = Transform::from_position(Vec3::new(0.0, 0.0, 0.0));
        t.face_towards(Vec3::new(0.0, 0.0, -4.0));
        let forward = GlobalTransform::from_transform(&t).transform_vector(Vec3::new(0.0, 0.0, 1.0));
        assert!(close(forward, Vec3::new(0.0, 0.0, -1.0)));
    }
}
