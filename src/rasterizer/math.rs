//! Vector and matrix math for the scene rasterizer

use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// Triangles with any vertex closer than this (camera space) are skipped
pub const NEAR_PLANE: f32 = 0.01;

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        self.scale(1.0 / l)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise minimum
    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum
    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Largest of the three components
    pub fn max_element(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    /// Linear interpolation, `t = 0` gives `self`, `t = 1` gives `other`
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

/// 2D Vector (texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Transform a vector by camera basis vectors (rotation into camera space)
pub fn perspective_transform(v: Vec3, cam_x: Vec3, cam_y: Vec3, cam_z: Vec3) -> Vec3 {
    Vec3 {
        x: v.dot(cam_x),
        y: v.dot(cam_y),
        z: v.dot(cam_z),
    }
}

/// Focal length in pixels for a vertical field of view (radians)
pub fn focal_length(fov_y: f32, height: usize) -> f32 {
    (height as f32 * 0.5) / (fov_y * 0.5).tan()
}

/// Project a camera-space point to screen coordinates.
///
/// Returns Vec3 where x,y are pixel coordinates and z is the camera-space depth
/// (needed for perspective-correct interpolation). Callers must reject points
/// at or behind the near plane first.
pub fn project(v: Vec3, focal: f32, width: usize, height: usize) -> Vec3 {
    Vec3 {
        x: v.x / v.z * focal + width as f32 * 0.5,
        y: v.y / v.z * focal + height as f32 * 0.5,
        z: v.z,
    }
}

// =============================================================================
// 4x4 Matrix operations (for transforms)
// =============================================================================

/// 4x4 transformation matrix, row-major with translation in the last column
pub type Mat4 = [[f32; 4]; 4];

/// Create translation matrix
pub fn mat4_translation(t: Vec3) -> Mat4 {
    [
        [1.0, 0.0, 0.0, t.x],
        [0.0, 1.0, 0.0, t.y],
        [0.0, 0.0, 1.0, t.z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Build a rotation matrix from euler angles (degrees).
/// Rotation order: Z * Y * X.
pub fn mat4_rotation(rot: Vec3) -> Mat4 {
    let (sx, cx) = rot.x.to_radians().sin_cos();
    let (sy, cy) = rot.y.to_radians().sin_cos();
    let (sz, cz) = rot.z.to_radians().sin_cos();

    [
        [cy * cz, sx * sy * cz - cx * sz, cx * sy * cz + sx * sz, 0.0],
        [cy * sz, sx * sy * sz + cx * cz, cx * sy * sz - sx * cz, 0.0],
        [-sy, sx * cy, cx * cy, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Multiply two 4x4 matrices
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Transform a point by a 4x4 matrix
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
    )
}

/// Transform a direction by a 4x4 matrix (ignores translation)
pub fn mat4_transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
        m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
        m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
    )
}

/// Build a combined transform matrix from position, rotation and uniform scale
pub fn mat4_from_trs(position: Vec3, rotation: Vec3, scale: f32) -> Mat4 {
    let mut m = mat4_mul(&mat4_translation(position), &mat4_rotation(rotation));
    if (scale - 1.0).abs() > 0.0001 {
        for row in m.iter_mut().take(3) {
            for v in row.iter_mut().take(3) {
                *v *= scale;
            }
        }
    }
    m
}

/// Euler angles (degrees) that turn local +Z towards `dir`, with no roll
pub fn look_rotation(dir: Vec3) -> Vec3 {
    let n = dir.normalize();
    if n == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let pitch = (-n.y).clamp(-1.0, 1.0).asin();
    let yaw = n.x.atan2(n.z);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 0.001
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        assert!(close(a.cross(b), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-1.0, 0.0, 7.0);
        assert!(close(a.lerp(b, 0.0), a));
        assert!(close(a.lerp(b, 1.0), b));
        assert!(close(a.lerp(b, 0.5), Vec3::new(0.0, 1.0, 5.0)));
    }

    #[test]
    fn test_project_center() {
        let p = project(Vec3::new(0.0, 0.0, 3.0), 100.0, 320, 240);
        assert!((p.x - 160.0).abs() < 0.001);
        assert!((p.y - 120.0).abs() < 0.001);
        assert!((p.z - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_focal_length_90_degrees() {
        // tan(45deg) = 1, so focal = half height
        let f = focal_length(90f32.to_radians(), 200);
        assert!((f - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_look_rotation_points_local_z() {
        for dir in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.3, -0.8, 0.5),
        ] {
            let m = mat4_rotation(look_rotation(dir));
            let forward = mat4_transform_vector(&m, Vec3::new(0.0, 0.0, 1.0));
            assert!(close(forward, dir.normalize()), "forward {:?} vs {:?}", forward, dir);
        }
    }

    #[test]
    fn test_trs_scale_and_translate() {
        let m = mat4_from_trs(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 2.0);
        let p = mat4_transform_point(&m, Vec3::new(1.0, 1.0, 1.0));
        assert!(close(p, Vec3::new(3.0, 4.0, 5.0)));
    }
}
