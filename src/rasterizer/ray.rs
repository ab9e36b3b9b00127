//! Ray casting utilities for picking and drop targeting
//!
//! Rays go through `Camera::screen_dir`, the inverse of the rasterizer's
//! projection, so a ray cast from a drawn pixel passes back through the
//! world point drawn there.

use super::camera::Camera;
use super::math::Vec3;

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3, // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `origin` through `through`. Falls back to `fallback_dir`
    /// when the two points coincide.
    pub fn through(origin: Vec3, through: Vec3, fallback_dir: Vec3) -> Self {
        let dir = through - origin;
        if dir.len() < 1e-6 {
            Self::new(origin, fallback_dir)
        } else {
            Self::new(origin, dir)
        }
    }
}

/// Generate a ray from screen coordinates through the camera.
pub fn screen_to_ray(
    screen_x: f32,
    screen_y: f32,
    screen_width: usize,
    screen_height: usize,
    camera: &Camera,
) -> Ray {
    Ray::new(
        camera.position,
        camera.screen_dir(screen_x, screen_y, screen_width, screen_height),
    )
}

/// Slab-method ray/AABB intersection.
///
/// Returns the entry distance, or the exit distance when the origin is inside
/// the box. `None` when the box is missed or entirely behind the origin.
pub fn ray_aabb_hit_t(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = |d: f32| if d != 0.0 { 1.0 / d } else { f32::INFINITY };
    let inv_dir = Vec3::new(inv(direction.x), inv(direction.y), inv(direction.z));

    let slab = |o: f32, inv_d: f32, lo: f32, hi: f32| {
        let (a, b) = ((lo - o) * inv_d, (hi - o) * inv_d);
        if a > b { (b, a) } else { (a, b) }
    };

    let (mut tmin, mut tmax) = slab(origin.x, inv_dir.x, min.x, max.x);

    let (tymin, tymax) = slab(origin.y, inv_dir.y, min.y, max.y);
    if tmin > tymax || tymin > tmax {
        return None;
    }
    tmin = tmin.max(tymin);
    tmax = tmax.min(tymax);

    let (tzmin, tzmax) = slab(origin.z, inv_dir.z, min.z, max.z);
    if tmin > tzmax || tzmin > tmax {
        return None;
    }
    tmin = tmin.max(tzmin);
    tmax = tmax.min(tzmax);

    // NaN from 0 * inf on a slab boundary means a grazing miss
    if tmin.is_nan() || tmax.is_nan() || tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Ray {
        fn at(&self, t: f32) -> Vec3 {
            self.origin + self.direction * t
        }
    }

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 0.001);
        assert!(p.y.abs() < 0.001 && p.z.abs() < 0.001);
    }

    #[test]
    fn test_aabb_hit_from_outside() {
        let t = ray_aabb_hit_t(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        assert!((t.unwrap() - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_aabb_miss_and_behind() {
        let min = Vec3::new(-1.0, -1.0, -1.0);
        let max = Vec3::new(1.0, 1.0, 1.0);
        // Passes beside the box
        assert!(ray_aabb_hit_t(Vec3::new(3.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0), min, max).is_none());
        // Box is behind the origin
        assert!(ray_aabb_hit_t(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0), min, max).is_none());
    }

    #[test]
    fn test_aabb_origin_inside_returns_exit() {
        let t = ray_aabb_hit_t(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, -1.0, -1.0), Vec3::new(2.0, 2.0, 2.0));
        assert!((t.unwrap() - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_screen_to_ray_roundtrip() {
        let camera = Camera::looking_at(Vec3::new(0.0, 2.0, -8.0), Vec3::ZERO, 60.0);
        let world_point = Vec3::new(1.5, -0.5, 2.0);
        let (sx, sy, _) = camera.world_to_screen(world_point, 320, 240).expect("visible");

        let ray = screen_to_ray(sx, sy, 320, 240, &camera);
        let t = (world_point - ray.origin).dot(ray.direction);
        let distance = (ray.at(t) - world_point).len();
        assert!(distance < 0.001, "ray misses point by {}", distance);
    }

    #[test]
    fn test_through_degenerate_uses_fallback() {
        let ray = Ray::through(Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!((ray.direction.z - 1.0).abs() < 0.001);
    }
}
