//! Camera for 3D rendering
//!
//! Perspective camera with a vertical field of view. Screen space has y
//! pointing down, matching the framebuffer.

use super::math::{focal_length, perspective_transform, Vec3};

/// Default vertical field of view (degrees)
pub const DEFAULT_FOV_DEGREES: f32 = 60.0;

/// Camera state for 3D rendering
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch (radians)
    pub rotation_y: f32, // Yaw (radians)
    /// Vertical field of view in radians
    pub fov_y: f32,

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        let mut cam = Self::new();
        cam.fov_y = fov_degrees.to_radians();
        cam.position = position;
        cam.look_at(target);
        cam
    }

    pub fn update_basis(&mut self) {
        let upward = Vec3::new(0.0, -1.0, 0.0); // -Y is up in screen coordinates

        self.basis_z = Vec3 {
            x: self.rotation_x.cos() * self.rotation_y.sin(),
            y: -self.rotation_x.sin(),
            z: self.rotation_x.cos() * self.rotation_y.cos(),
        };
        self.basis_x = upward.cross(self.basis_z).normalize();
        self.basis_y = self.basis_z.cross(self.basis_x);
    }

    /// Point the camera at `target`. A target at the camera position is ignored.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize();
        if dir == Vec3::ZERO {
            return;
        }
        self.rotation_x = (-dir.y).clamp(-1.0, 1.0).asin().clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
        self.rotation_y = dir.x.atan2(dir.z);
        self.update_basis();
    }

    /// Forward direction in world space
    pub fn forward(&self) -> Vec3 {
        self.basis_z
    }

    /// Focal length in pixels for a framebuffer of the given height
    pub fn focal(&self, height: usize) -> f32 {
        focal_length(self.fov_y, height)
    }

    /// World position to camera space
    pub fn to_camera_space(&self, world_pos: Vec3) -> Vec3 {
        perspective_transform(world_pos - self.position, self.basis_x, self.basis_y, self.basis_z)
    }

    /// Camera-space direction back to world space
    pub fn to_world_dir(&self, cam_dir: Vec3) -> Vec3 {
        self.basis_x * cam_dir.x + self.basis_y * cam_dir.y + self.basis_z * cam_dir.z
    }

    /// World-space direction of the ray through a screen pixel (normalized)
    pub fn screen_dir(&self, screen_x: f32, screen_y: f32, width: usize, height: usize) -> Vec3 {
        let f = self.focal(height);
        let cam_dir = Vec3::new(
            (screen_x - width as f32 * 0.5) / f,
            (screen_y - height as f32 * 0.5) / f,
            1.0,
        );
        self.to_world_dir(cam_dir).normalize()
    }

    /// Unproject a screen pixel to the world point at a fixed camera-space depth.
    ///
    /// The returned point projects back to the same pixel and lies `depth`
    /// in front of the camera along its forward axis.
    pub fn screen_to_world(&self, screen_x: f32, screen_y: f32, width: usize, height: usize, depth: f32) -> Vec3 {
        let f = self.focal(height);
        let cam = Vec3::new(
            (screen_x - width as f32 * 0.5) / f * depth,
            (screen_y - height as f32 * 0.5) / f * depth,
            depth,
        );
        self.position + self.to_world_dir(cam)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
