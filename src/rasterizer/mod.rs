//! Software rasterizer
//!
//! Renders the puzzle scene and piece thumbnails into RGBA framebuffers:
//! - Perspective projection with a vertical field of view
//! - Perspective-correct texture sampling with alpha test
//! - Flat shading from directional lights, unlit sprites
//! - Z-buffer with a transparent clear for off-screen captures
//!
//! # Module Organization
//!
//! - `types` - Color, Texture, Light, Vertex, Face, RasterSettings
//! - `math` - Vec3, Vec2, projection, 4x4 matrix helpers
//! - `camera` - Camera with projection and unprojection
//! - `render` - Framebuffer and mesh rendering
//! - `ray` - Ray casting utilities

pub mod camera;
pub mod math;
pub mod ray;
pub mod render;
pub mod types;

pub use types::{Color, Face, Light, RasterSettings, ShadingMode, Texture, Vertex};

pub use math::{
    Vec2, Vec3, Mat4, look_rotation,
    mat4_mul, mat4_transform_point, mat4_transform_vector, mat4_from_trs,
};

pub use camera::Camera;

pub use render::{Framebuffer, render_mesh};

pub use ray::{Ray, screen_to_ray, ray_aabb_hit_t};
