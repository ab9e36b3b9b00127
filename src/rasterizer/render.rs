//! Core rendering functions
//! Triangle rasterization into an RGBA framebuffer with a depth buffer

use image::RgbaImage;

use super::camera::Camera;
use super::math::{project, Vec2, Vec3, NEAR_PLANE};
use super::types::{Color, Face, Light, RasterSettings, ShadingMode, Texture, Vertex};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,   // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>, // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.zbuffer = vec![f32::MAX; width * height];
        }
    }

    /// Clear framebuffer with transparent black (for alpha compositing)
    pub fn clear_transparent(&mut self) {
        self.pixels.fill(0);
        self.zbuffer.fill(f32::MAX);
    }

    /// Clear with a vertical gradient, top_color at y=0
    pub fn clear_gradient(&mut self, top_color: Color, bottom_color: Color) {
        let h = self.height.max(2) as f32 - 1.0;
        for y in 0..self.height {
            let c = top_color.lerp(bottom_color, y as f32 / h);
            let bytes = [c.r, c.g, c.b, 255];
            let row = &mut self.pixels[y * self.width * 4..(y + 1) * self.width * 4];
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Write a pixel if it is closer than what's already there
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y * self.width + x;
        if z < self.zbuffer[idx] {
            self.zbuffer[idx] = z;
            self.set_pixel(x, y, color);
            true
        } else {
            false
        }
    }

    /// Copy the color buffer into an owned image
    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
    }

    /// Number of pixels with non-zero alpha
    pub fn covered_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

/// Projected triangle ready for rasterization
struct Surface {
    v1: Vec3, // Screen space (z = camera depth)
    v2: Vec3,
    v3: Vec3,
    uv1: Vec2,
    uv2: Vec2,
    uv3: Vec2,
    shade: f32,
    texture_id: Option<usize>,
}

/// Light reaching a face with the given normal.
/// Faces are lit from both sides so winding doesn't matter.
fn shade_face(normal: Vec3, lights: &[Light], ambient: f32) -> f32 {
    lights
        .iter()
        .map(|light| normal.dot(-light.direction).abs() * light.intensity)
        .fold(ambient, |acc, c| acc + c)
        .min(1.0)
}

/// Rasterize a single triangle using incremental edge functions
fn rasterize_triangle(
    fb: &mut Framebuffer,
    surface: &Surface,
    textures: &[Texture],
    tint: Color,
    settings: &RasterSettings,
) {
    let (v1, v2, v3) = (surface.v1, surface.v2, surface.v3);

    let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x) + 1.0).clamp(0.0, fb.width as f32) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y) + 1.0).clamp(0.0, fb.height as f32) as usize;

    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Twice the signed area; either winding works since both edge values flip with it
    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 0.00001 {
        return;
    }
    let inv_area = 1.0 / area;

    let a0 = v2.y - v3.y;
    let b0 = v3.x - v2.x;
    let a1 = v3.y - v1.y;
    let b1 = v1.x - v3.x;

    // Sample at pixel centers
    let start_x = min_x as f32 + 0.5;
    let start_y = min_y as f32 + 0.5;
    let mut w0_row = a0 * (start_x - v3.x) + b0 * (start_y - v3.y);
    let mut w1_row = a1 * (start_x - v3.x) + b1 * (start_y - v3.y);

    let inv_z1 = 1.0 / v1.z;
    let inv_z2 = 1.0 / v2.z;
    let inv_z3 = 1.0 / v3.z;
    let texture = surface.texture_id.and_then(|id| textures.get(id));
    let shade = surface.shade;

    for y in min_y..max_y {
        let mut w0 = w0_row;
        let mut w1 = w1_row;

        for x in min_x..max_x {
            let bc_x = w0 * inv_area;
            let bc_y = w1 * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;
            w0 += a0;
            w1 += a1;

            const ERR: f32 = -0.0001;
            if bc_x < ERR || bc_y < ERR || bc_z < ERR {
                continue;
            }

            // 1/z interpolates linearly in screen space
            let inv_z = bc_x * inv_z1 + bc_y * inv_z2 + bc_z * inv_z3;
            let z = 1.0 / inv_z;

            if settings.use_zbuffer && z >= fb.zbuffer[y * fb.width + x] {
                continue;
            }

            let mut color = match texture {
                Some(tex) => {
                    let u = (bc_x * surface.uv1.x * inv_z1 + bc_y * surface.uv2.x * inv_z2 + bc_z * surface.uv3.x * inv_z3) / inv_z;
                    let v = (bc_x * surface.uv1.y * inv_z1 + bc_y * surface.uv2.y * inv_z2 + bc_z * surface.uv3.y * inv_z3) / inv_z;
                    tex.sample(u, v)
                }
                None => Color::WHITE,
            };

            if color.is_transparent() {
                continue;
            }

            color = color.modulate(tint).shade(shade);

            if settings.use_zbuffer {
                fb.set_pixel_with_depth(x, y, z, color);
            } else {
                fb.set_pixel(x, y, color);
            }
        }

        w0_row += b0;
        w1_row += b1;
    }
}

/// Render a world-space triangle mesh.
///
/// `textures` is indexed by `Face::texture_id`; `tint` multiplies every
/// sampled color. Triangles touching the near plane are skipped whole.
pub fn render_mesh(
    fb: &mut Framebuffer,
    vertices: &[Vertex],
    faces: &[Face],
    textures: &[Texture],
    tint: Color,
    camera: &Camera,
    settings: &RasterSettings,
) {
    let focal = camera.focal(fb.height);

    // === TRANSFORM PHASE ===
    let cam_space: Vec<Vec3> = vertices.iter().map(|v| camera.to_camera_space(v.pos)).collect();
    let projected: Vec<Vec3> = cam_space
        .iter()
        .map(|c| {
            if c.z > NEAR_PLANE {
                project(*c, focal, fb.width, fb.height)
            } else {
                *c
            }
        })
        .collect();

    // === CULL + SHADE PHASE ===
    let mut surfaces: Vec<Surface> = Vec::with_capacity(faces.len());
    for face in faces {
        let (Some(c1), Some(c2), Some(c3)) = (cam_space.get(face.v0), cam_space.get(face.v1), cam_space.get(face.v2)) else {
            continue;
        };
        if c1.z <= NEAR_PLANE || c2.z <= NEAR_PLANE || c3.z <= NEAR_PLANE {
            continue;
        }

        let (v1, v2, v3) = (projected[face.v0], projected[face.v1], projected[face.v2]);
        if settings.backface_cull {
            let signed_area = (v2.x - v1.x) * (v3.y - v1.y) - (v3.x - v1.x) * (v2.y - v1.y);
            if signed_area <= 0.0 {
                continue;
            }
        }

        let (w1, w2, w3) = (vertices[face.v0].pos, vertices[face.v1].pos, vertices[face.v2].pos);
        let shade = match settings.shading {
            ShadingMode::None => 1.0,
            ShadingMode::Flat => {
                let normal = (w2 - w1).cross(w3 - w1).normalize();
                shade_face(normal, &settings.lights, settings.ambient)
            }
        };

        surfaces.push(Surface {
            v1,
            v2,
            v3,
            uv1: vertices[face.v0].uv,
            uv2: vertices[face.v1].uv,
            uv3: vertices[face.v2].uv,
            shade,
            texture_id: face.texture_id,
        });
    }

    // Far to near so the painter's fallback also looks right
    if !settings.use_zbuffer {
        surfaces.sort_by(|a, b| {
            let za = a.v1.z + a.v2.z + a.v3.z;
            let zb = b.v1.z + b.v2.z + b.v3.z;
            zb.total_cmp(&za)
        });
    }

    // === DRAW PHASE ===
    for surface in &surfaces {
        rasterize_triangle(fb, surface, textures, tint, settings);
    }
}
