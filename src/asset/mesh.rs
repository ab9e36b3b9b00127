//! Triangle meshes and primitive builders

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Face, Vec2, Vec3, Vertex};

/// An indexed triangle mesh in local space
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Axis-aligned box centered on the origin
    pub fn cuboid(size: Vec3) -> Self {
        let h = size.scale(0.5);
        let mut mesh = Mesh::default();
        // (normal, u axis, v axis) per side
        let sides = [
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        ];
        for (normal, u, v) in sides {
            let center = Vec3::new(normal.x * h.x, normal.y * h.y, normal.z * h.z);
            let du = Vec3::new(u.x * h.x, u.y * h.y, u.z * h.z);
            let dv = Vec3::new(v.x * h.x, v.y * h.y, v.z * h.z);
            mesh.push_quad(
                [
                    center - du - dv,
                    center + du - dv,
                    center + du + dv,
                    center - du + dv,
                ],
                normal,
                None,
            );
        }
        mesh
    }

    /// Flat rectangle in the local XY plane facing +Z, UV (0,0) at top-left
    pub fn quad(width: f32, height: f32, texture_id: Option<usize>) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let mut mesh = Mesh::default();
        mesh.push_quad(
            [
                Vec3::new(-hw, -hh, 0.0),
                Vec3::new(hw, -hh, 0.0),
                Vec3::new(hw, hh, 0.0),
                Vec3::new(-hw, hh, 0.0),
            ],
            Vec3::new(0.0, 0.0, 1.0),
            texture_id,
        );
        mesh
    }

    /// Square pyramid standing on the XZ plane, apex at +Y
    pub fn pyramid(base: f32, height: f32) -> Self {
        let b = base * 0.5;
        let h = height * 0.5;
        let apex = Vertex::new(Vec3::new(0.0, h, 0.0), Vec2::new(0.5, 0.0), Vec3::UP);
        let corners = [
            Vec3::new(-b, -h, -b),
            Vec3::new(b, -h, -b),
            Vec3::new(b, -h, b),
            Vec3::new(-b, -h, b),
        ];
        let mut mesh = Mesh::default();
        mesh.vertices.push(apex);
        for c in corners {
            mesh.vertices.push(Vertex::new(c, Vec2::new(0.0, 1.0), Vec3::ZERO));
        }
        for i in 0..4 {
            mesh.faces.push(Face::new(0, 1 + i, 1 + (i + 1) % 4));
        }
        mesh.faces.push(Face::new(1, 3, 2));
        mesh.faces.push(Face::new(1, 4, 3));
        mesh
    }

    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3, texture_id: Option<usize>) {
        let base = self.vertices.len();
        let uvs = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        for (pos, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(pos, uv, normal));
        }
        let face = |a, b, c| Face { v0: base + a, v1: base + b, v2: base + c, texture_id };
        self.faces.push(face(0, 1, 2));
        self.faces.push(face(0, 2, 3));
    }

    /// Local-space bounds (min, max), None for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.pos;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| (lo.min(v.pos), hi.max(v.pos))))
    }
}
