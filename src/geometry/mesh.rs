//! Triangle mesh buffers and unit primitives
//!
//! Unit meshes are shared by every primitive of the same kind; the node
//! scale stretches them to the requested size at export time.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::math::Aabb;

/// Segments around the axis of exported cylinders and spheres.
pub const ROUND_SEGMENTS: u32 = 32;
/// Latitude bands of exported spheres.
pub const SPHERE_RINGS: u32 = 16;

/// Indexed triangle list with per-vertex normals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bounds of all vertex positions.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().map(|p| Vec3::from_array(*p)))
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    /// Append a flat quad; `corners` must wind counter-clockwise seen from `normal`.
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.push_vertex(corners[0], normal);
        for corner in &corners[1..] {
            self.push_vertex(*corner, normal);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append an axis-aligned box with hard edges.
    pub fn push_box(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let half = (max - min) * 0.5;
        // (normal, u, v) with u x v = normal
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];
        for (n, u, v) in faces {
            let face_center = center + n * half;
            let du = u * half;
            let dv = v * half;
            self.push_quad(
                [
                    face_center - du - dv,
                    face_center + du - dv,
                    face_center + du + dv,
                    face_center - du + dv,
                ],
                n,
            );
        }
    }

    /// Unit cube centered on the origin.
    pub fn unit_box() -> Self {
        let mut mesh = Self::new();
        mesh.push_box(Vec3::splat(-0.5), Vec3::splat(0.5));
        mesh
    }

    /// Z-aligned cylinder of radius 1 and height 1, centered on the origin.
    pub fn unit_cylinder(segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Self::new();
        let ring = |i: u32| {
            let a = TAU * i as f32 / segments as f32;
            Vec3::new(a.cos(), a.sin(), 0.0)
        };

        // Side
        let side_base = mesh.positions.len() as u32;
        for i in 0..=segments {
            let dir = ring(i);
            mesh.push_vertex(dir + Vec3::new(0.0, 0.0, -0.5), dir);
            mesh.push_vertex(dir + Vec3::new(0.0, 0.0, 0.5), dir);
        }
        for i in 0..segments {
            let b0 = side_base + i * 2;
            let t0 = b0 + 1;
            let b1 = b0 + 2;
            let t1 = b0 + 3;
            mesh.indices.extend_from_slice(&[b0, b1, t1, b0, t1, t0]);
        }

        // Caps
        for (z, normal) in [(0.5, Vec3::Z), (-0.5, Vec3::NEG_Z)] {
            let center = mesh.push_vertex(Vec3::new(0.0, 0.0, z), normal);
            let first = mesh.positions.len() as u32;
            for i in 0..segments {
                mesh.push_vertex(ring(i) + Vec3::new(0.0, 0.0, z), normal);
            }
            for i in 0..segments {
                let a = first + i;
                let b = first + (i + 1) % segments;
                if z > 0.0 {
                    mesh.indices.extend_from_slice(&[center, a, b]);
                } else {
                    mesh.indices.extend_from_slice(&[center, b, a]);
                }
            }
        }
        mesh
    }

    /// UV sphere of radius 1 centered on the origin, poles on Z.
    pub fn unit_sphere(segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut mesh = Self::new();

        for r in 0..=rings {
            let phi = PI * r as f32 / rings as f32;
            for s in 0..=segments {
                let theta = TAU * s as f32 / segments as f32;
                let p = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
                mesh.push_vertex(p, p);
            }
        }

        let stride = segments + 1;
        for r in 0..rings {
            for s in 0..segments {
                let a = r * stride + s;
                let b = a + stride;
                mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &MeshData) {
        // Every triangle's winding normal must agree with its vertex normals.
        for tri in mesh.indices.chunks(3) {
            let p: Vec<Vec3> = tri.iter().map(|&i| Vec3::from_array(mesh.positions[i as usize])).collect();
            let face = (p[1] - p[0]).cross(p[2] - p[0]);
            if face.length_squared() < 1e-12 {
                continue; // pole triangles collapse
            }
            let n = Vec3::from_array(mesh.normals[tri[0] as usize]);
            assert!(face.dot(n) > 0.0, "inward triangle {:?}", tri);
        }
    }

    #[test]
    fn test_unit_box_shape() {
        let mesh = MeshData::unit_box();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let b = mesh.bounds();
        assert_eq!(b.min, Vec3::splat(-0.5));
        assert_eq!(b.max, Vec3::splat(0.5));
        assert_outward(&mesh);
    }

    #[test]
    fn test_unit_cylinder_bounds_and_winding() {
        let mesh = MeshData::unit_cylinder(16);
        let b = mesh.bounds();
        assert!((b.min - Vec3::new(-1.0, -1.0, -0.5)).length() < 1e-5);
        assert!((b.max - Vec3::new(1.0, 1.0, 0.5)).length() < 1e-5);
        assert_outward(&mesh);
    }

    #[test]
    fn test_unit_sphere_bounds_and_winding() {
        let mesh = MeshData::unit_sphere(16, 8);
        let b = mesh.bounds();
        assert!((b.max - Vec3::ONE).length() < 1e-5);
        assert!((b.min + Vec3::ONE).length() < 1e-5);
        assert_outward(&mesh);
    }

    #[test]
    fn test_indices_in_range() {
        for mesh in [MeshData::unit_box(), MeshData::unit_cylinder(8), MeshData::unit_sphere(8, 4)] {
            let n = mesh.vertex_count() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n));
            assert_eq!(mesh.positions.len(), mesh.normals.len());
        }
    }
}
