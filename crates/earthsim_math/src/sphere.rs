//! UV sphere mesh generation
//!
//! Produces an indexed triangle mesh with normals, texture coordinates and
//! tangents. The texture's top row maps to the -Y pole (screen "up") and
//! `u = 0.5` faces the viewer (-Z), so equirectangular maps appear unmirrored.

use std::f32::consts::PI;

use crate::Vec3;

/// Default longitudinal segment count (matches common toolkit spheres)
pub const DEFAULT_DIVISIONS: u32 = 64;

/// Minimum longitudinal segment count
pub const MIN_DIVISIONS: u32 = 4;

/// A single sphere vertex
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereVertex {
    pub position: Vec3,
    /// Unit outward normal
    pub normal: Vec3,
    /// Texture coordinates in [0, 1]
    pub uv: [f32; 2],
    /// Unit tangent towards increasing `u`; `w` is the bitangent sign
    pub tangent: [f32; 4],
}

/// An indexed UV sphere
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub radius: f32,
    pub segments: u32,
    pub rings: u32,
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a sphere of the given radius
    ///
    /// `divisions` is the number of segments around the equator; the number of
    /// rings is half of that. Values below [`MIN_DIVISIONS`] are raised.
    pub fn new(radius: f32, divisions: u32) -> Self {
        let segments = divisions.max(MIN_DIVISIONS);
        let rings = segments / 2;

        let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
        for i in 0..=rings {
            let v = i as f32 / rings as f32;
            let theta = v * PI;
            let (sin_t, cos_t) = theta.sin_cos();

            for j in 0..=segments {
                let u = j as f32 / segments as f32;
                let phi = u * 2.0 * PI;
                let (sin_p, cos_p) = phi.sin_cos();

                let normal = Vec3::new(-sin_t * sin_p, -cos_t, sin_t * cos_p);
                let tangent = Vec3::new(-cos_p, 0.0, -sin_p);

                vertices.push(SphereVertex {
                    position: normal * radius,
                    normal,
                    uv: [u, v],
                    tangent: [tangent.x, tangent.y, tangent.z, 1.0],
                });
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::with_capacity((segments * (2 * rings - 2) * 3) as usize);
        for i in 0..rings {
            for j in 0..segments {
                let a = i * stride + j;
                let b = a + stride;

                // Top and bottom rings collapse to a point on one edge
                if i != 0 {
                    indices.extend_from_slice(&[a, b, a + 1]);
                }
                if i != rings - 1 {
                    indices.extend_from_slice(&[a + 1, b, b + 1]);
                }
            }
        }

        Self {
            radius,
            segments,
            rings,
            vertices,
            indices,
        }
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_counts() {
        let mesh = SphereMesh::new(200.0, 64);
        assert_eq!(mesh.segments, 64);
        assert_eq!(mesh.rings, 32);
        assert_eq!(mesh.vertex_count(), 33 * 65);
        assert_eq!(mesh.index_count(), (64 * (2 * 32 - 2) * 3) as usize);
    }

    #[test]
    fn test_minimum_divisions() {
        let mesh = SphereMesh::new(1.0, 1);
        assert_eq!(mesh.segments, MIN_DIVISIONS);
        assert_eq!(mesh.rings, 2);
        assert!(mesh.triangle_count() > 0);
    }

    #[test]
    fn test_vertices_on_surface() {
        let mesh = SphereMesh::new(30.0, 16);
        for v in &mesh.vertices {
            assert!((v.position.length() - 30.0).abs() < 1e-3);
            assert!((v.normal.length() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_uvs_in_range() {
        let mesh = SphereMesh::new(1.0, 12);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn test_top_of_texture_is_screen_up() {
        let mesh = SphereMesh::new(1.0, 8);
        // First ring sits at the -Y pole
        assert!((mesh.vertices[0].position.y + 1.0).abs() < EPSILON);
        let last = mesh.vertices.last().unwrap();
        assert!((last.position.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_texture_center_faces_viewer() {
        let mesh = SphereMesh::new(1.0, 8);
        // Equator ring, u = 0.5
        let stride = (mesh.segments + 1) as usize;
        let v = mesh.vertices[(mesh.rings as usize / 2) * stride + mesh.segments as usize / 2];
        assert!((v.uv[0] - 0.5).abs() < EPSILON);
        assert!((v.position.z + 1.0).abs() < EPSILON, "got {:?}", v.position);
        // Increasing u moves right on screen
        assert!(v.tangent[0] > 0.99);
    }

    #[test]
    fn test_tangents_perpendicular_to_normals() {
        let mesh = SphereMesh::new(5.0, 16);
        for v in &mesh.vertices {
            let t = Vec3::new(v.tangent[0], v.tangent[1], v.tangent[2]);
            assert!((t.length() - 1.0).abs() < EPSILON);
            assert!(t.dot(v.normal).abs() < EPSILON);
        }
    }

    #[test]
    fn test_indices_in_bounds_and_non_degenerate() {
        let mesh = SphereMesh::new(1.0, 10);
        let n = mesh.vertex_count() as u32;
        for tri in mesh.indices.chunks(3) {
            assert!(tri.iter().all(|&i| i < n));
            let p0 = mesh.vertices[tri[0] as usize].position;
            let p1 = mesh.vertices[tri[1] as usize].position;
            let p2 = mesh.vertices[tri[2] as usize].position;
            let area = (p1 - p0).cross(p2 - p0).length();
            assert!(area > 1e-6, "degenerate triangle {:?}", tri);
        }
    }
}
