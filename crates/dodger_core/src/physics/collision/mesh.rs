//! Collision mesh representation
//!
//! Meshes are stored in MODEL SPACE and never modified after loading. A
//! platform keeps its world transform separately and moves rays into model
//! space for testing instead of transforming every triangle.

use crate::foundation::math::Vec3;
use super::primitives::{Ray, Triangle};
use serde::{Deserialize, Serialize};

/// Triangle mesh in model space (local coordinates)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Triangle list indices, three per triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates a mesh from vertices and triangle-list indices
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Whether the mesh has anything to collide with
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    /// Iterate over the well-formed triangles.
    ///
    /// Triangles referencing a vertex out of range are skipped individually;
    /// a trailing partial triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).filter_map(move |chunk| {
            let v0 = self.vertices.get(chunk[0] as usize)?;
            let v1 = self.vertices.get(chunk[1] as usize)?;
            let v2 = self.vertices.get(chunk[2] as usize)?;
            Some(Triangle::new(*v0, *v1, *v2))
        })
    }

    /// Number of triangles that reference missing vertices
    pub fn malformed_triangle_count(&self) -> usize {
        let len = self.vertices.len();
        self.indices
            .chunks_exact(3)
            .filter(|chunk| chunk.iter().any(|&i| i as usize >= len))
            .count()
    }

    /// Closest ray parameter over all triangles
    pub fn closest_hit(&self, ray: &Ray) -> Option<f32> {
        self.triangles()
            .filter_map(|tri| tri.intersect_ray(ray))
            .min_by(f32::total_cmp)
    }

    /// Whether any triangle is hit at or before `max_t`
    pub fn any_hit_within(&self, ray: &Ray, max_t: f32) -> bool {
        self.triangles()
            .filter_map(|tri| tri.intersect_ray(ray))
            .any(|t| t <= max_t)
    }
}

/// Box fixture shared by collision tests
#[cfg(test)]
impl Mesh {
    /// Axis-aligned box mesh centered on the origin
    pub(crate) fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            // top
            3, 2, 6,  3, 6, 7,
            // bottom
            0, 5, 1,  0, 4, 5,
            // front (+z)
            4, 6, 5,  4, 7, 6,
            // back (-z)
            0, 1, 2,  0, 2, 3,
            // right (+x)
            1, 5, 6,  1, 6, 2,
            // left (-x)
            0, 3, 7,  0, 7, 4,
        ];
        Self { vertices, indices }
    }
}
