//! Collision detection primitives and meshes

pub mod mesh;
pub mod primitives;

pub use mesh::Mesh;
pub use primitives::{ray_aabb_intersection, ray_triangle_intersection, Aabb, Ray, SlabHit, Triangle};
