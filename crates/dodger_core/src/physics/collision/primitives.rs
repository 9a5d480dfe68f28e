//! Primitive collision shapes and intersection algorithms
//!
//! Provides rays, axis-aligned boxes and triangles with the intersection tests
//! the platform colliders are built from. Everything here is pure and
//! reentrant; "no hit" is the only failure mode.

use crate::foundation::math::Vec3;

/// Determinant and distance epsilon for Möller-Trumbore
pub const TRIANGLE_EPSILON: f32 = 1e-7;

/// Direction components smaller than this are treated as parallel to a slab
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// A ray for ray casting
///
/// The direction is stored as given; callers that need distances in world
/// units normalize it first.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Entry and exit parameters of a ray through a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabHit {
    /// Entry parameter, never below zero
    pub t_min: f32,
    /// Exit parameter
    pub t_max: f32,
}

/// Axis-aligned bounding box stored as center and full extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Center of the box
    pub center: Vec3,
    /// Full size along each axis
    pub size: Vec3,
}

impl Aabb {
    /// Creates a box from its center and full extents
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.size * 0.5
    }

    /// World Y of the top face
    pub fn top(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    /// Inclusive overlap test against another center/size box on all three axes
    pub fn overlaps(&self, other_center: &Vec3, other_size: &Vec3) -> bool {
        (0..3).all(|axis| {
            other_center[axis] + other_size[axis] * 0.5 >= self.center[axis] - self.size[axis] * 0.5
                && self.center[axis] + self.size[axis] * 0.5
                    >= other_center[axis] - other_size[axis] * 0.5
        })
    }

    /// Whether a point lies inside the XZ footprint, widened by `margin`
    pub fn contains_xz(&self, point: &Vec3, margin: f32) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x - margin
            && point.x <= max.x + margin
            && point.z >= min.z - margin
            && point.z <= max.z + margin
    }

    /// Slab-method ray test against this box
    pub fn intersect_ray(&self, ray: &Ray) -> Option<SlabHit> {
        ray_aabb_intersection(&ray.origin, &ray.direction, &self.min(), &self.max())
    }
}

/// Slab-method ray/box intersection.
///
/// The entry parameter starts at zero, so a ray that begins inside the box
/// reports `t_min == 0`. Near-zero direction components are treated as
/// axis-parallel: the ray misses unless its origin lies inside that slab.
pub fn ray_aabb_intersection(
    origin: &Vec3,
    direction: &Vec3,
    box_min: &Vec3,
    box_max: &Vec3,
) -> Option<SlabHit> {
    let mut t_min = 0.0f32;
    let mut t_max = f32::MAX;

    for axis in 0..3 {
        if direction[axis].abs() < PARALLEL_EPSILON {
            if origin[axis] < box_min[axis] || origin[axis] > box_max[axis] {
                return None;
            }
        } else {
            let ood = 1.0 / direction[axis];
            let mut t1 = (box_min[axis] - origin[axis]) * ood;
            let mut t2 = (box_max[axis] - origin[axis]) * ood;

            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);

            if t_min > t_max {
                return None;
            }
        }
    }

    Some(SlabHit { t_min, t_max })
}

/// Möller-Trumbore ray/triangle intersection.
///
/// Returns the ray parameter of the hit. Hits at `t <= TRIANGLE_EPSILON` are
/// rejected so a ray never reports its own origin surface.
/// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
pub fn ray_triangle_intersection(
    origin: &Vec3,
    direction: &Vec3,
    v0: &Vec3,
    v1: &Vec3,
    v2: &Vec3,
) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray parallel to triangle?
    if a > -TRIANGLE_EPSILON && a < TRIANGLE_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > TRIANGLE_EPSILON).then_some(t)
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Ray parameter of the hit, if any
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        ray_triangle_intersection(&ray.origin, &ray.direction, &self.v0, &self.v1, &self.v2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_hits_top_of_unit_box() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = unit_box().intersect_ray(&ray).expect("ray should hit the box");

        assert_relative_eq!(hit.t_min, 9.5);
        assert_relative_eq!(hit.t_max, 10.5);
        assert_relative_eq!(ray.point_at(hit.t_min), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_parallel_ray_outside_slab_misses() {
        // Travels along X but sits above the box
        let miss = ray_aabb_intersection(
            &Vec3::new(-5.0, 2.0, 0.0),
            &Vec3::new(1.0, 0.0, 0.0),
            &Vec3::new(-0.5, -0.5, -0.5),
            &Vec3::new(0.5, 0.5, 0.5),
        );
        assert!(miss.is_none());

        let hit = ray_aabb_intersection(
            &Vec3::new(-5.0, 0.0, 0.0),
            &Vec3::new(1.0, 0.0, 0.0),
            &Vec3::new(-0.5, -0.5, -0.5),
            &Vec3::new(0.5, 0.5, 0.5),
        )
        .unwrap();
        assert_relative_eq!(hit.t_min, 4.5);
    }

    #[test]
    fn test_ray_starting_inside_box_reports_zero_entry() {
        let hit = unit_box()
            .intersect_ray(&Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();
        assert_eq!(hit.t_min, 0.0);
        assert_relative_eq!(hit.t_max, 0.5);
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let tri = Triangle::new(
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        );
        let down = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let t = tri.intersect_ray(&down).expect("should hit on the shared edge");
        assert_relative_eq!(t, 9.5);
        assert_relative_eq!(down.point_at(t), Vec3::new(0.0, 0.5, 0.0));

        let outside = Ray::new(Vec3::new(3.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(tri.intersect_ray(&outside).is_none());
    }

    #[test]
    fn test_triangle_rejects_hit_at_origin() {
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        // Origin lies on the triangle plane
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0));
        assert!(tri.intersect_ray(&ray).is_none());

        // Parallel ray
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(tri.intersect_ray(&parallel).is_none());
    }

    #[test]
    fn test_aabb_overlap_is_inclusive() {
        let platform = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        // Touching faces count as overlap
        assert!(platform.overlaps(&Vec3::new(0.0, 1.5, 0.0), &Vec3::new(1.0, 1.0, 1.0)));
        assert!(!platform.overlaps(&Vec3::new(0.0, 1.6, 0.0), &Vec3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_contains_xz_margin() {
        let platform = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        assert!(platform.contains_xz(&Vec3::new(1.005, 50.0, 0.0), 0.01));
        assert!(!platform.contains_xz(&Vec3::new(1.05, 0.0, 0.0), 0.01));
    }
}
