//! Static level colliders
//!
//! A [`Platform`] is an axis-aligned box with optional triangle meshes. When
//! meshes are present they decide vertical resolution (sloped floors, stairs,
//! uneven terrain); the box always decides horizontal resolution and serves as
//! the broad phase for every query.

use std::sync::Arc;

use crate::foundation::math::{transform_point, transform_vector, Mat4, Vec3};
use super::collision::mesh::Mesh;
use super::collision::primitives::{Aabb, Ray};

/// Highest ledge a body may step onto without a jump
pub const STEP_HEIGHT: f32 = 0.5;

/// How far a body may sink below a surface and still be snapped back on top
pub const PENETRATION_THRESHOLD: f32 = 1.0;

/// Downward speed above which a body is not snapped onto a surface
const SNAP_MAX_VERTICAL_SPEED: f32 = 0.1;

/// Height above the body at which surface rays start
const SURFACE_RAY_OFFSET: f32 = 2.0;

/// Horizontal extent above which a platform is treated as a floor
const FLOOR_EXTENT: f32 = 10.0;

/// Segments shorter than this never collide
const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// A static collider created at level load and never modified afterwards
#[derive(Debug, Clone)]
pub struct Platform {
    name: String,
    bounds: Aabb,
    meshes: Vec<Arc<Mesh>>,
    transform: Mat4,
    inverse: Mat4,
    is_floor: bool,
}

impl Platform {
    /// Creates a box-only platform
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self::named("Platform", position, size)
    }

    /// Creates a box-only platform with a name
    pub fn named(name: impl Into<String>, position: Vec3, size: Vec3) -> Self {
        let name = name.into();
        let is_floor = detect_floor(&name, &size);
        Self {
            name,
            bounds: Aabb::new(position, size),
            meshes: Vec::new(),
            transform: Mat4::identity(),
            inverse: Mat4::identity(),
            is_floor,
        }
    }

    /// Creates a platform backed by meshes with a world transform.
    ///
    /// `position` and `size` are the world-space bounds of the geometry. A
    /// transform that cannot be inverted leaves the platform box-only.
    pub fn with_meshes(
        name: impl Into<String>,
        position: Vec3,
        size: Vec3,
        meshes: Vec<Arc<Mesh>>,
        transform: Mat4,
    ) -> Self {
        let mut platform = Self::named(name, position, size);
        match transform.try_inverse() {
            Some(inverse) => {
                for mesh in &meshes {
                    let malformed = mesh.malformed_triangle_count();
                    if malformed > 0 {
                        log::warn!(
                            "Platform '{}': {} triangle(s) reference missing vertices and will be ignored",
                            platform.name,
                            malformed
                        );
                    }
                }
                platform.meshes = meshes.into_iter().filter(|m| !m.is_empty()).collect();
                platform.transform = transform;
                platform.inverse = inverse;
            }
            None => {
                log::warn!(
                    "Platform '{}': mesh transform is not invertible, using box collision only",
                    platform.name
                );
            }
        }
        platform
    }

    /// Creates a mesh platform whose bounds are computed from the transformed geometry
    pub fn from_mesh(name: impl Into<String>, mesh: Arc<Mesh>, transform: Mat4) -> Self {
        let mut min = Vec3::repeat(f32::MAX);
        let mut max = Vec3::repeat(f32::MIN);
        for vertex in &mesh.vertices {
            let world = transform_point(&transform, vertex);
            min = min.inf(&world);
            max = max.sup(&world);
        }
        if mesh.vertices.is_empty() {
            min = Vec3::zeros();
            max = Vec3::zeros();
        }
        Self::with_meshes(name, (min + max) * 0.5, max - min, vec![mesh], transform)
    }

    /// Center of the bounding box
    pub fn position(&self) -> Vec3 {
        self.bounds.center
    }

    /// Full extents of the bounding box
    pub fn size(&self) -> Vec3 {
        self.bounds.size
    }

    /// Bounding box
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Name from the level data
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the platform is a walkable floor rather than an obstacle
    pub fn is_floor(&self) -> bool {
        self.is_floor
    }

    /// Whether triangle geometry backs this platform
    pub fn has_mesh(&self) -> bool {
        !self.meshes.is_empty()
    }

    /// Meshes attached to this platform
    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    /// World transform of the meshes
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Raycast against this platform.
    ///
    /// Returns the world distance to the closest hit, or `None` when nothing
    /// is hit within `max_distance`. Box-only platforms report the box entry
    /// distance (zero when the ray starts inside).
    pub fn raycast(&self, origin: &Vec3, direction: &Vec3, max_distance: f32) -> Option<f32> {
        let slab = self.bounds.intersect_ray(&Ray::new(*origin, *direction))?;
        if slab.t_min > max_distance {
            return None;
        }

        if !self.has_mesh() {
            return Some(slab.t_min.max(0.0));
        }

        let local_origin = transform_point(&self.inverse, origin);
        let local_dir = transform_vector(&self.inverse, direction);
        let scale = local_dir.magnitude();
        if scale <= MIN_SEGMENT_LENGTH {
            return None;
        }
        let local_ray = Ray::new(local_origin, local_dir / scale);

        let world_t = self.closest_mesh_hit(&local_ray)? / scale;
        (world_t <= max_distance).then_some(world_t)
    }

    /// Precise surface height below `current_y + 2` at the XZ of `xz_pos`.
    ///
    /// Box-only platforms report their top face. Mesh platforms report the
    /// world Y of the closest triangle hit, or `None` when the ray misses
    /// all geometry.
    pub fn surface_height(&self, xz_pos: &Vec3, current_y: f32) -> Option<f32> {
        if !self.has_mesh() {
            return Some(self.bounds.top());
        }

        let origin = Vec3::new(xz_pos.x, current_y + SURFACE_RAY_OFFSET, xz_pos.z);
        let local_ray = Ray::new(
            transform_point(&self.inverse, &origin),
            transform_vector(&self.inverse, &Vec3::new(0.0, -1.0, 0.0)),
        );

        let t = self.closest_mesh_hit(&local_ray)?;
        Some(transform_point(&self.transform, &local_ray.point_at(t)).y)
    }

    /// Resolve a body against this platform.
    ///
    /// Moves `position` and clips `velocity` so the body no longer penetrates.
    /// Returns `true` when the body ends up standing on the platform.
    pub fn check_collision(&self, position: &mut Vec3, size: &Vec3, velocity: &mut Vec3) -> bool {
        if !self.bounds.overlaps(position, size) {
            return false;
        }

        if self.has_mesh() {
            let bottom = position.y - size.y * 0.5;
            match self.surface_height(position, position.y) {
                Some(height) => {
                    if within_step(bottom, height) {
                        snap_to_surface(position, size, velocity, height);
                        return true;
                    }
                    // Well below the surface of a non-floor mesh: it is a solid
                    // obstacle such as a column, so push out with the box.
                    if self.is_floor || bottom >= height - STEP_HEIGHT {
                        return false;
                    }
                }
                None => {
                    if !self.is_floor {
                        return false;
                    }
                    // Thin floor geometry the ray slipped past
                    let top = self.bounds.top();
                    if within_step(bottom, top) {
                        snap_to_surface(position, size, velocity, top);
                        return true;
                    }
                    return false;
                }
            }
        }

        self.resolve_box(position, size, velocity)
    }

    /// Whether the segment `start -> end` hits this platform
    pub fn check_ray_collision(&self, start: &Vec3, end: &Vec3) -> bool {
        let delta = end - start;
        let distance = delta.magnitude();
        if distance < MIN_SEGMENT_LENGTH {
            return false;
        }
        let direction = delta / distance;

        let Some(slab) = self.bounds.intersect_ray(&Ray::new(*start, direction)) else {
            return false;
        };
        if slab.t_min > distance {
            return false;
        }

        if !self.has_mesh() {
            return true;
        }

        let local_origin = transform_point(&self.inverse, start);
        let local_delta = transform_vector(&self.inverse, &delta);
        let local_distance = local_delta.magnitude();
        if local_distance < MIN_SEGMENT_LENGTH {
            return false;
        }
        let local_ray = Ray::new(local_origin, local_delta / local_distance);

        self.meshes
            .iter()
            .any(|mesh| mesh.any_hit_within(&local_ray, local_distance))
    }

    fn closest_mesh_hit(&self, local_ray: &Ray) -> Option<f32> {
        self.meshes
            .iter()
            .filter_map(|mesh| mesh.closest_hit(local_ray))
            .min_by(f32::total_cmp)
    }

    /// Minimum-penetration box resolution
    fn resolve_box(&self, position: &mut Vec3, size: &Vec3, velocity: &mut Vec3) -> bool {
        let center = self.bounds.center;
        let extent = self.bounds.size;
        let overlap = |axis: usize| {
            (position[axis] + size[axis] * 0.5 - (center[axis] - extent[axis] * 0.5))
                .min(center[axis] + extent[axis] * 0.5 - (position[axis] - size[axis] * 0.5))
        };
        let (overlap_x, overlap_y, overlap_z) = (overlap(0), overlap(1), overlap(2));

        if overlap_y < overlap_x && overlap_y < overlap_z {
            if position.y > center.y {
                position.y = center.y + extent.y * 0.5 + size.y * 0.5;
                velocity.y = velocity.y.max(0.0);
                return true;
            }
            position.y = center.y - extent.y * 0.5 - size.y * 0.5;
            velocity.y = velocity.y.min(0.0);
        } else if overlap_x < overlap_z {
            let sign = if position.x > center.x { 1.0 } else { -1.0 };
            position.x = center.x + (extent.x * 0.5 + size.x * 0.5) * sign;
            velocity.x = 0.0;
        } else {
            let sign = if position.z > center.z { 1.0 } else { -1.0 };
            position.z = center.z + (extent.z * 0.5 + size.z * 0.5) * sign;
            velocity.z = 0.0;
        }

        false
    }
}

fn detect_floor(name: &str, size: &Vec3) -> bool {
    let upper = name.to_uppercase();
    upper.contains("FLOOR")
        || upper.contains("GROUND")
        || upper.contains("RAMP")
        || size.x > FLOOR_EXTENT
        || size.z > FLOOR_EXTENT
}

fn within_step(bottom: f32, surface: f32) -> bool {
    bottom <= surface + STEP_HEIGHT && bottom >= surface - PENETRATION_THRESHOLD
}

fn snap_to_surface(position: &mut Vec3, size: &Vec3, velocity: &mut Vec3, surface: f32) {
    if velocity.y <= SNAP_MAX_VERTICAL_SPEED {
        position.y = surface + size.y * 0.5;
        velocity.y = velocity.y.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body_size() -> Vec3 {
        Vec3::new(0.6, 1.8, 0.6)
    }

    fn unit_cube_platform() -> Platform {
        Platform::from_mesh(
            "Crate",
            Arc::new(Mesh::cuboid(Vec3::new(1.0, 1.0, 1.0))),
            Mat4::identity(),
        )
    }

    /// 20x20 mesh floor whose top surface is at y = 0, with bounds reaching
    /// slightly above the surface
    fn mesh_floor() -> Platform {
        Platform::with_meshes(
            "Floor",
            Vec3::new(0.0, -0.4, 0.0),
            Vec3::new(20.0, 1.2, 20.0),
            vec![Arc::new(Mesh::cuboid(Vec3::new(20.0, 1.0, 20.0)))],
            Mat4::new_translation(&Vec3::new(0.0, -0.5, 0.0)),
        )
    }

    #[test]
    fn test_floor_detection() {
        assert!(Platform::named("Ground_01", Vec3::zeros(), Vec3::repeat(1.0)).is_floor());
        assert!(Platform::named("ramp", Vec3::zeros(), Vec3::repeat(1.0)).is_floor());
        assert!(Platform::named("Slab", Vec3::zeros(), Vec3::new(12.0, 1.0, 1.0)).is_floor());
        assert!(!Platform::named("Column", Vec3::zeros(), Vec3::new(1.0, 6.0, 1.0)).is_floor());
    }

    #[test]
    fn test_from_mesh_computes_world_bounds() {
        let platform = Platform::from_mesh(
            "Floor",
            Arc::new(Mesh::cuboid(Vec3::new(20.0, 1.0, 20.0))),
            Mat4::new_translation(&Vec3::new(0.0, -0.5, 0.0)),
        );
        assert!(platform.has_mesh());
        assert_relative_eq!(platform.position(), Vec3::new(0.0, -0.5, 0.0));
        assert_relative_eq!(platform.size(), Vec3::new(20.0, 1.0, 20.0));
    }

    #[test]
    fn test_raycast_unit_cube_top_face() {
        let platform = unit_cube_platform();
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let down = Vec3::new(0.0, -1.0, 0.0);

        let distance = platform.raycast(&origin, &down, 100.0).expect("should hit");
        assert_relative_eq!(distance, 9.5);
        assert_relative_eq!(origin + down * distance, Vec3::new(0.0, 0.5, 0.0));

        assert!(platform.raycast(&origin, &down, 9.0).is_none());
    }

    #[test]
    fn test_raycast_scaled_mesh_returns_world_distance() {
        // Unit cube stretched to 4 units tall, centered at y = 2
        let transform = Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0))
            * Mat4::new_nonuniform_scaling(&Vec3::new(1.0, 4.0, 1.0));
        let platform = Platform::from_mesh(
            "Pillar",
            Arc::new(Mesh::cuboid(Vec3::new(1.0, 1.0, 1.0))),
            transform,
        );
        let distance = platform
            .raycast(&Vec3::new(0.0, 10.0, 0.0), &Vec3::new(0.0, -1.0, 0.0), 100.0)
            .unwrap();
        assert_relative_eq!(distance, 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_raycast_box_only_starting_inside() {
        let platform = Platform::new(Vec3::zeros(), Vec3::repeat(2.0));
        let distance = platform
            .raycast(&Vec3::zeros(), &Vec3::new(1.0, 0.0, 0.0), 10.0)
            .unwrap();
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_surface_height() {
        let box_only = Platform::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 2.0, 4.0));
        assert_eq!(box_only.surface_height(&Vec3::zeros(), 0.0), Some(2.0));

        let floor = mesh_floor();
        let height = floor.surface_height(&Vec3::new(3.0, 0.0, -2.0), 0.9).unwrap();
        assert_relative_eq!(height, 0.0, epsilon = 1e-5);

        // Outside the geometry footprint
        assert!(floor.surface_height(&Vec3::new(30.0, 0.0, 0.0), 0.9).is_none());
    }

    #[test]
    fn test_box_platform_snapping_is_idempotent() {
        let platform = Platform::new(Vec3::new(0.0, -0.25, 0.0), Vec3::new(50.0, 0.5, 50.0));
        let mut position = Vec3::new(0.0, 0.9, 0.0);
        let mut velocity = Vec3::zeros();

        for _ in 0..10 {
            assert!(platform.check_collision(&mut position, &body_size(), &mut velocity));
            assert_relative_eq!(position.y, 0.9);
            assert_relative_eq!(velocity, Vec3::zeros());
        }
    }

    #[test]
    fn test_mesh_platform_snapping_is_idempotent() {
        let platform = mesh_floor();
        let mut position = Vec3::new(2.0, 0.9, -3.0);
        let mut velocity = Vec3::zeros();

        assert!(platform.check_collision(&mut position, &body_size(), &mut velocity));
        let settled = position.y;
        assert_relative_eq!(settled, 0.9, epsilon = 1e-5);

        for _ in 0..10 {
            assert!(platform.check_collision(&mut position, &body_size(), &mut velocity));
            assert_relative_eq!(position.y, settled, epsilon = 1e-5);
        }
        assert_relative_eq!(position.x, 2.0);
        assert_relative_eq!(position.z, -3.0);
    }

    #[test]
    fn test_mesh_platform_snaps_sunken_body_up() {
        let platform = mesh_floor();
        // Bottom 0.4 below the surface, falling slowly
        let mut position = Vec3::new(1.0, 0.5, -2.0);
        let mut velocity = Vec3::new(1.0, -2.0, 0.0);

        assert!(platform.check_collision(&mut position, &body_size(), &mut velocity));
        assert_relative_eq!(position.y, 0.9, epsilon = 1e-5);
        assert_eq!(velocity.y, 0.0);
        assert_eq!(velocity.x, 1.0);
    }

    #[test]
    fn test_rising_body_is_grounded_but_not_snapped() {
        let platform = mesh_floor();
        let mut position = Vec3::new(1.0, 1.0, -2.0);
        let mut velocity = Vec3::new(0.0, 5.0, 0.0);

        assert!(platform.check_collision(&mut position, &body_size(), &mut velocity));
        assert_eq!(position.y, 1.0);
        assert_eq!(velocity.y, 5.0);
    }

    #[test]
    fn test_mesh_column_pushes_out_horizontally() {
        // Chest-high block standing on y = 0, not a floor
        let column = Platform::from_mesh(
            "Column",
            Arc::new(Mesh::cuboid(Vec3::new(1.0, 2.5, 1.0))),
            Mat4::new_translation(&Vec3::new(0.0, 1.25, 0.0)),
        );
        assert!(!column.is_floor());

        // Body centered just inside the column's +X face near the ground
        let mut position = Vec3::new(0.45, 0.9, 0.0);
        let mut velocity = Vec3::new(-3.0, 0.0, 0.0);

        let grounded = column.check_collision(&mut position, &body_size(), &mut velocity);
        assert!(!grounded);
        assert_relative_eq!(position.x, 0.8, epsilon = 1e-5);
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn test_mesh_floor_never_becomes_a_wall() {
        // Body deep below the surface of a floor mesh is ignored
        let platform = mesh_floor();
        let mut position = Vec3::new(1.0, -0.3, -2.0);
        let mut velocity = Vec3::new(2.0, 0.0, 0.0);

        assert!(!platform.check_collision(&mut position, &body_size(), &mut velocity));
        assert_eq!(position, Vec3::new(1.0, -0.3, -2.0));
        assert_eq!(velocity.x, 2.0);
    }

    #[test]
    fn test_box_side_collision_zeroes_velocity() {
        let wall = Platform::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 10.0, 10.0));
        let mut position = Vec3::new(1.3, 0.0, 0.0);
        let mut velocity = Vec3::new(30.0, 0.0, 0.0);

        assert!(!wall.check_collision(&mut position, &body_size(), &mut velocity));
        assert_relative_eq!(position.x, 1.2);
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn test_box_ceiling_collision() {
        let ceiling = Platform::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(10.0, 1.0, 10.0));
        let mut position = Vec3::new(0.0, 1.6, 0.0);
        let mut velocity = Vec3::new(0.0, 8.0, 0.0);

        assert!(!ceiling.check_collision(&mut position, &body_size(), &mut velocity));
        assert_relative_eq!(position.y, 1.6);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_no_overlap_is_noop() {
        let platform = Platform::new(Vec3::zeros(), Vec3::repeat(1.0));
        let mut position = Vec3::new(5.0, 5.0, 5.0);
        let mut velocity = Vec3::new(1.0, 1.0, 1.0);
        assert!(!platform.check_collision(&mut position, &body_size(), &mut velocity));
        assert_eq!(position, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(velocity, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_check_ray_collision() {
        let wall = Platform::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 4.0, 4.0));
        assert!(wall.check_ray_collision(&Vec3::zeros(), &Vec3::new(10.0, 0.0, 0.0)));
        assert!(!wall.check_ray_collision(&Vec3::zeros(), &Vec3::new(4.0, 0.0, 0.0)));
        // Degenerate segment
        assert!(!wall.check_ray_collision(&Vec3::new(5.0, 0.0, 0.0), &Vec3::new(5.0, 0.0, 0.0)));

        let cube = unit_cube_platform();
        assert!(cube.check_ray_collision(&Vec3::new(0.0, 3.0, 0.0), &Vec3::new(0.0, -3.0, 0.0)));
        assert!(!cube.check_ray_collision(&Vec3::new(0.0, 3.0, 0.0), &Vec3::new(0.0, 0.6, 0.0)));
    }
}
