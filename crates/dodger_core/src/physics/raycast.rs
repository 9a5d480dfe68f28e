//! Raycasts against the whole platform list
//!
//! Used for line of sight checks, spawn placement and anything else that needs
//! "what does this ray hit first" across the level.

use crate::foundation::math::Vec3;
use super::platform::Platform;

/// Segments shorter than this always have line of sight
const MIN_SIGHT_DISTANCE: f32 = 0.001;

/// Closest platform hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformHit {
    /// Distance from the ray origin along the normalized direction
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Index of the platform in the list that was cast against
    pub platform_index: usize,
}

/// Cast a ray against every platform and return the closest hit.
///
/// `direction` does not need to be normalized. Returns `None` when nothing is
/// hit strictly closer than `max_distance`, or the direction is zero.
pub fn raycast_platforms(
    origin: &Vec3,
    direction: &Vec3,
    max_distance: f32,
    platforms: &[Platform],
) -> Option<PlatformHit> {
    let direction = direction.try_normalize(f32::EPSILON)?;
    let mut closest: Option<PlatformHit> = None;
    let mut limit = max_distance;

    for (index, platform) in platforms.iter().enumerate() {
        if let Some(t) = platform.raycast(origin, &direction, limit) {
            if t >= 0.0 && t < limit {
                limit = t;
                closest = Some(PlatformHit {
                    distance: t,
                    point: origin + direction * t,
                    platform_index: index,
                });
            }
        }
    }

    closest
}

/// Whether nothing in `platforms` blocks the straight segment `from -> to`
pub fn has_line_of_sight(from: &Vec3, to: &Vec3, platforms: &[Platform]) -> bool {
    let delta = to - from;
    let distance = delta.magnitude();
    if distance < MIN_SIGHT_DISTANCE {
        return true;
    }
    raycast_platforms(from, &delta, distance, platforms).is_none()
}
