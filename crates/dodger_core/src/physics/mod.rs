//! Physics module for collision detection and response
//!
//! Static level geometry is a list of [`Platform`]s. Bodies are integrated in
//! sub-steps and pushed out of platforms after every step; projectiles are
//! swept against them once per tick.

pub mod collision;
pub mod platform;
pub mod raycast;
pub mod system;

pub use collision::{Aabb, Mesh, Ray};
pub use platform::{Platform, PENETRATION_THRESHOLD, STEP_HEIGHT};
pub use raycast::{has_line_of_sight, raycast_platforms, PlatformHit};
pub use system::{PhysicsReport, PhysicsSystem, PhysicsWorld};
