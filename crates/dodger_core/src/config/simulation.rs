//! Simulation tunables

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use super::Config;

/// Root configuration injected into the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Integration settings
    pub physics: PhysicsConfig,
    /// Player movement settings
    pub player: PlayerConfig,
    /// Enemy AI settings
    pub enemy: EnemyConfig,
    /// Time dilation settings
    pub bullet_time: BulletTimeConfig,
    /// Hit and round flow settings
    pub combat: CombatConfig,
    /// Navigation graph settings
    pub navigation: NavigationConfig,
}

impl Config for SimulationConfig {}

/// Integration and world limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units/s²
    pub gravity: f32,
    /// Integration passes per tick
    pub sub_steps: u32,
    /// Largest world delta integrated in one tick
    pub max_physics_delta: f32,
    /// Bodies below this Y die
    pub fall_death_threshold: f32,
    /// Landing faster than this (downwards) zeroes vertical velocity
    pub landing_reset_velocity: f32,
    /// Minimum landing speed (downwards) that kicks up smoke
    pub landing_smoke_velocity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            sub_steps: 4,
            max_physics_delta: 0.05,
            fall_death_threshold: -20.0,
            landing_reset_velocity: -10.0,
            landing_smoke_velocity: -3.0,
        }
    }
}

/// Player body and movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Full body extents
    pub size: Vec3,
    /// Eye offset above the body center
    pub eye_height: f32,
    /// Top horizontal speed
    pub move_speed: f32,
    /// Horizontal acceleration toward a held direction
    pub acceleration: f32,
    /// Horizontal deceleration with no input
    pub deceleration: f32,
    /// Upward velocity set by a jump
    pub jump_force: f32,
    /// Horizontal speed during a dash
    pub dash_speed: f32,
    /// Seconds a dash lasts
    pub dash_duration: f32,
    /// Seconds before another dash
    pub dash_cooldown: f32,
    /// Ground distance between footsteps
    pub step_distance: f32,
    /// Starting and maximum health
    pub max_health: f32,
    /// Extra height added above the resolved spawn surface
    pub spawn_buffer: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Vec3::new(0.6, 1.8, 0.6),
            eye_height: 0.7,
            move_speed: 12.0,
            acceleration: 60.0,
            deceleration: 40.0,
            jump_force: 17.0,
            dash_speed: 30.0,
            dash_duration: 1.0,
            dash_cooldown: 3.0,
            step_distance: 2.5,
            max_health: 100.0,
            spawn_buffer: 0.25,
        }
    }
}

/// Enemy body, senses and AI timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Full body extents
    pub size: Vec3,
    /// Starting and maximum health
    pub max_health: f32,
    /// Eye offset above the body center, used for line of sight
    pub eye_height: f32,
    /// Distance within which the player can be seen
    pub detection_range: f32,
    /// Horizontal chase speed
    pub move_speed: f32,
    /// Seconds an enemy remembers the player after losing sight
    pub memory_duration: f32,
    /// Seconds the alert indicator takes to fade
    pub alert_duration: f32,
    /// Seconds between path refreshes while hunting
    pub path_recalculate_interval: f32,
    /// Horizontal distance at which a waypoint counts as reached
    pub waypoint_radius: f32,
    /// Muzzle offset above the body center
    pub muzzle_height: f32,
    /// Reserve ammo each enemy weapon starts with
    pub reserve_ammo: u32,
    /// Extra height added above the resolved spawn surface
    pub spawn_buffer: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: Vec3::new(0.6, 1.8, 0.6),
            max_health: 100.0,
            eye_height: 0.7,
            detection_range: 30.0,
            move_speed: 6.0,
            memory_duration: 5.0,
            alert_duration: 3.0,
            path_recalculate_interval: 0.5,
            waypoint_radius: 1.0,
            muzzle_height: 0.5,
            reserve_ammo: 9999,
            spawn_buffer: 0.25,
        }
    }
}

/// Time dilation and its energy budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTimeConfig {
    /// Energy capacity
    pub max_energy: f32,
    /// Energy per second spent while active
    pub drain_rate: f32,
    /// Energy per second regained while inactive
    pub regen_rate: f32,
    /// Time scale while active
    pub min_scale: f32,
    /// Exponential smoothing rate of the time scale
    pub smoothing: f32,
    /// Energy required to activate
    pub activation_threshold: f32,
}

impl Default for BulletTimeConfig {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            drain_rate: 25.0,
            regen_rate: 15.0,
            min_scale: 0.2,
            smoothing: 10.0,
            activation_threshold: 10.0,
        }
    }
}

/// Hits, pickups and round flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Projectile-to-body distance that counts as a hit
    pub hit_radius: f32,
    /// Distance within which a weapon can be picked up
    pub pickup_range: f32,
    /// Wall-clock seconds between player death and level reset
    pub death_reset_delay: f32,
    /// Distance in front of the eye where player shots spawn
    pub muzzle_offset: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            hit_radius: 1.0,
            pickup_range: 2.0,
            death_reset_delay: 2.0,
            muzzle_offset: 0.5,
        }
    }
}

/// Navigation graph construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Largest center distance linked by an edge
    pub max_walk_distance: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_walk_distance: crate::navigation::MAX_WALK_DISTANCE,
        }
    }
}
