//! The player body: movement model, dash, health and inventory
//!
//! Integration against platforms happens in [`crate::physics::PhysicsSystem`];
//! this module only turns input into velocity and advances timers.

use crate::config::{PhysicsConfig, PlayerConfig};
use crate::foundation::math::{flatten_direction, horizontal, Vec3};
use crate::input::InputState;
use super::inventory::Inventory;

/// Horizontal speed below which no footsteps accumulate
const FOOTSTEP_MIN_SPEED: f32 = 0.1;

/// Velocity differences below this snap straight to the target
const VELOCITY_SNAP: f32 = 0.001;

/// Input direction length needed to dash along it instead of the view
const DASH_INPUT_THRESHOLD: f32 = 0.1;

/// Height of the default position the player returns to on reset
const RESET_HEIGHT: f32 = 2.0;

/// Dash state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashState {
    /// Not dashing; a dash may start once the cooldown has run out
    Ready,
    /// Dash in progress
    Dashing {
        /// Seconds of dash left
        remaining: f32,
        /// Locked horizontal direction
        direction: Vec3,
    },
}

/// The player-controlled body
#[derive(Debug, Clone)]
pub struct Player {
    /// Body center
    pub position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// Resting on a surface this tick
    pub on_ground: bool,
    size: Vec3,
    health: f32,
    inventory: Inventory,
    step_counter: f32,
    dash: DashState,
    dash_cooldown: f32,
    config: PlayerConfig,
    gravity: f32,
    fall_death_threshold: f32,
}

impl Player {
    /// Create a player at `position` with full health and the starting loadout
    pub fn new(position: Vec3, config: PlayerConfig, physics: &PhysicsConfig) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            on_ground: false,
            size: config.size,
            health: config.max_health,
            inventory: Inventory::new(),
            step_counter: 0.0,
            dash: DashState::Ready,
            dash_cooldown: 0.0,
            config,
            gravity: physics.gravity,
            fall_death_threshold: physics.fall_death_threshold,
        }
    }

    /// Turn this tick's input into velocity
    pub fn process_movement(&mut self, input: &InputState, delta_time: f32) {
        if !self.is_alive() {
            return;
        }

        let flat_front = flatten_direction(&input.view_forward).unwrap_or_else(Vec3::zeros);
        let flat_right = flatten_direction(&input.view_right).unwrap_or_else(Vec3::zeros);
        let mut wish = Vec3::zeros();
        if input.move_forward {
            wish += flat_front;
        }
        if input.move_backward {
            wish -= flat_front;
        }
        if input.move_right {
            wish += flat_right;
        }
        if input.move_left {
            wish -= flat_right;
        }

        if input.dash && self.dash_cooldown <= 0.0 && !self.is_dashing() && !self.on_ground {
            let direction = if wish.magnitude() > DASH_INPUT_THRESHOLD {
                wish.normalize()
            } else {
                flat_front
            };
            self.dash = DashState::Dashing {
                remaining: self.config.dash_duration,
                direction,
            };
            self.dash_cooldown = self.config.dash_cooldown;
            log::debug!("Dash started towards ({:.2}, {:.2})", direction.x, direction.z);
        }

        if let DashState::Dashing { direction, .. } = self.dash {
            self.velocity.x = direction.x * self.config.dash_speed;
            self.velocity.z = direction.z * self.config.dash_speed;
            return;
        }

        let (target_dir, accel) = match wish.try_normalize(0.0) {
            Some(dir) => (dir, self.config.acceleration),
            None => (Vec3::zeros(), self.config.deceleration),
        };
        let target = target_dir * self.config.move_speed;
        let mut current = horizontal(&self.velocity);

        let diff = target - current;
        let diff_len = diff.magnitude();
        if diff_len > VELOCITY_SNAP {
            current += diff / diff_len * (accel * delta_time).min(diff_len);
        } else {
            current = target;
        }
        self.velocity.x = current.x;
        self.velocity.z = current.z;

        if input.jump && self.on_ground {
            self.velocity.y = self.config.jump_force;
            self.on_ground = false;
        }

        if self.on_ground {
            let speed = horizontal(&self.velocity).magnitude();
            if speed > FOOTSTEP_MIN_SPEED {
                self.step_counter += speed * delta_time;
            }
        }
    }

    /// Gravity, fall death, dash and weapon timers
    pub fn update(&mut self, delta_time: f32) {
        if !self.on_ground {
            self.velocity.y -= self.gravity * delta_time;
        } else if self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }

        if self.position.y < self.fall_death_threshold {
            self.health = 0.0;
        }

        if let DashState::Dashing { remaining, direction } = self.dash {
            let remaining = remaining - delta_time;
            self.dash = if remaining <= 0.0 {
                DashState::Ready
            } else {
                DashState::Dashing { remaining, direction }
            };
        }
        if self.dash_cooldown > 0.0 {
            self.dash_cooldown -= delta_time;
        }

        self.inventory.update(delta_time);
    }

    /// Consume one accumulated step distance. Returns `true` when a footstep
    /// is due.
    pub fn check_footstep(&mut self) -> bool {
        if self.step_counter >= self.config.step_distance {
            self.step_counter -= self.config.step_distance;
            return true;
        }
        false
    }

    /// Remove health, never below zero
    pub fn take_damage(&mut self, damage: f32) {
        self.health = (self.health - damage).max(0.0);
    }

    /// Force the health to zero
    pub fn kill(&mut self) {
        self.health = 0.0;
    }

    /// Whether health is above zero
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Restore health and loadout and move back to the default position
    pub fn reset(&mut self) {
        self.health = self.config.max_health;
        self.velocity = Vec3::zeros();
        self.position = Vec3::new(0.0, RESET_HEIGHT, 0.0);
        self.on_ground = false;
        self.inventory = Inventory::new();
        self.step_counter = 0.0;
        self.dash = DashState::Ready;
        self.dash_cooldown = 0.0;
    }

    /// Cancel a dash in progress
    pub fn stop_dash(&mut self) {
        self.dash = DashState::Ready;
    }

    /// Whether a dash is in progress
    pub fn is_dashing(&self) -> bool {
        matches!(self.dash, DashState::Dashing { .. })
    }

    /// Seconds until the next dash is allowed
    pub fn dash_cooldown(&self) -> f32 {
        self.dash_cooldown
    }

    /// Camera position; player shots start here
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.config.eye_height, 0.0)
    }

    /// Point projectiles are tested against, half a body height above the
    /// position
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.size.y * 0.5, 0.0)
    }

    /// Full body extents
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Get the current health
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Get the maximum health
    pub fn max_health(&self) -> f32 {
        self.config.max_health
    }

    /// Get the inventory
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Get the inventory mutably
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn player() -> Player {
        Player::new(Vec3::new(0.0, 0.9, 0.0), PlayerConfig::default(), &PhysicsConfig::default())
    }

    fn forward() -> InputState {
        InputState {
            move_forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_acceleration_does_not_overshoot() {
        let mut player = player();
        player.on_ground = true;

        player.process_movement(&forward(), 0.1);
        assert_relative_eq!(player.velocity.z, -6.0, epsilon = 1e-5);

        player.process_movement(&forward(), 0.5);
        assert_relative_eq!(player.velocity.z, -12.0);
        assert_relative_eq!(player.velocity.x, 0.0);
    }

    #[test]
    fn test_deceleration_when_no_input() {
        let mut player = player();
        player.on_ground = true;
        player.velocity = Vec3::new(0.0, 0.0, -12.0);

        player.process_movement(&InputState::default(), 0.1);
        assert_relative_eq!(player.velocity.z, -8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut player = player();
        let jump = InputState {
            jump: true,
            ..Default::default()
        };

        player.process_movement(&jump, 0.016);
        assert_eq!(player.velocity.y, 0.0);

        player.on_ground = true;
        player.process_movement(&jump, 0.016);
        assert_eq!(player.velocity.y, 17.0);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_dash_requires_airborne_and_cooldown() {
        let mut player = player();
        let dash = InputState {
            dash: true,
            ..Default::default()
        };

        player.on_ground = true;
        player.process_movement(&dash, 0.016);
        assert!(!player.is_dashing());

        player.on_ground = false;
        player.process_movement(&dash, 0.016);
        assert!(player.is_dashing());
        // Dashes along the view when no movement key is held
        assert_relative_eq!(player.velocity, Vec3::new(0.0, 0.0, -30.0));

        player.stop_dash();
        player.process_movement(&dash, 0.016);
        assert!(!player.is_dashing(), "cooldown should block a second dash");

        player.update(3.0);
        player.process_movement(&dash, 0.016);
        assert!(player.is_dashing());
    }

    #[test]
    fn test_dash_expires() {
        let mut player = player();
        let dash = InputState {
            dash: true,
            move_right: true,
            ..Default::default()
        };
        player.process_movement(&dash, 0.016);
        assert_relative_eq!(player.velocity.x, 30.0);

        player.update(0.6);
        assert!(player.is_dashing());
        player.update(0.5);
        assert!(!player.is_dashing());
    }

    #[test]
    fn test_gravity_only_while_airborne() {
        let mut player = player();
        player.update(0.5);
        assert_relative_eq!(player.velocity.y, -10.0);

        player.on_ground = true;
        player.update(0.5);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn test_fall_death() {
        let mut player = player();
        player.position.y = -20.5;
        player.update(0.016);
        assert!(!player.is_alive());

        // Dead players ignore input
        player.velocity = Vec3::zeros();
        player.process_movement(&forward(), 0.1);
        assert_eq!(player.velocity, Vec3::zeros());
    }

    #[test]
    fn test_footsteps_accumulate_on_ground() {
        let mut player = player();
        player.on_ground = true;
        player.velocity = Vec3::new(0.0, 0.0, -12.0);

        // 12 u/s for 0.25 s covers 3 units
        player.process_movement(&forward(), 0.25);
        assert!(player.check_footstep());
        assert!(!player.check_footstep());
    }

    #[test]
    fn test_damage_and_reset() {
        let mut player = player();
        player.take_damage(150.0);
        assert_eq!(player.health(), 0.0);

        player.reset();
        assert_eq!(player.health(), 100.0);
        assert_eq!(player.position, Vec3::new(0.0, 2.0, 0.0));
        assert!(!player.is_dashing());
        assert_relative_eq!(player.eye_position().y, 2.7);
    }
}
