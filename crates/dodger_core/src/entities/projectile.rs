//! Straight-line projectiles

use crate::foundation::math::Vec3;

/// A bullet or pellet in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Current position
    pub position: Vec3,
    /// Position before the last move, for swept collision
    pub previous_position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// Health removed on a hit
    pub damage: f32,
    /// Seconds left before expiry
    pub lifetime: f32,
    /// Fired by an enemy rather than the player
    pub is_enemy: bool,
}

impl Projectile {
    /// Creates a projectile moving along `direction` at `speed`.
    ///
    /// A zero direction produces a stationary projectile.
    pub fn new(position: Vec3, direction: Vec3, speed: f32, damage: f32, lifetime: f32, is_enemy: bool) -> Self {
        let velocity = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros) * speed;
        Self {
            position,
            previous_position: position,
            velocity,
            damage,
            lifetime,
            is_enemy,
        }
    }

    /// Advance the projectile. Returns `false` once it has expired, in which
    /// case it did not move.
    pub fn update(&mut self, delta_time: f32) -> bool {
        self.lifetime -= delta_time;
        if self.lifetime <= 0.0 {
            return false;
        }
        self.previous_position = self.position;
        self.position += self.velocity * delta_time;
        true
    }
}
