//! Bullet time: an energy-gated slowdown of world time
//!
//! Energy drains while active and regenerates while idle, always on wall-clock
//! time. The world time scale eases towards its target exponentially so the
//! slowdown fades in and out.

use crate::config::BulletTimeConfig;
use crate::foundation::math::mix;

/// Bullet-time energy and world time scale
#[derive(Debug, Clone)]
pub struct BulletTime {
    config: BulletTimeConfig,
    active: bool,
    energy: f32,
    scale: f32,
}

impl BulletTime {
    /// Inactive with a full tank
    pub fn new(config: BulletTimeConfig) -> Self {
        Self {
            config,
            active: false,
            energy: config.max_energy,
            scale: 1.0,
        }
    }

    /// Back to inactive, full energy and real-time speed
    pub fn reset(&mut self) {
        self.active = false;
        self.energy = self.config.max_energy;
        self.scale = 1.0;
    }

    /// Activate if idle with more than the activation threshold of energy.
    /// Returns whether bullet time started.
    pub fn trigger(&mut self) -> bool {
        if self.active || self.energy <= self.config.activation_threshold {
            return false;
        }
        self.active = true;
        true
    }

    /// Stop immediately and snap back to real time
    pub fn deactivate(&mut self) {
        self.active = false;
        self.scale = 1.0;
    }

    /// Advance by `wall_dt` and return the world delta for this tick
    pub fn update(&mut self, wall_dt: f32) -> f32 {
        let target = if self.active { self.config.min_scale } else { 1.0 };
        let blend = (wall_dt * self.config.smoothing).clamp(0.0, 1.0);
        self.scale = mix(self.scale, target, blend);

        if self.active {
            self.energy -= self.config.drain_rate * wall_dt;
            if self.energy <= 0.0 {
                self.energy = 0.0;
                self.active = false;
                log::debug!("Bullet time ran out of energy");
            }
        } else {
            self.energy = (self.energy + self.config.regen_rate * wall_dt).min(self.config.max_energy);
        }

        wall_dt * self.scale
    }

    /// Whether the slowdown is engaged
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Get the remaining energy
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Get the energy capacity
    pub fn max_energy(&self) -> f32 {
        self.config.max_energy
    }

    /// Current world time multiplier
    pub fn time_scale(&self) -> f32 {
        self.scale
    }
}
