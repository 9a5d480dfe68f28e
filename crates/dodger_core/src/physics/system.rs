//! Per-tick physics and combat resolution
//!
//! Order within a tick:
//! 1. Player integration in sub-steps against every platform
//! 2. Projectile flight and expiry
//! 3. Projectile hits: player, then enemies, then level geometry

use crate::config::{CombatConfig, PhysicsConfig};
use crate::entities::{Enemy, Player, Projectile, WeaponPickup};
use crate::events::{EventSink, ExplosionSize, GameEvent};
use crate::foundation::math::Vec3;
use super::platform::Platform;

/// Velocity components above this before resolution count as moving
const WALL_STOP_BEFORE: f32 = 0.1;

/// Velocity components below this after resolution count as stopped
const WALL_STOP_AFTER: f32 = 0.001;

/// Mutable view of everything the physics pass touches
pub struct PhysicsWorld<'a> {
    /// The player body
    pub player: &'a mut Player,
    /// Enemies, in spawn order
    pub enemies: &'a mut [Enemy],
    /// Projectiles in flight
    pub projectiles: &'a mut Vec<Projectile>,
    /// Weapon pickups; dropped enemy weapons are appended
    pub pickups: &'a mut Vec<WeaponPickup>,
    /// Static level geometry
    pub platforms: &'a [Platform],
}

/// Outcomes of a physics pass the caller acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhysicsReport {
    /// An enemy died while others are still alive
    pub bullet_time_requested: bool,
    /// Enemies killed this tick
    pub enemies_killed: usize,
    /// The player was hit by at least one projectile
    pub player_hit: bool,
}

/// Physics orchestrator
#[derive(Debug, Clone)]
pub struct PhysicsSystem {
    physics: PhysicsConfig,
    combat: CombatConfig,
    player_was_grounded: bool,
}

impl PhysicsSystem {
    /// Create a system with the given tunables
    pub fn new(physics: PhysicsConfig, combat: CombatConfig) -> Self {
        Self {
            physics,
            combat,
            player_was_grounded: false,
        }
    }

    /// Forget per-level state
    pub fn reset(&mut self) {
        self.player_was_grounded = false;
    }

    /// Run one tick with world-scaled `delta_time`
    pub fn update(
        &mut self,
        delta_time: f32,
        world: PhysicsWorld<'_>,
        events: &mut dyn EventSink,
    ) -> PhysicsReport {
        self.update_player(delta_time, &mut *world.player, world.platforms, events);
        update_projectiles(delta_time, &mut *world.projectiles);
        self.handle_collisions(world, events)
    }

    fn update_player(
        &mut self,
        delta_time: f32,
        player: &mut Player,
        platforms: &[Platform],
        events: &mut dyn EventSink,
    ) {
        let active_dt = delta_time.min(self.physics.max_physics_delta);
        let steps = self.physics.sub_steps.max(1);
        let sub_dt = active_dt / steps as f32;

        let size = player.size();
        let mut position = player.position;
        let mut velocity = player.velocity;
        let impact_speed = velocity.y;
        let mut grounded = false;

        for _ in 0..steps {
            position += velocity * sub_dt;

            let before = velocity;
            for platform in platforms {
                if platform.check_collision(&mut position, &size, &mut velocity) {
                    grounded = true;
                    if velocity.y < self.physics.landing_reset_velocity {
                        velocity.y = 0.0;
                    }
                }
            }

            if player.is_dashing() && hit_wall(&before, &velocity) {
                log::debug!("Dash stopped by a wall");
                player.stop_dash();
                break;
            }
        }

        player.position = position;
        player.velocity = velocity;
        player.on_ground = grounded;

        if position.y < self.physics.fall_death_threshold && player.is_alive() {
            log::info!("Player fell out of the world at y={:.2}", position.y);
            player.kill();
        }

        if grounded && !self.player_was_grounded && impact_speed < self.physics.landing_smoke_velocity {
            events.emit(GameEvent::LandingSmoke { position });
        }
        self.player_was_grounded = grounded;
    }

    fn handle_collisions(&self, world: PhysicsWorld<'_>, events: &mut dyn EventSink) -> PhysicsReport {
        let PhysicsWorld {
            player,
            enemies,
            projectiles,
            pickups,
            platforms,
        } = world;
        let mut report = PhysicsReport::default();
        let radius = self.combat.hit_radius;

        let in_flight = std::mem::take(projectiles);
        for projectile in in_flight {
            let position = projectile.position;

            let hit = if projectile.is_enemy {
                if (position - player.center()).magnitude() < radius {
                    player.take_damage(projectile.damage);
                    events.emit(GameEvent::PlayerDamaged {
                        amount: projectile.damage,
                        source: position,
                    });
                    events.emit(GameEvent::Smoke { position: player.position });
                    report.player_hit = true;
                    true
                } else {
                    false
                }
            } else {
                match enemies
                    .iter()
                    .position(|e| e.is_alive() && (position - e.position).magnitude() < radius)
                {
                    Some(index) => {
                        self.damage_enemy(index, &projectile, enemies, pickups, &mut report, events);
                        true
                    }
                    None => false,
                }
            };

            let hit = hit || {
                let blocked = platforms
                    .iter()
                    .any(|p| p.check_ray_collision(&projectile.previous_position, &position));
                if blocked {
                    log::trace!(
                        "Projectile hit platform at ({:.2}, {:.2}, {:.2})",
                        position.x,
                        position.y,
                        position.z
                    );
                    events.emit(GameEvent::Explosion {
                        position,
                        size: ExplosionSize::Small,
                    });
                }
                blocked
            };

            if !hit {
                projectiles.push(projectile);
            }
        }

        report
    }

    fn damage_enemy(
        &self,
        index: usize,
        projectile: &Projectile,
        enemies: &mut [Enemy],
        pickups: &mut Vec<WeaponPickup>,
        report: &mut PhysicsReport,
        events: &mut dyn EventSink,
    ) {
        let enemy = &mut enemies[index];
        enemy.take_damage(projectile.damage);
        events.emit(GameEvent::Explosion {
            position: projectile.position,
            size: ExplosionSize::Large,
        });

        if enemy.is_alive() {
            return;
        }

        let position: Vec3 = enemy.position;
        log::info!("Enemy {} killed", index);
        events.emit(GameEvent::EnemyKilled { enemy: index, position });
        report.enemies_killed += 1;

        if !enemy.is_weapon_dropped() {
            pickups.push(
                WeaponPickup::new(position, enemy.weapon().kind()).with_range(self.combat.pickup_range),
            );
            enemy.set_weapon_dropped(true);
        }

        let others_alive = enemies
            .iter()
            .enumerate()
            .any(|(other, e)| other != index && e.is_alive());
        if others_alive {
            report.bullet_time_requested = true;
        }
    }
}

/// Move projectiles and drop expired ones
fn update_projectiles(delta_time: f32, projectiles: &mut Vec<Projectile>) {
    projectiles.retain_mut(|projectile| projectile.update(delta_time));
}

/// A previously moving horizontal axis was zeroed by collision
fn hit_wall(before: &Vec3, after: &Vec3) -> bool {
    let stopped = |b: f32, a: f32| b.abs() > WALL_STOP_BEFORE && a.abs() < WALL_STOP_AFTER;
    stopped(before.x, after.x) || stopped(before.z, after.z)
}
