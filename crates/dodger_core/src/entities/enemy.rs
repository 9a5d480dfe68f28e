//! Enemy AI
//!
//! Each enemy runs a small awareness state machine fed by sight checks, then
//! picks a movement mode (hold, direct chase, or graph path to the last known
//! player position) and integrates itself against the platforms.
//!
//! | from      | event                              | to        |
//! |-----------|------------------------------------|-----------|
//! | Unaware   | player visible                     | Engaged   |
//! | Engaged   | sight lost (alert fires)           | Searching |
//! | Searching | player visible                     | Engaged   |
//! | Searching | memory window elapsed              | Unaware   |
//! | Searching | reached last known position        | Unaware   |

use crate::config::{EnemyConfig, PhysicsConfig};
use crate::foundation::math::{horizontal, Vec3};
use crate::navigation::NavigationGraph;
use crate::physics::platform::Platform;
use crate::physics::raycast::has_line_of_sight;
use super::weapon::{Weapon, WeaponKind};

/// Distances below this are treated as "already there"
const ARRIVAL_EPSILON: f32 = 0.1;

/// What an enemy knows about the player
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Awareness {
    /// Has not seen the player, or has forgotten
    #[default]
    Unaware,
    /// Player currently in sight
    Engaged,
    /// Lost sight, hunting the last known position
    Searching {
        /// Seconds since the player was last visible
        since_last_seen: f32,
        /// Seconds since the alert fired, clamped to the alert duration
        alert_elapsed: f32,
    },
}

impl Awareness {
    /// Whether the player is currently in sight or remembered
    pub fn has_seen_player(&self) -> bool {
        !matches!(self, Awareness::Unaware)
    }

    /// Whether the alert state is active
    pub fn is_alerted(&self) -> bool {
        matches!(self, Awareness::Searching { .. })
    }
}

/// Result of one AI update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnemyUpdate {
    /// Sight of the player was lost this tick
    pub alerted: bool,
    /// The enemy fell out of the world this tick
    pub fell: bool,
}

/// An AI-controlled body with a weapon
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Body center
    pub position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// Resting on a surface this tick
    pub on_ground: bool,
    size: Vec3,
    look_direction: Vec3,
    health: f32,
    weapon: Weapon,
    weapon_dropped: bool,
    awareness: Awareness,
    last_seen_position: Vec3,
    path: Vec<Vec3>,
    waypoint_index: usize,
    path_timer: f32,
    nav_warning_logged: bool,
    config: EnemyConfig,
    physics: PhysicsConfig,
}

impl Enemy {
    /// Create an unaware enemy carrying a full weapon of `kind`
    pub fn new(position: Vec3, kind: WeaponKind, config: EnemyConfig, physics: PhysicsConfig) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            on_ground: false,
            size: config.size,
            look_direction: Vec3::new(0.0, 0.0, -1.0),
            health: config.max_health,
            weapon: Weapon::with_reserve(kind, config.reserve_ammo),
            weapon_dropped: false,
            awareness: Awareness::Unaware,
            last_seen_position: position,
            path: Vec::new(),
            waypoint_index: 0,
            path_timer: 0.0,
            nav_warning_logged: false,
            config,
            physics,
        }
    }

    /// Run one AI and physics step. Dead enemies do nothing.
    pub fn update(
        &mut self,
        delta_time: f32,
        player_position: &Vec3,
        nav_graph: &NavigationGraph,
        platforms: &[Platform],
    ) -> EnemyUpdate {
        let mut report = EnemyUpdate::default();
        if !self.is_alive() {
            return report;
        }

        let to_player = player_position - self.position;
        let distance = to_player.magnitude();
        let has_los = self.line_of_sight(player_position, platforms);
        let can_see = distance < self.config.detection_range && has_los;

        report.alerted = self.update_awareness(delta_time, can_see, player_position);
        if can_see && distance > ARRIVAL_EPSILON {
            self.look_direction = to_player / distance;
        }

        self.weapon.update(delta_time);
        if self.weapon.current_ammo() == 0 && !self.weapon.is_reloading() {
            self.weapon.reload();
        }

        self.update_movement(delta_time, player_position, distance, has_los, nav_graph);
        report.fell = self.apply_physics(delta_time, platforms);
        report
    }

    /// Advance the awareness state machine. Returns `true` on the tick sight
    /// is lost.
    fn update_awareness(&mut self, delta_time: f32, can_see: bool, player_position: &Vec3) -> bool {
        if can_see {
            self.awareness = Awareness::Engaged;
            self.last_seen_position = *player_position;
            return false;
        }

        let (since_last_seen, alert_elapsed, alerted) = match self.awareness {
            Awareness::Unaware => return false,
            Awareness::Engaged => (delta_time, delta_time, true),
            Awareness::Searching {
                since_last_seen,
                alert_elapsed,
            } => (since_last_seen + delta_time, alert_elapsed + delta_time, false),
        };

        self.awareness = if since_last_seen > self.config.memory_duration {
            Awareness::Unaware
        } else {
            Awareness::Searching {
                since_last_seen,
                alert_elapsed: alert_elapsed.min(self.config.alert_duration),
            }
        };
        alerted
    }

    fn update_movement(
        &mut self,
        delta_time: f32,
        player_position: &Vec3,
        distance: f32,
        has_los: bool,
        nav_graph: &NavigationGraph,
    ) {
        if !nav_graph.is_valid() {
            if !self.nav_warning_logged {
                log::warn!("Enemy has no navigation graph, holding position");
                self.nav_warning_logged = true;
            }
            self.stop();
            return;
        }

        let has_seen = self.awareness.has_seen_player();
        if distance > self.config.detection_range && !has_seen {
            self.stop();
            return;
        }

        if has_los {
            if distance <= self.weapon.range() {
                self.stop();
            } else {
                let flat = horizontal(&(player_position - self.position));
                let flat_distance = flat.magnitude();
                if flat_distance > ARRIVAL_EPSILON {
                    self.set_horizontal_velocity(flat / flat_distance * self.config.move_speed);
                }
                self.path.clear();
            }
            return;
        }

        self.path_timer += delta_time;
        if self.path_timer >= self.config.path_recalculate_interval {
            self.path_timer = 0.0;
            let target = if has_seen {
                self.last_seen_position
            } else {
                *player_position
            };
            self.path = nav_graph.find_path(&self.position, &target);
            self.waypoint_index = 0;
        }

        self.follow_path();

        if has_seen
            && (self.last_seen_position - self.position).magnitude() < self.config.waypoint_radius
            && self.path_exhausted()
        {
            log::debug!("Enemy reached last known player position, giving up");
            self.awareness = Awareness::Unaware;
            self.stop();
            self.path.clear();
        }
    }

    fn follow_path(&mut self) {
        let Some(mut waypoint) = self.path.get(self.waypoint_index).copied() else {
            self.stop();
            return;
        };

        let mut to_waypoint = horizontal(&(waypoint - self.position));
        if to_waypoint.magnitude() < self.config.waypoint_radius {
            self.waypoint_index += 1;
            match self.path.get(self.waypoint_index) {
                Some(next) => waypoint = *next,
                None => {
                    self.stop();
                    return;
                }
            }
            to_waypoint = horizontal(&(waypoint - self.position));
        }

        let distance = to_waypoint.magnitude();
        if distance > ARRIVAL_EPSILON {
            self.set_horizontal_velocity(to_waypoint / distance * self.config.move_speed);
        } else {
            self.stop();
        }
    }

    /// Gravity plus sub-stepped platform collision. Returns `true` if the
    /// enemy fell to its death.
    fn apply_physics(&mut self, delta_time: f32, platforms: &[Platform]) -> bool {
        self.velocity.y -= self.physics.gravity * delta_time;

        let steps = self.physics.sub_steps.max(1);
        let sub_dt = delta_time / steps as f32;
        for _ in 0..steps {
            self.position += self.velocity * sub_dt;

            self.on_ground = false;
            for platform in platforms {
                if platform.check_collision(&mut self.position, &self.size, &mut self.velocity) {
                    self.on_ground = true;
                }
            }

            if self.position.y < self.physics.fall_death_threshold {
                log::info!("Enemy fell out of the world at y={:.2}", self.position.y);
                self.health = 0.0;
                return true;
            }
        }
        false
    }

    fn line_of_sight(&self, player_position: &Vec3, platforms: &[Platform]) -> bool {
        let eye = Vec3::new(0.0, self.config.eye_height, 0.0);
        has_line_of_sight(&(self.position + eye), &(player_position + eye), platforms)
    }

    fn path_exhausted(&self) -> bool {
        self.waypoint_index >= self.path.len()
    }

    fn set_horizontal_velocity(&mut self, velocity: Vec3) {
        self.velocity.x = velocity.x;
        self.velocity.z = velocity.z;
    }

    fn stop(&mut self) {
        self.velocity.x = 0.0;
        self.velocity.z = 0.0;
    }

    /// Whether the enemy wants to shoot; the weapon still gates the fire rate
    pub fn should_shoot(&self) -> bool {
        self.is_alive() && self.awareness.has_seen_player()
    }

    /// Remove health, never below zero
    pub fn take_damage(&mut self, damage: f32) {
        self.health = (self.health - damage).max(0.0);
    }

    /// Whether health is above zero
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Get the current health
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Get the maximum health
    pub fn max_health(&self) -> f32 {
        self.config.max_health
    }

    /// Full body extents
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Get the awareness state
    pub fn awareness(&self) -> Awareness {
        self.awareness
    }

    /// Whether the player is in sight or still remembered
    pub fn has_seen_player(&self) -> bool {
        self.awareness.has_seen_player()
    }

    /// Whether the enemy is searching after losing sight
    pub fn is_alerted(&self) -> bool {
        self.awareness.is_alerted()
    }

    /// Alert indicator strength: 1 right after losing sight, fading to 0
    pub fn alert_progress(&self) -> f32 {
        match self.awareness {
            Awareness::Searching { alert_elapsed, .. } if self.config.alert_duration > 0.0 => {
                (1.0 - alert_elapsed / self.config.alert_duration).max(0.0)
            }
            _ => 0.0,
        }
    }

    /// Where the player was last seen
    pub fn last_seen_position(&self) -> Vec3 {
        self.last_seen_position
    }

    /// Horizontal facing
    pub fn look_direction(&self) -> Vec3 {
        self.look_direction
    }

    /// Waypoints of the current search path
    pub fn current_path(&self) -> &[Vec3] {
        &self.path
    }

    /// Get the weapon
    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Get the weapon mutably
    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapon
    }

    /// Whether the weapon was left as a pickup on death
    pub fn is_weapon_dropped(&self) -> bool {
        self.weapon_dropped
    }

    /// Mark the weapon as dropped
    pub fn set_weapon_dropped(&mut self, dropped: bool) {
        self.weapon_dropped = dropped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor() -> Platform {
        Platform::named("Floor", Vec3::new(0.0, -0.25, 0.0), Vec3::new(50.0, 0.5, 50.0))
    }

    fn wall() -> Platform {
        Platform::named("Wall", Vec3::new(5.0, 2.0, 0.0), Vec3::new(1.0, 4.0, 10.0))
    }

    fn enemy(kind: WeaponKind) -> Enemy {
        Enemy::new(
            Vec3::new(0.0, 0.9, 0.0),
            kind,
            EnemyConfig::default(),
            PhysicsConfig::default(),
        )
    }

    fn graph(platforms: &[Platform]) -> NavigationGraph {
        let mut graph = NavigationGraph::default();
        graph.build_from_platforms(platforms);
        graph
    }

    #[test]
    fn test_memory_decays_after_five_seconds() {
        let platforms = vec![floor(), wall()];
        let no_graph = NavigationGraph::default();
        let mut enemy = enemy(WeaponKind::Pistol);

        let visible = Vec3::new(0.0, 0.9, -10.0);
        let hidden = Vec3::new(10.0, 0.9, 0.0);

        let report = enemy.update(0.1, &visible, &no_graph, &platforms);
        assert!(!report.alerted);
        assert_eq!(enemy.awareness(), Awareness::Engaged);
        assert!(enemy.should_shoot());

        let report = enemy.update(0.1, &hidden, &no_graph, &platforms);
        assert!(report.alerted);
        assert!(enemy.is_alerted());
        assert_relative_eq!(enemy.alert_progress(), 1.0 - 0.1 / 3.0, epsilon = 1e-5);

        // 4.9 s without sight
        for _ in 1..49 {
            let report = enemy.update(0.1, &hidden, &no_graph, &platforms);
            assert!(!report.alerted, "alert fires only on the edge");
        }
        assert!(enemy.has_seen_player());
        assert_eq!(enemy.alert_progress(), 0.0);

        // 5.1 s without sight
        enemy.update(0.1, &hidden, &no_graph, &platforms);
        enemy.update(0.1, &hidden, &no_graph, &platforms);
        assert!(!enemy.has_seen_player());
        assert_eq!(enemy.awareness(), Awareness::Unaware);
        assert!(!enemy.should_shoot());
    }

    #[test]
    fn test_regaining_sight_clears_alert() {
        let platforms = vec![floor(), wall()];
        let no_graph = NavigationGraph::default();
        let mut enemy = enemy(WeaponKind::Pistol);
        let visible = Vec3::new(0.0, 0.9, -10.0);

        enemy.update(0.1, &visible, &no_graph, &platforms);
        enemy.update(0.1, &Vec3::new(10.0, 0.9, 0.0), &no_graph, &platforms);
        assert!(enemy.is_alerted());

        enemy.update(0.1, &visible, &no_graph, &platforms);
        assert!(!enemy.is_alerted());
        assert_eq!(enemy.alert_progress(), 0.0);
        assert_relative_eq!(enemy.last_seen_position(), visible);
        assert_relative_eq!(enemy.look_direction(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_rests_on_floor() {
        let platforms = vec![floor()];
        let mut enemy = enemy(WeaponKind::Pistol);
        for _ in 0..10 {
            enemy.update(0.1, &Vec3::new(40.0, 0.9, 40.0), &graph(&platforms), &platforms);
        }
        assert!(enemy.on_ground);
        assert_relative_eq!(enemy.position.y, 0.9, epsilon = 1e-4);
        assert_eq!(enemy.awareness(), Awareness::Unaware);
        assert_eq!(horizontal(&enemy.velocity), Vec3::zeros());
    }

    #[test]
    fn test_chases_visible_player_beyond_weapon_range() {
        let platforms = vec![floor()];
        let graph = graph(&platforms);
        let mut enemy = enemy(WeaponKind::AutoShotgun);

        // 25 units away: visible, beyond the 20 unit shotgun range
        enemy.update(0.016, &Vec3::new(25.0, 0.9, 0.0), &graph, &platforms);
        assert_relative_eq!(enemy.velocity.x, 6.0);
        assert_relative_eq!(enemy.velocity.z, 0.0);

        // Inside range it holds position
        enemy.update(0.016, &Vec3::new(10.0, 0.9, 0.0), &graph, &platforms);
        assert_eq!(enemy.velocity.x, 0.0);
    }

    #[test]
    fn test_hunts_last_seen_position_when_hidden() {
        // Two floor pads linked by the graph, a pillar blocking sight
        let platforms = vec![
            Platform::named("Floor_A", Vec3::new(0.0, -0.25, 0.0), Vec3::new(8.0, 0.5, 8.0)),
            Platform::named("Floor_B", Vec3::new(6.0, -0.25, 0.0), Vec3::new(8.0, 0.5, 8.0)),
            Platform::named("Pillar", Vec3::new(3.0, 4.0, 0.0), Vec3::new(1.0, 8.0, 1.0)),
        ];
        let graph = graph(&platforms);
        let mut enemy = enemy(WeaponKind::Pistol);

        // Seen once, then hidden behind the pillar
        enemy.update(0.25, &Vec3::new(0.0, 0.9, -3.0), &graph, &platforms);
        let hidden = Vec3::new(6.0, 0.9, 0.0);
        enemy.update(0.25, &hidden, &graph, &platforms);
        enemy.update(0.25, &hidden, &graph, &platforms);

        assert!(!enemy.current_path().is_empty());
        assert_eq!(*enemy.current_path().last().unwrap(), Vec3::new(0.0, 0.9, -3.0));
        assert_relative_eq!(horizontal(&enemy.velocity).magnitude(), 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_auto_reload_when_empty() {
        let platforms = vec![floor()];
        let mut enemy = enemy(WeaponKind::Pistol);
        for shot in 0..12 {
            assert!(enemy.weapon_mut().fire(shot as f32));
        }
        enemy.update(0.016, &Vec3::new(40.0, 0.9, 40.0), &graph(&platforms), &platforms);
        assert!(enemy.weapon().is_reloading());
    }

    #[test]
    fn test_fall_death() {
        let mut enemy = enemy(WeaponKind::Rifle);
        enemy.position.y = -19.5;
        enemy.velocity.y = -50.0;
        let report = enemy.update(0.05, &Vec3::zeros(), &NavigationGraph::default(), &[]);
        assert!(report.fell);
        assert!(!enemy.is_alive());

        // Dead enemies are inert
        let before = enemy.position;
        enemy.update(0.05, &Vec3::zeros(), &NavigationGraph::default(), &[]);
        assert_eq!(enemy.position, before);
    }
}
