//! The simulation aggregate
//!
//! [`Simulation`] owns every piece of mutable world state and advances it one
//! tick at a time. A tick runs in a fixed order:
//! 1. Bullet time turns the wall-clock delta into a world delta
//! 2. Player movement, footsteps, weapon actions and pickups
//! 3. Enemy AI, then enemy fire
//! 4. Physics integration and projectile hits
//! 5. Level-clear detection
//!
//! Level files, progress persistence and event sinks are collaborators handed
//! in from outside; nothing here touches global state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Progress, ProgressStore, SimulationConfig};
use crate::entities::{Enemy, Player, Projectile, WeaponKind, WeaponPickup, WeaponSpec};
use crate::events::{EventSink, GameEvent};
use crate::foundation::math::Vec3;
use crate::input::InputState;
use crate::level::{Level, LevelSource};
use crate::navigation::NavigationGraph;
use crate::physics::{PhysicsSystem, PhysicsWorld, Platform};

pub mod bullet_time;
pub mod state;


pub use bullet_time::BulletTime;
pub use state::GameState;

/// Per-run context injected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationContext {
    /// Seed for aim spread and random enemy loadouts
    pub seed: u64,
}

impl SimulationContext {
    /// Context with the given RNG seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

/// Snapshot of the player's selected weapon for a HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStatus {
    /// Selected weapon
    pub kind: WeaponKind,
    /// Rounds in the magazine
    pub current_ammo: u32,
    /// Rounds in reserve
    pub reserve_ammo: u32,
    /// Magazine capacity
    pub max_ammo: u32,
    /// Reload in progress
    pub reloading: bool,
    /// Pump action progress in `[0, 1]`
    pub pump_progress: f32,
}

/// The whole game world
pub struct Simulation {
    config: SimulationConfig,
    levels: Box<dyn LevelSource>,
    progress: Box<dyn ProgressStore>,
    rng: StdRng,

    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    pickups: Vec<WeaponPickup>,
    platforms: Vec<Platform>,
    nav_graph: NavigationGraph,

    physics: PhysicsSystem,
    bullet_time: BulletTime,
    state: GameState,
    current_level: u32,
    level_is_fallback: bool,
    world_time: f32,
    death_timer: f32,
    nearby_pickup: Option<WeaponKind>,
}

impl Simulation {
    /// Create an empty world. Call [`Self::load_level`] or [`Self::resume`]
    /// before ticking.
    pub fn new(
        config: SimulationConfig,
        context: SimulationContext,
        levels: Box<dyn LevelSource>,
        progress: Box<dyn ProgressStore>,
    ) -> Self {
        log::debug!("Creating simulation with seed {}", context.seed);
        Self {
            config,
            levels,
            progress,
            rng: StdRng::seed_from_u64(context.seed),
            player: Player::new(Vec3::zeros(), config.player, &config.physics),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            platforms: Vec::new(),
            nav_graph: NavigationGraph::new(config.navigation.max_walk_distance),
            physics: PhysicsSystem::new(config.physics, config.combat),
            bullet_time: BulletTime::new(config.bullet_time),
            state: GameState::Playing,
            current_level: 0,
            level_is_fallback: false,
            world_time: 0.0,
            death_timer: 0.0,
            nearby_pickup: None,
        }
    }

    /// Load the level recorded in the progress store, or level 1
    pub fn resume(&mut self, events: &mut dyn EventSink) {
        let last = self.progress.load().last_level;
        self.load_level(last.max(1), events);
    }

    /// Replace the world with level `index`.
    ///
    /// A missing or broken level is logged and replaced by the built-in arena.
    pub fn load_level(&mut self, index: u32, events: &mut dyn EventSink) {
        log::info!("Loading level {}", index);
        self.current_level = index;
        self.save_progress(index);

        let level = match self.levels.load(index) {
            Ok(data) => Level::build(&data, &self.config, &mut self.rng),
            Err(e) => {
                log::warn!("Level {} unavailable ({}), falling back to the built-in arena", index, e);
                Level::fallback()
            }
        };
        self.install(level);

        self.bullet_time.reset();
        self.nav_graph.build_from_platforms(&self.platforms);
        log::info!(
            "Navigation graph built with {} nodes and {} edges",
            self.nav_graph.nodes().len(),
            self.nav_graph.edges().len()
        );

        self.state = GameState::Playing;
        events.emit(GameEvent::LevelLoaded {
            index,
            fallback: self.level_is_fallback,
        });
    }

    /// Reload the current level, level 1 if none is loaded
    pub fn reset_level(&mut self, events: &mut dyn EventSink) {
        let index = self.current_level.max(1);
        self.load_level(index, events);
    }

    /// Move on after a level win. Returns `false` in any other state.
    pub fn advance_level(&mut self, events: &mut dyn EventSink) -> bool {
        if self.state != GameState::LevelWin {
            return false;
        }
        self.load_level(self.current_level + 1, events);
        true
    }

    /// Start bullet time if there is enough energy
    pub fn trigger_bullet_time(&mut self, events: &mut dyn EventSink) -> bool {
        if self.bullet_time.trigger() {
            log::info!("Bullet time activated ({:.0} energy)", self.bullet_time.energy());
            events.emit(GameEvent::BulletTimeStarted);
            true
        } else {
            false
        }
    }

    /// Advance the world by one frame of `wall_dt` seconds
    pub fn tick(&mut self, wall_dt: f32, input: &InputState, events: &mut dyn EventSink) {
        match self.state {
            GameState::Playing => {}
            GameState::GameOver => {
                self.death_timer += wall_dt;
                if self.death_timer >= self.config.combat.death_reset_delay {
                    self.reset_level(events);
                }
                return;
            }
            GameState::LevelWin | GameState::GameWin => return,
        }

        if !self.player.is_alive() {
            self.enter_game_over(events);
            return;
        }

        let world_dt = self.bullet_time.update(wall_dt);
        self.world_time += world_dt;

        self.player.process_movement(input, world_dt);
        self.player.update(world_dt);
        if self.player.check_footstep() {
            events.emit(GameEvent::Footstep {
                position: self.player.position,
            });
        }

        self.handle_weapon_input(input, events);
        self.handle_pickups(input, events);
        let any_alive = self.update_enemies(world_dt, events);

        let report = self.physics.update(
            world_dt,
            PhysicsWorld {
                player: &mut self.player,
                enemies: &mut self.enemies,
                projectiles: &mut self.projectiles,
                pickups: &mut self.pickups,
                platforms: &self.platforms,
            },
            events,
        );
        if report.bullet_time_requested {
            self.trigger_bullet_time(events);
        }

        if !any_alive && self.current_level > 0 {
            self.complete_level(events);
        }
    }

    fn install(&mut self, level: Level) {
        let Level {
            platforms,
            player_spawn,
            enemies,
            pickups,
            fallback,
        } = level;

        self.platforms = platforms;
        self.level_is_fallback = fallback;
        self.enemies = enemies
            .into_iter()
            .map(|spawn| Enemy::new(spawn.position, spawn.kind, self.config.enemy, self.config.physics))
            .collect();
        self.pickups = pickups
            .into_iter()
            .map(|spawn| WeaponPickup::new(spawn.position, spawn.kind).with_range(self.config.combat.pickup_range))
            .collect();
        self.projectiles.clear();

        self.player.reset();
        if let Some(spawn) = player_spawn {
            self.player.position = spawn;
        }

        self.physics.reset();
        self.death_timer = 0.0;
        self.nearby_pickup = None;
    }

    fn handle_weapon_input(&mut self, input: &InputState, events: &mut dyn EventSink) {
        let eye = self.player.eye_position();
        let forward = input.view_forward.try_normalize(1e-6);

        if let Some(weapon) = self.player.inventory_mut().current_weapon_mut() {
            if let Some(forward) = forward.filter(|_| input.fire) {
                if weapon.fire(self.world_time) {
                    let muzzle = eye + forward * self.config.combat.muzzle_offset;
                    spawn_volley(&mut self.projectiles, &mut self.rng, weapon.spec(), muzzle, forward, false);
                    events.emit(GameEvent::WeaponFired {
                        kind: weapon.kind(),
                        position: muzzle,
                        by_enemy: false,
                    });
                    events.emit(GameEvent::MuzzleFlash {
                        position: muzzle,
                        direction: forward,
                    });
                }
            }

            if input.reload && weapon.reload() {
                events.emit(GameEvent::WeaponReload { kind: weapon.kind() });
            }
        }

        if input.switch_weapon {
            self.player.inventory_mut().switch_weapon();
        }
    }

    fn handle_pickups(&mut self, input: &InputState, events: &mut dyn EventSink) {
        let position = self.player.position;
        self.nearby_pickup = self
            .pickups
            .iter()
            .find(|p| p.can_pickup(&position))
            .and_then(WeaponPickup::kind);

        if !input.pickup {
            return;
        }
        let Some(weapon) = self
            .pickups
            .iter_mut()
            .find(|p| p.can_pickup(&position))
            .and_then(WeaponPickup::take)
        else {
            return;
        };

        let kind = weapon.kind();
        let inventory = self.player.inventory_mut();
        let fills_secondary = inventory.secondary().is_none();
        if let Some(replaced) = inventory.add_weapon(weapon) {
            log::debug!("Dropped {} for {}", replaced.name(), kind.spec().name);
        }
        if fills_secondary {
            inventory.switch_to_secondary();
        }

        self.pickups.retain(|p| !p.is_picked_up());
        events.emit(GameEvent::Pickup { kind });
    }

    /// Run AI and enemy fire. Returns whether any enemy was alive at the start.
    fn update_enemies(&mut self, world_dt: f32, events: &mut dyn EventSink) -> bool {
        let target = self.player.position;
        let mut any_alive = false;

        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            if !enemy.is_alive() {
                continue;
            }
            any_alive = true;

            let update = enemy.update(world_dt, &target, &self.nav_graph, &self.platforms);
            if update.alerted {
                events.emit(GameEvent::EnemyAlert {
                    enemy: index,
                    position: enemy.position,
                });
            }

            if !enemy.should_shoot() {
                continue;
            }
            let muzzle = enemy.position + Vec3::new(0.0, self.config.enemy.muzzle_height, 0.0);
            let Some(aim) = (target - muzzle).try_normalize(1e-6) else {
                continue;
            };
            let weapon = enemy.weapon_mut();
            if weapon.fire(self.world_time) {
                spawn_volley(&mut self.projectiles, &mut self.rng, weapon.spec(), muzzle, aim, true);
                events.emit(GameEvent::WeaponFired {
                    kind: weapon.kind(),
                    position: muzzle,
                    by_enemy: true,
                });
                events.emit(GameEvent::MuzzleFlash {
                    position: muzzle,
                    direction: aim,
                });
            }
        }

        any_alive
    }

    fn enter_game_over(&mut self, events: &mut dyn EventSink) {
        log::info!("Player died on level {}", self.current_level);
        self.state = GameState::GameOver;
        self.bullet_time.deactivate();
        self.death_timer = 0.0;
        events.emit(GameEvent::PlayerDied);
    }

    fn complete_level(&mut self, events: &mut dyn EventSink) {
        let next = self.current_level + 1;
        if self.levels.exists(next) {
            log::info!("Level {} cleared", self.current_level);
            self.state = GameState::LevelWin;
            self.save_progress(next);
            events.emit(GameEvent::LevelCleared {
                index: self.current_level,
            });
        } else {
            log::info!("Final level {} cleared, game won", self.current_level);
            self.state = GameState::GameWin;
            events.emit(GameEvent::GameWon);
        }
    }

    fn save_progress(&mut self, last_level: u32) {
        if let Err(e) = self.progress.save(Progress { last_level }) {
            log::warn!("Could not save progress: {}", e);
        }
    }

    /// Get the game state
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Index of the loaded level, 0 before the first load
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Whether the built-in arena replaced the requested level
    pub fn is_fallback_level(&self) -> bool {
        self.level_is_fallback
    }

    /// Get the player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Enemies in spawn order, dead ones included
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Number of living enemies
    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Projectiles in flight
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Weapons lying in the world
    pub fn pickups(&self) -> &[WeaponPickup] {
        &self.pickups
    }

    /// Static level geometry
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Navigation graph of the loaded level
    pub fn navigation(&self) -> &NavigationGraph {
        &self.nav_graph
    }

    /// Get the bullet-time state
    pub fn bullet_time(&self) -> &BulletTime {
        &self.bullet_time
    }

    /// Seconds of world time since the simulation started
    pub fn world_time(&self) -> f32 {
        self.world_time
    }

    /// Kind of the first pickup in reach, for an interaction prompt
    pub fn nearby_pickup(&self) -> Option<WeaponKind> {
        self.nearby_pickup
    }

    /// Ammo and action state of the selected weapon, `None` with empty hands
    pub fn weapon_status(&self) -> Option<WeaponStatus> {
        self.player.inventory().current_weapon().map(|weapon| WeaponStatus {
            kind: weapon.kind(),
            current_ammo: weapon.current_ammo(),
            reserve_ammo: weapon.reserve_ammo(),
            max_ammo: weapon.max_ammo(),
            reloading: weapon.is_reloading(),
            pump_progress: weapon.pump_progress(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

/// Spawn one shot's projectiles with per-axis jitter of up to `spec.spread`
fn spawn_volley(
    projectiles: &mut Vec<Projectile>,
    rng: &mut StdRng,
    spec: &WeaponSpec,
    muzzle: Vec3,
    direction: Vec3,
    is_enemy: bool,
) {
    for _ in 0..spec.projectile_count {
        let mut aim = direction;
        if spec.spread > 0.0 {
            let jitter = Vec3::new(
                rng.gen_range(-spec.spread..=spec.spread),
                rng.gen_range(-spec.spread..=spec.spread),
                rng.gen_range(-spec.spread..=spec.spread),
            );
            aim = (direction + jitter).try_normalize(1e-6).unwrap_or(direction);
        }
        projectiles.push(Projectile::new(
            muzzle,
            aim,
            spec.projectile_speed,
            spec.damage,
            spec.projectile_lifetime,
            is_enemy,
        ));
    }
}
