//! Headless Dodger runner
//!
//! Loads configuration and a level, then drives the simulation at a fixed
//! frame delta with a scripted player that wanders, jumps, dashes and shoots.
//! Everything the simulation reports is written to the log.

use std::path::PathBuf;

use clap::Parser;
use dodger_core::foundation::logging;
use dodger_core::prelude::*;

/// Run the Dodger simulation without a window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation config (TOML or RON); defaults are used when missing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding level_<n>.ron files
    #[arg(long, default_value = "assets/levels")]
    levels: PathBuf,

    /// Level to start on instead of the saved progress
    #[arg(long)]
    level: Option<u32>,

    /// Seed for aim spread and random enemy loadouts
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Progress file (TOML or RON); progress is not persisted when omitted
    #[arg(long)]
    progress: Option<PathBuf>,
}

/// Frames between scripted turns
const TURN_INTERVAL: u32 = 90;

/// Frames between scripted jumps
const JUMP_INTERVAL: u32 = 120;

/// Logs every event it sees and lets it through
struct LogHandler;

impl EventHandler for LogHandler {
    fn on_event(&mut self, event: &GameEvent) -> bool {
        match event {
            GameEvent::Footstep { .. } | GameEvent::MuzzleFlash { .. } | GameEvent::Smoke { .. } => {
                log::trace!("{:?}", event);
            }
            GameEvent::LevelLoaded { .. }
            | GameEvent::LevelCleared { .. }
            | GameEvent::GameWon
            | GameEvent::PlayerDied
            | GameEvent::EnemyKilled { .. }
            | GameEvent::BulletTimeStarted => log::info!("{:?}", event),
            _ => log::debug!("{:?}", event),
        }
        false
    }
}

/// Scripted player: walks forward, turns a quarter every few seconds, hops,
/// dashes at the top of each hop and keeps the trigger held
struct Script {
    tracker: InputTracker,
    heading: usize,
}

impl Script {
    const HEADINGS: [(f32, f32); 4] = [(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];

    fn new() -> Self {
        Self {
            tracker: InputTracker::default(),
            heading: 0,
        }
    }

    fn input(&mut self, frame: u32) -> InputState {
        if frame > 0 && frame % TURN_INTERVAL == 0 {
            self.heading = (self.heading + 1) % Self::HEADINGS.len();
        }
        let (x, z) = Self::HEADINGS[self.heading];

        let state = InputState {
            move_forward: true,
            fire: true,
            ..InputState::default()
        }
        .looking(Vec3::new(x, 0.0, z));

        let keys = HeldKeys {
            jump: frame % JUMP_INTERVAL == 0,
            dash: frame % JUMP_INTERVAL == 20,
            pickup: true,
            reload: frame % TURN_INTERVAL == 45,
            ..HeldKeys::default()
        };
        self.tracker.update(keys, state)
    }
}

fn main() {
    let args = Args::parse();
    logging::init();

    log::info!("Starting Dodger (seed {}, {} frames at {:.4}s)", args.seed, args.frames, args.dt);

    let config = match &args.config {
        Some(path) => SimulationConfig::load_or_default(path),
        None => SimulationConfig::default(),
    };

    let progress: Box<dyn ProgressStore> = match &args.progress {
        Some(path) => Box::new(FileProgressStore::new(path)),
        None => Box::new(MemoryProgressStore::default()),
    };

    let mut sim = Simulation::new(
        config,
        SimulationContext::with_seed(args.seed),
        Box::new(RonLevelSource::new(&args.levels)),
        progress,
    );

    let mut events = EventDispatcher::new();
    for event_type in [
        EventType::Footstep,
        EventType::WeaponFired,
        EventType::WeaponReload,
        EventType::Pickup,
        EventType::EnemyAlert,
        EventType::Explosion,
        EventType::PlayerDamaged,
        EventType::MuzzleFlash,
        EventType::LandingSmoke,
        EventType::Smoke,
        EventType::BulletTimeStarted,
        EventType::EnemyKilled,
        EventType::LevelLoaded,
        EventType::LevelCleared,
        EventType::GameWon,
        EventType::PlayerDied,
    ] {
        events.register_handler(event_type, Box::new(LogHandler));
    }

    match args.level {
        Some(index) => sim.load_level(index, &mut events),
        None => sim.resume(&mut events),
    }

    let mut script = Script::new();
    for frame in 0..args.frames {
        let input = script.input(frame);
        sim.tick(args.dt, &input, &mut events);

        match sim.state() {
            GameState::LevelWin => {
                sim.advance_level(&mut events);
            }
            GameState::GameWin => {
                log::info!("Game won after {} frames", frame + 1);
                break;
            }
            GameState::Playing | GameState::GameOver => {}
        }
    }

    let player = sim.player();
    log::info!(
        "Finished on level {} ({:?}): health {:.0}/{:.0}, {} of {} enemies alive, world time {:.2}s",
        sim.current_level(),
        sim.state(),
        player.health(),
        player.max_health(),
        sim.enemies_alive(),
        sim.enemies().len(),
        sim.world_time()
    );
    if let Some(weapon) = sim.weapon_status() {
        log::info!(
            "Holding {:?}: {}/{} loaded, {} in reserve",
            weapon.kind,
            weapon.current_ammo,
            weapon.max_ammo,
            weapon.reserve_ammo
        );
    }
}
