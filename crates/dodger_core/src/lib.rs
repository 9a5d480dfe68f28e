//! # Dodger Core
//!
//! The gameplay simulation of a first-person arena shooter, with no window,
//! GPU or audio code attached.
//!
//! ## Features
//!
//! - **Mesh Collision**: Triangle-accurate floors with box fallbacks
//! - **Sub-stepped Physics**: Tunnel-free integration for fast bodies
//! - **Navigation**: A* over a graph built from level geometry
//! - **Enemy AI**: Sight, memory, alert and search behavior
//! - **Combat**: Weapons, projectiles, pickups and bullet time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dodger_core::prelude::*;
//!
//! let mut sim = Simulation::new(
//!     SimulationConfig::default(),
//!     SimulationContext::with_seed(7),
//!     Box::new(RonLevelSource::new("assets/levels")),
//!     Box::new(MemoryProgressStore::default()),
//! );
//!
//! let mut events = EventQueue::new();
//! sim.resume(&mut events);
//!
//! let input = InputState {
//!     move_forward: true,
//!     ..InputState::default()
//! };
//! for _ in 0..60 {
//!     sim.tick(1.0 / 60.0, &input, &mut events);
//! }
//!
//! for event in events.drain() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod foundation;
pub mod physics;
pub mod navigation;
pub mod entities;
pub mod level;
pub mod game;
pub mod input;
pub mod events;
pub mod config;

/// Common imports for simulation hosts
pub mod prelude {
    pub use crate::{
        config::{
            Config, ConfigError, FileProgressStore, MemoryProgressStore, Progress, ProgressStore,
            SimulationConfig,
        },
        entities::{Enemy, Player, Projectile, Weapon, WeaponKind, WeaponPickup},
        events::{EventDispatcher, EventHandler, EventQueue, EventSink, EventType, GameEvent},
        foundation::math::{Mat4, Vec3},
        game::{GameState, Simulation, SimulationContext, WeaponStatus},
        input::{HeldKeys, InputState, InputTracker},
        level::{InMemoryLevelSource, LevelData, LevelError, LevelSource, RonLevelSource},
        navigation::NavigationGraph,
        physics::{Mesh, Platform},
    };
}
