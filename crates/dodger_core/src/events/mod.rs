//! Gameplay notifications for presentation layers
//!
//! The simulation reports side effects (sounds to play, particles to spawn,
//! HUD indicators) by emitting [`GameEvent`]s into an [`EventSink`]. Sinks are
//! fire-and-forget: nothing in the simulation depends on what a sink does.
//! - [`EventQueue`] records events in emission order for later draining
//! - [`EventDispatcher`] forwards each event to handlers registered for its type

use std::collections::HashMap;

use crate::entities::weapon::WeaponKind;
use crate::foundation::math::Vec3;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Player footstep on the ground
    Footstep,
    /// A weapon fired a shot
    WeaponFired,
    /// A reload started
    WeaponReload,
    /// The player picked up a weapon
    Pickup,
    /// An enemy lost sight of the player
    EnemyAlert,
    /// A projectile struck something
    Explosion,
    /// The player was hit
    PlayerDamaged,
    /// Muzzle flash at a firing weapon
    MuzzleFlash,
    /// Dust from a hard landing
    LandingSmoke,
    /// Smoke puff at an impact
    Smoke,
    /// Time dilation began
    BulletTimeStarted,
    /// An enemy died
    EnemyKilled,
    /// A level finished loading
    LevelLoaded,
    /// All enemies of a level are dead and another level follows
    LevelCleared,
    /// The final level was cleared
    GameWon,
    /// The player died
    PlayerDied,
}

/// Size of an explosion effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionSize {
    /// Projectile hitting level geometry
    Small,
    /// Projectile hitting an enemy
    Large,
}

/// A side effect reported by the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The player covered another step distance on the ground
    Footstep {
        /// Player feet position
        position: Vec3,
    },
    /// A weapon fired one shot (all pellets of a shotgun blast)
    WeaponFired {
        /// Weapon that fired
        kind: WeaponKind,
        /// Muzzle position
        position: Vec3,
        /// Whether an enemy pulled the trigger
        by_enemy: bool,
    },
    /// The player's weapon started reloading
    WeaponReload {
        /// Weapon being reloaded
        kind: WeaponKind,
    },
    /// The player took a weapon from the ground
    Pickup {
        /// Weapon taken
        kind: WeaponKind,
    },
    /// An enemy lost sight of the player
    EnemyAlert {
        /// Index into the enemy list
        enemy: usize,
        /// Enemy position
        position: Vec3,
    },
    /// A projectile struck an enemy or level geometry
    Explosion {
        /// Impact position
        position: Vec3,
        /// Effect size
        size: ExplosionSize,
    },
    /// The player took a hit
    PlayerDamaged {
        /// Health removed
        amount: f32,
        /// Where the projectile was
        source: Vec3,
    },
    /// Flash at a firing muzzle
    MuzzleFlash {
        /// Muzzle position
        position: Vec3,
        /// Shot direction
        direction: Vec3,
    },
    /// The player landed hard
    LandingSmoke {
        /// Player feet position
        position: Vec3,
    },
    /// Smoke puff at an impact
    Smoke {
        /// Puff position
        position: Vec3,
    },
    /// Time dilation began
    BulletTimeStarted,
    /// An enemy died
    EnemyKilled {
        /// Index into the enemy list
        enemy: usize,
        /// Where it died
        position: Vec3,
    },
    /// A level finished loading
    LevelLoaded {
        /// Requested level index
        index: u32,
        /// Whether the built-in arena replaced it
        fallback: bool,
    },
    /// A level was cleared and another one follows
    LevelCleared {
        /// Index of the cleared level
        index: u32,
    },
    /// The final level was cleared
    GameWon,
    /// The player died
    PlayerDied,
}

impl GameEvent {
    /// Type of this event
    pub fn event_type(&self) -> EventType {
        match self {
            GameEvent::Footstep { .. } => EventType::Footstep,
            GameEvent::WeaponFired { .. } => EventType::WeaponFired,
            GameEvent::WeaponReload { .. } => EventType::WeaponReload,
            GameEvent::Pickup { .. } => EventType::Pickup,
            GameEvent::EnemyAlert { .. } => EventType::EnemyAlert,
            GameEvent::Explosion { .. } => EventType::Explosion,
            GameEvent::PlayerDamaged { .. } => EventType::PlayerDamaged,
            GameEvent::MuzzleFlash { .. } => EventType::MuzzleFlash,
            GameEvent::LandingSmoke { .. } => EventType::LandingSmoke,
            GameEvent::Smoke { .. } => EventType::Smoke,
            GameEvent::BulletTimeStarted => EventType::BulletTimeStarted,
            GameEvent::EnemyKilled { .. } => EventType::EnemyKilled,
            GameEvent::LevelLoaded { .. } => EventType::LevelLoaded,
            GameEvent::LevelCleared { .. } => EventType::LevelCleared,
            GameEvent::GameWon => EventType::GameWon,
            GameEvent::PlayerDied => EventType::PlayerDied,
        }
    }
}

/// Receiver of simulation events
pub trait EventSink {
    /// Deliver one event
    fn emit(&mut self, event: GameEvent);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Records events in emission order
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded events, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Number of recorded events of one type
    pub fn count(&self, event_type: EventType) -> usize {
        self.events.iter().filter(|e| e.event_type() == event_type).count()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discard all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventQueue {
    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &GameEvent) -> bool;
}

/// Forwards events to the handlers registered for their type, in
/// registration order, until one consumes it
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event type
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }
}

impl EventSink for EventDispatcher {
    fn emit(&mut self, event: GameEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
            for handler in handlers.iter_mut() {
                if handler.on_event(&event) {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<EventType>>>,
        consume: bool,
    }

    impl EventHandler for Recorder {
        fn on_event(&mut self, event: &GameEvent) -> bool {
            self.seen.borrow_mut().push(event.event_type());
            self.consume
        }
    }

    #[test]
    fn test_queue_keeps_order() {
        let mut queue = EventQueue::new();
        queue.emit(GameEvent::BulletTimeStarted);
        queue.emit(GameEvent::Footstep { position: Vec3::zeros() });
        queue.emit(GameEvent::BulletTimeStarted);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.count(EventType::BulletTimeStarted), 2);
        let drained = queue.drain();
        assert_eq!(drained[1].event_type(), EventType::Footstep);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dispatcher_stops_at_consuming_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register_handler(
            EventType::GameWon,
            Box::new(Recorder { seen: seen.clone(), consume: true }),
        );
        dispatcher.register_handler(
            EventType::GameWon,
            Box::new(Recorder { seen: seen.clone(), consume: false }),
        );

        dispatcher.emit(GameEvent::GameWon);
        dispatcher.emit(GameEvent::PlayerDied);

        assert_eq!(*seen.borrow(), vec![EventType::GameWon]);
    }
}
