//! Weapons: ballistic data table and per-instance ammo/timing state
//!
//! Every weapon kind shares one [`Weapon`] implementation. Kinds differ only in
//! their [`WeaponSpec`] constants and their [`ReloadPolicy`].

use serde::{Deserialize, Serialize};

/// Weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Semi-automatic sidearm
    Pistol,
    /// Fast-firing long gun
    Rifle,
    /// Automatic shotgun
    AutoShotgun,
    /// Pump-action shotgun
    PumpShotgun,
}

impl WeaponKind {
    /// All kinds, in table order
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Pistol,
        WeaponKind::Rifle,
        WeaponKind::AutoShotgun,
        WeaponKind::PumpShotgun,
    ];

    /// Ballistic constants for this kind
    pub fn spec(self) -> &'static WeaponSpec {
        match self {
            WeaponKind::Pistol => &PISTOL,
            WeaponKind::Rifle => &RIFLE,
            WeaponKind::AutoShotgun => &AUTO_SHOTGUN,
            WeaponKind::PumpShotgun => &PUMP_SHOTGUN,
        }
    }

    /// How this kind refills its magazine
    pub fn reload_policy(self) -> ReloadPolicy {
        match self {
            WeaponKind::AutoShotgun | WeaponKind::PumpShotgun => ReloadPolicy::PerShell,
            WeaponKind::Pistol | WeaponKind::Rifle => ReloadPolicy::Magazine,
        }
    }
}

/// Reload behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Whole magazine after one reload period
    Magazine,
    /// One shell per reload period; firing with ammo loaded interrupts
    PerShell,
}

/// Static ballistic parameters of a weapon kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    /// Display name
    pub name: &'static str,
    /// Magazine capacity
    pub max_ammo: u32,
    /// Reserve rounds of a fresh weapon
    pub initial_reserve: u32,
    /// Shots per second
    pub fire_rate: f32,
    /// Damage per projectile
    pub damage: f32,
    /// Effective range, used by enemies to decide when to stop closing in
    pub range: f32,
    /// Units per second
    pub projectile_speed: f32,
    /// Seconds a projectile lives
    pub projectile_lifetime: f32,
    /// Projectiles per shot
    pub projectile_count: u32,
    /// Maximum per-axis aim jitter
    pub spread: f32,
    /// Seconds per magazine, or per shell for shotguns
    pub reload_time: f32,
    /// Seconds of pump action after each shot, zero for none
    pub pump_time: f32,
}

const PISTOL: WeaponSpec = WeaponSpec {
    name: "Pistol",
    max_ammo: 12,
    initial_reserve: 48,
    fire_rate: 3.0,
    damage: 25.0,
    range: 50.0,
    projectile_speed: 50.0,
    projectile_lifetime: 3.0,
    projectile_count: 1,
    spread: 0.0,
    reload_time: 1.5,
    pump_time: 0.0,
};

const RIFLE: WeaponSpec = WeaponSpec {
    name: "Rifle",
    max_ammo: 30,
    initial_reserve: 120,
    fire_rate: 10.0,
    damage: 15.0,
    range: 100.0,
    projectile_speed: 60.0,
    projectile_lifetime: 5.0,
    projectile_count: 1,
    spread: 0.0,
    reload_time: 2.0,
    pump_time: 0.0,
};

const AUTO_SHOTGUN: WeaponSpec = WeaponSpec {
    name: "Auto-Shotgun",
    max_ammo: 8,
    initial_reserve: 32,
    fire_rate: 5.0,
    damage: 15.0,
    range: 20.0,
    projectile_speed: 40.0,
    projectile_lifetime: 1.5,
    projectile_count: 8,
    spread: 0.05,
    reload_time: 0.6,
    pump_time: 0.0,
};

const PUMP_SHOTGUN: WeaponSpec = WeaponSpec {
    name: "Pump-Shotgun",
    max_ammo: 6,
    initial_reserve: 24,
    fire_rate: 2.0,
    damage: 16.0,
    range: 22.0,
    projectile_speed: 45.0,
    projectile_lifetime: 1.2,
    projectile_count: 8,
    spread: 0.05,
    reload_time: 0.6,
    pump_time: 0.42,
};

/// A single weapon instance, owned by an inventory slot or an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    kind: WeaponKind,
    current_ammo: u32,
    reserve_ammo: u32,
    last_fire_time: Option<f32>,
    /// Elapsed time of the reload in progress
    reload_timer: Option<f32>,
    /// Elapsed time of the pump action in progress
    pump_timer: Option<f32>,
}

impl Weapon {
    /// Creates a full weapon with the kind's starting reserve
    pub fn new(kind: WeaponKind) -> Self {
        Self::with_reserve(kind, kind.spec().initial_reserve)
    }

    /// Creates a full weapon with a custom reserve
    pub fn with_reserve(kind: WeaponKind, reserve_ammo: u32) -> Self {
        Self {
            kind,
            current_ammo: kind.spec().max_ammo,
            reserve_ammo,
            last_fire_time: None,
            reload_timer: None,
            pump_timer: None,
        }
    }

    /// Try to fire at `current_time` (world seconds).
    ///
    /// Returns `true` when a shot left the barrel; the caller spawns the
    /// projectiles. Firing a shotgun mid-reload with shells loaded cancels the
    /// reload.
    pub fn fire(&mut self, current_time: f32) -> bool {
        if self.reload_timer.is_some()
            && self.kind.reload_policy() == ReloadPolicy::PerShell
            && self.current_ammo > 0
        {
            self.reload_timer = None;
        } else if self.reload_timer.is_some() || self.current_ammo == 0 {
            return false;
        }

        if self.is_pumping() {
            return false;
        }

        if let Some(last) = self.last_fire_time {
            if current_time - last < 1.0 / self.spec().fire_rate {
                return false;
            }
        }

        self.current_ammo -= 1;
        self.last_fire_time = Some(current_time);
        if self.spec().pump_time > 0.0 {
            self.pump_timer = Some(0.0);
        }
        true
    }

    /// Start reloading. Returns `false` when already reloading, out of
    /// reserve, or the magazine is full.
    pub fn reload(&mut self) -> bool {
        if self.reload_timer.is_some()
            || self.reserve_ammo == 0
            || self.current_ammo == self.spec().max_ammo
        {
            return false;
        }
        self.reload_timer = Some(0.0);
        true
    }

    /// Advance pump and reload timers
    pub fn update(&mut self, delta_time: f32) {
        if let Some(timer) = self.pump_timer.as_mut() {
            *timer += delta_time;
            if *timer >= self.kind.spec().pump_time {
                self.pump_timer = None;
            }
        }

        let Some(mut timer) = self.reload_timer else {
            return;
        };
        timer += delta_time;
        let spec = self.kind.spec();

        if timer < spec.reload_time {
            self.reload_timer = Some(timer);
            return;
        }

        match self.kind.reload_policy() {
            ReloadPolicy::PerShell => {
                if self.reserve_ammo > 0 && self.current_ammo < spec.max_ammo {
                    self.current_ammo += 1;
                    self.reserve_ammo -= 1;
                    timer = 0.0;
                }
                if self.current_ammo >= spec.max_ammo || self.reserve_ammo == 0 {
                    self.reload_timer = None;
                } else {
                    self.reload_timer = Some(timer);
                }
            }
            ReloadPolicy::Magazine => {
                let added = (spec.max_ammo - self.current_ammo).min(self.reserve_ammo);
                self.current_ammo += added;
                self.reserve_ammo -= added;
                self.reload_timer = None;
            }
        }
    }

    /// Get the weapon kind
    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Get the ballistic constants
    pub fn spec(&self) -> &'static WeaponSpec {
        self.kind.spec()
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Rounds in the magazine
    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    /// Rounds held in reserve
    pub fn reserve_ammo(&self) -> u32 {
        self.reserve_ammo
    }

    /// Magazine capacity
    pub fn max_ammo(&self) -> u32 {
        self.spec().max_ammo
    }

    /// Damage per projectile
    pub fn damage(&self) -> f32 {
        self.spec().damage
    }

    /// Effective range
    pub fn range(&self) -> f32 {
        self.spec().range
    }

    /// Whether a reload is in progress
    pub fn is_reloading(&self) -> bool {
        self.reload_timer.is_some()
    }

    /// Whether the pump action blocks firing
    pub fn is_pumping(&self) -> bool {
        self.pump_timer.is_some()
    }

    /// Pump animation progress in `[0, 1]`, zero when not pumping
    pub fn pump_progress(&self) -> f32 {
        match self.pump_timer {
            Some(timer) if self.spec().pump_time > 0.0 => timer / self.spec().pump_time,
            _ => 0.0,
        }
    }
}
