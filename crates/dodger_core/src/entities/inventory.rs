//! Two-slot weapon inventory

use super::weapon::{Weapon, WeaponKind};

/// Inventory slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// First slot, holds the starting pistol
    Primary,
    /// Second slot, filled by the first pickup
    Secondary,
}

/// The player's weapons: a primary and a secondary slot
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    primary: Option<Weapon>,
    secondary: Option<Weapon>,
    current: Slot,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Starting loadout: a pistol in the primary slot
    pub fn new() -> Self {
        Self {
            primary: Some(Weapon::new(WeaponKind::Pistol)),
            secondary: None,
            current: Slot::Primary,
        }
    }

    /// Store a weapon.
    ///
    /// Fills the first empty slot; with both slots full the current weapon is
    /// replaced and handed back.
    pub fn add_weapon(&mut self, weapon: Weapon) -> Option<Weapon> {
        if self.primary.is_none() {
            self.primary = Some(weapon);
            self.switch_to_primary();
            return None;
        }
        if self.secondary.is_none() {
            self.secondary = Some(weapon);
            return None;
        }
        self.slot_mut(self.current).replace(weapon)
    }

    /// Toggle slots when both are filled
    pub fn switch_weapon(&mut self) {
        if self.primary.is_some() && self.secondary.is_some() {
            self.current = match self.current {
                Slot::Primary => Slot::Secondary,
                Slot::Secondary => Slot::Primary,
            };
        }
    }

    /// Select the primary slot if it holds a weapon
    pub fn switch_to_primary(&mut self) {
        if self.primary.is_some() {
            self.current = Slot::Primary;
        }
    }

    /// Select the secondary slot if it holds a weapon
    pub fn switch_to_secondary(&mut self) {
        if self.secondary.is_some() {
            self.current = Slot::Secondary;
        }
    }

    /// Get the selected weapon
    pub fn current_weapon(&self) -> Option<&Weapon> {
        match self.current {
            Slot::Primary => self.primary.as_ref(),
            Slot::Secondary => self.secondary.as_ref(),
        }
    }

    /// Get the selected weapon mutably
    pub fn current_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.slot_mut(self.current).as_mut()
    }

    /// Get the selected slot
    pub fn current_slot(&self) -> Slot {
        self.current
    }

    /// Weapon in the primary slot
    pub fn primary(&self) -> Option<&Weapon> {
        self.primary.as_ref()
    }

    /// Weapon in the secondary slot
    pub fn secondary(&self) -> Option<&Weapon> {
        self.secondary.as_ref()
    }

    /// Advance timers of both weapons
    pub fn update(&mut self, delta_time: f32) {
        for weapon in [&mut self.primary, &mut self.secondary].into_iter().flatten() {
            weapon.update(delta_time);
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Weapon> {
        match slot {
            Slot::Primary => &mut self.primary,
            Slot::Secondary => &mut self.secondary,
        }
    }
}
