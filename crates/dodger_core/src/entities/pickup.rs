//! Weapons lying in the world

use crate::foundation::math::Vec3;
use super::weapon::{Weapon, WeaponKind};

/// Default pickup radius
pub const PICKUP_RANGE: f32 = 2.0;

/// A weapon waiting to be collected
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponPickup {
    /// Resting position
    pub position: Vec3,
    weapon: Option<Weapon>,
    range: f32,
}

impl WeaponPickup {
    /// A fresh weapon of `kind` at `position`
    pub fn new(position: Vec3, kind: WeaponKind) -> Self {
        Self::with_weapon(position, Weapon::new(kind))
    }

    /// Place an existing weapon in the world
    pub fn with_weapon(position: Vec3, weapon: Weapon) -> Self {
        Self {
            position,
            weapon: Some(weapon),
            range: PICKUP_RANGE,
        }
    }

    /// Override the pickup radius
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    /// Kind of the weapon on offer, `None` once taken
    pub fn kind(&self) -> Option<WeaponKind> {
        self.weapon.as_ref().map(Weapon::kind)
    }

    /// Whether the weapon has been taken
    pub fn is_picked_up(&self) -> bool {
        self.weapon.is_none()
    }

    /// Whether a body at `position` is close enough to collect it
    pub fn can_pickup(&self, position: &Vec3) -> bool {
        self.weapon.is_some() && (position - self.position).magnitude_squared() < self.range * self.range
    }

    /// Move the weapon out; later calls return `None`
    pub fn take(&mut self) -> Option<Weapon> {
        self.weapon.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_check() {
        let pickup = WeaponPickup::new(Vec3::new(3.0, 0.5, 3.0), WeaponKind::Rifle);
        assert!(pickup.can_pickup(&Vec3::new(3.0, 1.4, 4.0)));
        assert!(!pickup.can_pickup(&Vec3::new(3.0, 0.5, 5.0)));
    }

    #[test]
    fn test_take_once() {
        let mut pickup = WeaponPickup::new(Vec3::zeros(), WeaponKind::AutoShotgun);
        assert_eq!(pickup.kind(), Some(WeaponKind::AutoShotgun));
        assert_eq!(pickup.take().map(|w| w.kind()), Some(WeaponKind::AutoShotgun));
        assert!(pickup.take().is_none());
        assert!(pickup.is_picked_up());
        assert!(!pickup.can_pickup(&Vec3::zeros()));
    }
}
