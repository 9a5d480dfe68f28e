//! Spawn marker parsing and ground resolution

use crate::entities::WeaponKind;
use crate::foundation::math::Vec3;
use crate::physics::Platform;

/// Height the downward spawn ray starts from
const CAST_HEIGHT: f32 = 100.0;

/// Length of the downward spawn ray
const CAST_DISTANCE: f32 = 200.0;

/// Tolerance when testing whether a platform footprint contains a marker
const FOOTPRINT_TOLERANCE: f32 = 0.01;

/// Markers more than this above every platform are considered misplaced
const MAX_MARKER_HOVER: f32 = 2.0;

/// Pickups rest this far above the ground
pub(super) const PICKUP_LIFT: f32 = 0.2;

/// What a marker spawns, decided by substrings of its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Player start
    Player,
    /// Enemy carrying the given weapon; `None` picks a random weapon
    Enemy(Option<WeaponKind>),
    /// Weapon lying on the ground
    Pickup(WeaponKind),
}

impl MarkerKind {
    /// Classify a marker name. Returns `None` for names that spawn nothing.
    pub fn parse(name: &str) -> Option<Self> {
        if name.contains("SPAWN_PLAYER") {
            return Some(MarkerKind::Player);
        }

        if name.contains("SPAWN_ENEMY") {
            let kind = if name.contains("RIFLE") {
                Some(WeaponKind::Rifle)
            } else if name.contains("PUMP_SHOTGUN") {
                Some(WeaponKind::PumpShotgun)
            } else if name.contains("SHOTGUN") {
                // AUTO_SHOTGUN and the bare SHOTGUN shorthand
                Some(WeaponKind::AutoShotgun)
            } else if name.contains("PISTOL") {
                Some(WeaponKind::Pistol)
            } else {
                None
            };
            return Some(MarkerKind::Enemy(kind));
        }

        if name.contains("PICKUP_RIFLE") {
            Some(MarkerKind::Pickup(WeaponKind::Rifle))
        } else if name.contains("PICKUP_PISTOL") {
            Some(MarkerKind::Pickup(WeaponKind::Pistol))
        } else if name.contains("PICKUP_PUMP_SHOTGUN") {
            Some(MarkerKind::Pickup(WeaponKind::PumpShotgun))
        } else if name.contains("PICKUP_SHOTGUN") {
            Some(MarkerKind::Pickup(WeaponKind::AutoShotgun))
        } else {
            None
        }
    }
}

/// Which rule produced a resolved ground height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightSource {
    /// Highest surface under the marker
    Raycast,
    /// Top of the highest platform whose footprint contains the marker
    PlatformTop,
    /// Marker floated too high and was dropped to the highest platform top
    HighestTop,
    /// Marker height kept as authored
    Marker,
}

/// Ground height found for a marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHeight {
    /// World Y of the ground
    pub y: f32,
    /// Rule that produced `y`
    pub source: HeightSource,
}

/// Find the ground height below a marker.
///
/// Rules, first match wins:
///
/// | rule | result |
/// |------|--------|
/// | ray cast down from y=100 hits any platform | highest hit |
/// | marker inside a platform footprint (±0.01) | highest such top |
/// | marker more than 2 above every platform | highest platform top |
/// | otherwise | marker Y |
pub fn resolve_height(marker: &Vec3, platforms: &[Platform]) -> ResolvedHeight {
    let origin = Vec3::new(marker.x, CAST_HEIGHT, marker.z);
    let down = Vec3::new(0.0, -1.0, 0.0);

    let highest_hit = platforms
        .iter()
        .filter_map(|p| p.raycast(&origin, &down, CAST_DISTANCE))
        .map(|t| origin.y - t)
        .max_by(f32::total_cmp);
    if let Some(y) = highest_hit {
        return ResolvedHeight { y, source: HeightSource::Raycast };
    }

    let containing_top = platforms
        .iter()
        .filter(|p| p.bounds().contains_xz(marker, FOOTPRINT_TOLERANCE))
        .map(|p| p.bounds().top())
        .max_by(f32::total_cmp);
    if let Some(y) = containing_top {
        log::debug!("Marker at ({:.2},{:.2}) aligned to platform top {:.2}", marker.x, marker.z, y);
        return ResolvedHeight { y, source: HeightSource::PlatformTop };
    }

    let highest_top = platforms.iter().map(|p| p.bounds().top()).max_by(f32::total_cmp);
    match highest_top {
        Some(top) if marker.y > top + MAX_MARKER_HOVER => {
            log::debug!("Marker dropped to highest platform top {:.2} (was {:.2})", top, marker.y);
            ResolvedHeight { y: top, source: HeightSource::HighestTop }
        }
        _ => ResolvedHeight { y: marker.y, source: HeightSource::Marker },
    }
}
