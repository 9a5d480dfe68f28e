//! Hard-coded arena used when no level data can be loaded

use crate::entities::WeaponKind;
use crate::foundation::math::Vec3;
use crate::physics::Platform;
use super::{EnemySpawn, Level, PickupSpawn};

pub(super) fn arena() -> Level {
    log::warn!("[FALLBACK] Using the built-in arena");

    let mut platforms = vec![Platform::named(
        "Floor",
        Vec3::new(0.0, -0.25, 0.0),
        Vec3::new(50.0, 0.5, 50.0),
    )];

    // Stepping blocks
    let blocks = [
        (Vec3::new(5.0, 1.0, -5.0), Vec3::new(4.0, 0.5, 4.0)),
        (Vec3::new(-6.0, 1.5, 3.0), Vec3::new(3.0, 0.5, 3.0)),
        (Vec3::new(8.0, 2.0, 5.0), Vec3::new(3.5, 0.5, 3.5)),
        (Vec3::new(-4.0, 2.5, -8.0), Vec3::new(4.0, 0.5, 4.0)),
        (Vec3::new(10.0, 3.5, -3.0), Vec3::new(3.0, 0.5, 3.0)),
    ];
    platforms.extend(blocks.iter().map(|&(pos, size)| Platform::new(pos, size)));

    // Boundary walls
    let walls = [
        (Vec3::new(0.0, 2.0, -15.0), Vec3::new(30.0, 4.0, 1.0)),
        (Vec3::new(0.0, 2.0, 15.0), Vec3::new(30.0, 4.0, 1.0)),
        (Vec3::new(-15.0, 2.0, 0.0), Vec3::new(1.0, 4.0, 30.0)),
        (Vec3::new(15.0, 2.0, 0.0), Vec3::new(1.0, 4.0, 30.0)),
    ];
    platforms.extend(walls.iter().map(|&(pos, size)| Platform::new(pos, size)));

    let enemies = [
        Vec3::new(10.0, 1.0, 5.0),
        Vec3::new(-8.0, 1.0, -6.0),
        Vec3::new(5.0, 1.0, -10.0),
    ]
    .into_iter()
    .map(|position| EnemySpawn { position, kind: WeaponKind::Pistol })
    .collect();

    let pickups = vec![
        PickupSpawn { position: Vec3::new(3.0, 0.5, 3.0), kind: WeaponKind::Rifle },
        PickupSpawn { position: Vec3::new(-5.0, 0.5, -5.0), kind: WeaponKind::Pistol },
        PickupSpawn { position: Vec3::new(0.0, 0.5, -2.0), kind: WeaponKind::AutoShotgun },
    ];

    Level {
        platforms,
        player_spawn: None,
        enemies,
        pickups,
        fallback: true,
    }
}
