//! Level data and loading
//!
//! A level file describes static geometry and named spawn markers. Loading
//! turns it into a [`Level`]: built [`Platform`]s plus spawn points resolved
//! onto the geometry. When no usable level exists the built-in arena from
//! [`Level::fallback`] is used instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError, SimulationConfig};
use crate::entities::WeaponKind;
use crate::foundation::math::{Mat4, Vec3};
use crate::physics::collision::Mesh;
use crate::physics::Platform;

mod fallback;
mod spawn;

pub use spawn::{resolve_height, HeightSource, MarkerKind, ResolvedHeight};

/// Level loading errors
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    /// No level with this index
    #[error("Level {0} not found")]
    NotFound(u32),

    /// The level file could not be read or parsed
    #[error("Level file error: {0}")]
    Config(#[from] ConfigError),

    /// The level has no geometry
    #[error("Level {0} contains no platforms")]
    Empty(u32),
}

/// Serialized description of a level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    /// Static geometry
    pub platforms: Vec<PlatformDesc>,
    /// Named spawn points
    pub markers: Vec<SpawnMarker>,
}

impl Config for LevelData {}

/// One static collider in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDesc {
    /// Object name; floors are detected from it
    pub name: String,
    /// Box center, used when there is no mesh
    pub position: Vec3,
    /// Box extents, used when there is no mesh
    pub size: Vec3,
    /// Model-space collision geometry
    #[serde(default)]
    pub mesh: Option<Mesh>,
    /// Column-major world transform of `mesh`; identity when absent
    #[serde(default)]
    pub transform: Option<[f32; 16]>,
}

impl PlatformDesc {
    /// Box-only platform description
    pub fn boxed(name: impl Into<String>, position: Vec3, size: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            size,
            mesh: None,
            transform: None,
        }
    }

    /// Build the runtime collider. Mesh platforms take their bounds from the
    /// transformed geometry.
    pub fn build(&self) -> Platform {
        match &self.mesh {
            Some(mesh) if !mesh.is_empty() => {
                let transform = self
                    .transform
                    .map_or_else(Mat4::identity, |m| Mat4::from_column_slice(&m));
                Platform::from_mesh(self.name.clone(), Arc::new(mesh.clone()), transform)
            }
            _ => Platform::named(self.name.clone(), self.position, self.size),
        }
    }
}

/// A named point in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnMarker {
    /// Marker name, parsed by [`MarkerKind::parse`]
    pub name: String,
    /// Authored position; only X and Z are trusted
    pub position: Vec3,
}

impl SpawnMarker {
    /// Create a marker
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Provider of level data by index. Level indices start at 1.
pub trait LevelSource {
    /// Read level `index`
    fn load(&self, index: u32) -> Result<LevelData, LevelError>;
    /// Whether level `index` is available
    fn exists(&self, index: u32) -> bool;
}

/// Levels stored as `level_<n>.ron` files in a directory
#[derive(Debug, Clone)]
pub struct RonLevelSource {
    dir: PathBuf,
}

impl RonLevelSource {
    /// Read levels from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path of level `index`
    pub fn path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("level_{index}.ron"))
    }

    /// Directory the levels are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LevelSource for RonLevelSource {
    fn load(&self, index: u32) -> Result<LevelData, LevelError> {
        if !self.exists(index) {
            return Err(LevelError::NotFound(index));
        }
        let data = LevelData::load_from_file(self.path(index))?;
        non_empty(index, data)
    }

    fn exists(&self, index: u32) -> bool {
        index != 0 && self.path(index).is_file()
    }
}

/// Levels held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLevelSource {
    levels: BTreeMap<u32, LevelData>,
}

impl InMemoryLevelSource {
    /// Create a source with no levels
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Self::insert`]
    pub fn with_level(mut self, index: u32, data: LevelData) -> Self {
        self.insert(index, data);
        self
    }

    /// Add or replace level `index`
    pub fn insert(&mut self, index: u32, data: LevelData) {
        self.levels.insert(index, data);
    }
}

impl LevelSource for InMemoryLevelSource {
    fn load(&self, index: u32) -> Result<LevelData, LevelError> {
        if !self.exists(index) {
            return Err(LevelError::NotFound(index));
        }
        match self.levels.get(&index) {
            Some(data) => non_empty(index, data.clone()),
            None => Err(LevelError::NotFound(index)),
        }
    }

    fn exists(&self, index: u32) -> bool {
        index != 0 && self.levels.contains_key(&index)
    }
}

fn non_empty(index: u32, data: LevelData) -> Result<LevelData, LevelError> {
    if data.platforms.is_empty() {
        Err(LevelError::Empty(index))
    } else {
        Ok(data)
    }
}

/// Where an enemy starts and what it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    /// Body center
    pub position: Vec3,
    /// Weapon carried
    pub kind: WeaponKind,
}

/// Where a weapon pickup lies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupSpawn {
    /// Resting position
    pub position: Vec3,
    /// Weapon lying there
    pub kind: WeaponKind,
}

/// A level ready to be simulated
#[derive(Debug, Clone)]
pub struct Level {
    /// Built colliders
    pub platforms: Vec<Platform>,
    /// Body center for the player, `None` keeps the reset position
    pub player_spawn: Option<Vec3>,
    /// Enemy starts
    pub enemies: Vec<EnemySpawn>,
    /// Weapons on the ground
    pub pickups: Vec<PickupSpawn>,
    /// Built from the hard-coded arena rather than level data
    pub fallback: bool,
}

impl Level {
    /// Build platforms and resolve every marker onto them
    pub fn build(data: &LevelData, config: &SimulationConfig, rng: &mut impl Rng) -> Self {
        let platforms: Vec<Platform> = data.platforms.iter().map(PlatformDesc::build).collect();
        for (i, platform) in platforms.iter().enumerate() {
            log::debug!(
                "  [{}] '{}' pos({:.2},{:.2},{:.2}) size({:.2},{:.2},{:.2}) meshes={}",
                i,
                platform.name(),
                platform.position().x,
                platform.position().y,
                platform.position().z,
                platform.size().x,
                platform.size().y,
                platform.size().z,
                platform.meshes().len()
            );
        }

        let mut level = Self {
            platforms,
            player_spawn: None,
            enemies: Vec::new(),
            pickups: Vec::new(),
            fallback: false,
        };
        level.resolve_markers(&data.markers, config, rng);
        log::info!(
            "Built level: {} platforms, {} enemies, {} pickups",
            level.platforms.len(),
            level.enemies.len(),
            level.pickups.len()
        );
        level
    }

    /// The built-in arena used when no level can be loaded
    pub fn fallback() -> Self {
        fallback::arena()
    }

    fn resolve_markers(&mut self, markers: &[SpawnMarker], config: &SimulationConfig, rng: &mut impl Rng) {
        log::debug!("Resolving ground heights for {} markers", markers.len());
        for marker in markers {
            let Some(kind) = MarkerKind::parse(&marker.name) else {
                log::debug!("Ignoring unknown marker '{}'", marker.name);
                continue;
            };

            let resolved = resolve_height(&marker.position, &self.platforms);
            let note = if resolved.source == HeightSource::Raycast { "" } else { " [FALLBACK]" };
            let ground = Vec3::new(marker.position.x, resolved.y, marker.position.z);

            match kind {
                MarkerKind::Player => {
                    let lift = config.player.size.y * 0.5 + config.player.spawn_buffer;
                    let position = ground + Vec3::new(0.0, lift, 0.0);
                    log::info!(
                        "Player spawn at ({:.2},{:.2},{:.2}){}",
                        position.x,
                        position.y,
                        position.z,
                        note
                    );
                    self.player_spawn = Some(position);
                }
                MarkerKind::Enemy(kind) => {
                    let kind = kind.unwrap_or_else(|| WeaponKind::ALL[rng.gen_range(0..WeaponKind::ALL.len())]);
                    let lift = config.enemy.size.y * 0.5 + config.enemy.spawn_buffer;
                    let position = ground + Vec3::new(0.0, lift, 0.0);
                    log::info!(
                        "Enemy '{}' ({:?}) at ({:.2},{:.2},{:.2}){}",
                        marker.name,
                        kind,
                        position.x,
                        position.y,
                        position.z,
                        note
                    );
                    self.enemies.push(EnemySpawn { position, kind });
                }
                MarkerKind::Pickup(kind) => {
                    let position = ground + Vec3::new(0.0, spawn::PICKUP_LIFT, 0.0);
                    self.pickups.push(PickupSpawn { position, kind });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arena_data() -> LevelData {
        LevelData {
            platforms: vec![
                PlatformDesc::boxed("Floor", Vec3::new(0.0, -0.5, 0.0), Vec3::new(40.0, 1.0, 40.0)),
                PlatformDesc::boxed("Crate", Vec3::new(6.0, 1.0, 6.0), Vec3::new(2.0, 2.0, 2.0)),
            ],
            markers: vec![
                SpawnMarker::new("SPAWN_PLAYER", Vec3::new(0.0, 5.0, 0.0)),
                SpawnMarker::new("SPAWN_ENEMY_RIFLE.001", Vec3::new(6.0, 3.0, 6.0)),
                SpawnMarker::new("PICKUP_PUMP_SHOTGUN", Vec3::new(-3.0, 0.0, 2.0)),
                SpawnMarker::new("Camera", Vec3::new(0.0, 10.0, 0.0)),
            ],
        }
    }

    #[test]
    fn test_build_resolves_markers() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let level = Level::build(&arena_data(), &config, &mut rng);

        assert_eq!(level.platforms.len(), 2);
        assert!(!level.fallback);

        let player = level.player_spawn.unwrap();
        assert_relative_eq!(player.y, 0.9 + config.player.spawn_buffer, epsilon = 1e-5);

        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.enemies[0].kind, WeaponKind::Rifle);
        assert_relative_eq!(level.enemies[0].position.y, 2.0 + 0.9 + 0.25, epsilon = 1e-5);

        assert_eq!(level.pickups.len(), 1);
        assert_eq!(level.pickups[0].kind, WeaponKind::PumpShotgun);
        assert_relative_eq!(level.pickups[0].position.y, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_enemy_spawn_height_ignores_player_buffer() {
        let mut config = SimulationConfig::default();
        config.player.spawn_buffer = 3.0;
        config.enemy.spawn_buffer = 0.5;
        let mut rng = StdRng::seed_from_u64(7);
        let level = Level::build(&arena_data(), &config, &mut rng);

        assert_relative_eq!(level.player_spawn.unwrap().y, 0.9 + 3.0, epsilon = 1e-5);
        assert_relative_eq!(level.enemies[0].position.y, 2.0 + 0.9 + 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_generic_enemy_marker_is_seeded() {
        let mut data = arena_data();
        data.markers = (0..6)
            .map(|i| SpawnMarker::new("SPAWN_ENEMY", Vec3::new(i as f32 * 2.0 - 6.0, 1.0, -5.0)))
            .collect();
        let config = SimulationConfig::default();

        let kinds = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            Level::build(&data, &config, &mut rng)
                .enemies
                .iter()
                .map(|e| e.kind)
                .collect::<Vec<_>>()
        };

        assert_eq!(kinds(42).len(), 6);
        assert_eq!(kinds(42), kinds(42));
    }

    #[test]
    fn test_mesh_platform_bounds_follow_geometry() {
        let mut transform = [0.0; 16];
        transform.copy_from_slice(Mat4::new_translation(&Vec3::new(0.0, 3.0, 0.0)).as_slice());
        let desc = PlatformDesc {
            name: "Ramp".to_string(),
            position: Vec3::zeros(),
            size: Vec3::repeat(1.0),
            mesh: Some(Mesh::cuboid(Vec3::new(4.0, 2.0, 4.0))),
            transform: Some(transform),
        };

        let platform = desc.build();
        assert!(platform.has_mesh());
        assert_relative_eq!(platform.position(), Vec3::new(0.0, 3.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(platform.size(), Vec3::new(4.0, 2.0, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemoryLevelSource::new()
            .with_level(0, arena_data())
            .with_level(1, arena_data())
            .with_level(2, LevelData::default());

        assert!(!source.exists(0));
        assert!(source.exists(1));
        assert!(!source.exists(3));

        assert!(source.load(1).is_ok());
        assert!(matches!(source.load(0), Err(LevelError::NotFound(0))));
        assert!(matches!(source.load(2), Err(LevelError::Empty(2))));
        assert!(matches!(source.load(3), Err(LevelError::NotFound(3))));
    }

    #[test]
    fn test_ron_source_round_trip() {
        let dir = std::env::temp_dir().join(format!("dodger_levels_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = RonLevelSource::new(&dir);

        assert!(!source.exists(1));
        assert!(matches!(source.load(1), Err(LevelError::NotFound(1))));

        arena_data().save_to_file(source.path(1)).unwrap();
        assert!(source.exists(1));
        assert_eq!(source.load(1).unwrap(), arena_data());

        std::fs::write(source.path(2), "not a level").unwrap();
        assert!(matches!(source.load(2), Err(LevelError::Config(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
