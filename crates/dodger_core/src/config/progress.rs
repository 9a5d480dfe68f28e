//! Level progress persistence

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Persisted campaign progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    /// Highest level index reached
    pub last_level: u32,
}

impl Config for Progress {}

/// Where progress is written on level transitions
pub trait ProgressStore {
    /// Read the stored progress, defaults when none is stored
    fn load(&self) -> Progress;
    /// Replace the stored progress
    fn save(&mut self, progress: Progress) -> Result<(), ConfigError>;
}

/// Progress kept in a TOML or RON file
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    /// Store progress at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Progress {
        Progress::load_or_default(&self.path)
    }

    fn save(&mut self, progress: Progress) -> Result<(), ConfigError> {
        progress.save_to_file(&self.path)
    }
}

/// Progress kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    progress: Progress,
    /// Number of successful saves
    pub saves: usize,
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Progress {
        self.progress
    }

    fn save(&mut self, progress: Progress) -> Result<(), ConfigError> {
        self.progress = progress;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!("dodger_progress_{}.toml", std::process::id()));
        let mut store = FileProgressStore::new(&path);
        store.save(Progress { last_level: 3 }).unwrap();
        assert_eq!(store.load().last_level, 3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryProgressStore::default();
        assert_eq!(store.load(), Progress::default());
        store.save(Progress { last_level: 2 }).unwrap();
        assert_eq!(store.load().last_level, 2);
        assert_eq!(store.saves, 1);
    }
}
