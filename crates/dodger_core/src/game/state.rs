//! Top-level game flow

/// Where the simulation is in a level's lifecycle.
///
/// | from | event | to |
/// |------|-------|----|
/// | any | level loaded | `Playing` |
/// | `Playing` | player dead at tick start | `GameOver` |
/// | `Playing` | no enemy alive, next level exists | `LevelWin` |
/// | `Playing` | no enemy alive, last level | `GameWin` |
/// | `GameOver` | death reset delay elapsed | `Playing` (level reloaded) |
/// | `LevelWin` | advance requested | `Playing` (next level) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// World advancing
    #[default]
    Playing,
    /// Player dead, waiting for the level reset
    GameOver,
    /// Level cleared, waiting for the host to advance
    LevelWin,
    /// Final level cleared
    GameWin,
}

impl GameState {
    /// Whether ticks advance the world
    pub fn is_playing(self) -> bool {
        self == GameState::Playing
    }
}
