use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Coord;

/// Grid pitch. Snakes move exactly one step per tick.
pub const STEP: i32 = 20;
/// Half-width of the square arena.
pub const PLAYFIELD: i32 = 300;
/// Heads further than `PLAYFIELD - BORDER_MARGIN` from the centre have left the arena.
pub const BORDER_MARGIN: i32 = 10;
/// Entities strictly closer than this are touching.
pub const PROXIMITY: i32 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("a game needs one or two players, got {0}")]
    PlayerCount(usize),
    #[error("border margin {margin} leaves no room in a playfield of {playfield}")]
    Margin { playfield: i32, margin: i32 },
    #[error("minimum tick interval must be between 1 and {initial} ms, got {min}")]
    Interval { initial: u64, min: u64 },
    #[error("player {name} starts outside the arena at ({x}, {y})")]
    StartOutside { name: String, x: i32, y: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Key under which this player's high score is persisted
    pub name: String,
    pub start: Coord,
    /// Base RGB colour; segments are shaded from it
    pub color: (u8, u8, u8),
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, start: Coord, color: (u8, u8, u8)) -> Self {
        Self {
            name: name.into(),
            start,
            color,
        }
    }
}

/// Configuration for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: i32,
    pub border_margin: i32,

    pub initial_interval_ms: u64,
    /// Subtracted from the interval on every food pickup
    pub interval_decrement_ms: u64,
    pub min_interval_ms: u64,
    /// Restore `initial_interval_ms` whenever a snake crashes
    pub reset_interval_on_collision: bool,

    pub food_start: Coord,
    /// Resamples allowed when the drawn food cell is occupied
    pub food_relocation_attempts: u32,
    /// Fixed RNG seed, mostly for reproducible runs
    pub seed: Option<u64>,

    pub players: Vec<PlayerConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::two_player()
    }
}

impl GameConfig {
    fn base(players: Vec<PlayerConfig>) -> Self {
        Self {
            playfield: PLAYFIELD,
            border_margin: BORDER_MARGIN,
            initial_interval_ms: 100,
            interval_decrement_ms: 2,
            min_interval_ms: 20,
            reset_interval_on_collision: false,
            food_start: Coord::new(0, 100),
            food_relocation_attempts: 16,
            seed: None,
            players,
        }
    }

    pub fn single_player() -> Self {
        Self {
            interval_decrement_ms: 1,
            reset_interval_on_collision: true,
            ..Self::base(vec![PlayerConfig::new(
                "P1",
                Coord::new(0, 0),
                (221, 149, 78),
            )])
        }
    }

    pub fn two_player() -> Self {
        Self::base(vec![
            PlayerConfig::new("P1", Coord::new(-100, 0), (30, 30, 30)),
            PlayerConfig::new("P2", Coord::new(100, 0), (30, 144, 255)),
        ])
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Read a JSON config file. Missing fields fall back to the two-player defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() || self.players.len() > 2 {
            return Err(ConfigError::PlayerCount(self.players.len()));
        }
        if self.border_margin < 0 || self.border_margin >= self.playfield {
            return Err(ConfigError::Margin {
                playfield: self.playfield,
                margin: self.border_margin,
            });
        }
        if self.min_interval_ms == 0 || self.min_interval_ms > self.initial_interval_ms {
            return Err(ConfigError::Interval {
                initial: self.initial_interval_ms,
                min: self.min_interval_ms,
            });
        }
        let limit = self.border_limit();
        if let Some(p) = self
            .players
            .iter()
            .find(|p| p.start.x.abs() > limit || p.start.y.abs() > limit)
        {
            return Err(ConfigError::StartOutside {
                name: p.name.clone(),
                x: p.start.x,
                y: p.start.y,
            });
        }
        Ok(())
    }

    /// Largest absolute coordinate a head may hold without crashing.
    pub fn border_limit(&self) -> i32 {
        self.playfield - self.border_margin
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn interval_decrement(&self) -> Duration {
        Duration::from_millis(self.interval_decrement_ms)
    }
}
