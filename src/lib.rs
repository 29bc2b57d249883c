//! A one- or two-player snake game on a fixed-pitch grid.
//!
//! The simulation core (`entity`, `snake`, `arena`, `collision`,
//! `game_loop`) has no I/O and no timers; the terminal front end in `app`
//! schedules ticks and feeds it keyboard commands.

pub mod app;
pub mod arena;
pub mod collision;
pub mod config;
pub mod entity;
pub mod game_loop;
pub mod highscore;
pub mod input;
pub mod render;
pub mod snake;

pub use arena::Arena;
pub use collision::Collision;
pub use config::{ConfigError, GameConfig, PlayerConfig};
pub use entity::{Coord, Direction, Entity};
pub use game_loop::{GameEvent, GameLoop, GameState, TickReport};
pub use highscore::{HighScores, HighscoreError, HighscoreStore, JsonFileStore};
pub use snake::{Snake, SnakeId};
