use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use snekduel::app::App;
use snekduel::{GameConfig, JsonFileStore};

#[derive(Parser)]
#[command(name = "snekduel")]
#[command(version, about = "Grid snake for one or two players sharing a keyboard")]
struct Cli {
    /// Number of snakes on the board
    #[arg(long, default_value = "2")]
    players: Players,

    /// JSON game config; overrides the player preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where high scores are kept
    #[arg(long, default_value = "snake_highscores.json")]
    highscores: PathBuf,

    #[arg(long, default_value = "snekduel.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Players {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs go to a file
    WriteLogger::init(
        cli.log_level,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?,
    )
    .context("Failed to initialize logger")?;

    info!("Starting snekduel");

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match cli.players {
            Players::One => GameConfig::single_player(),
            Players::Two => GameConfig::two_player(),
        },
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    info!(
        "{} player(s), tick interval {} ms",
        config.players.len(),
        config.initial_interval_ms
    );

    App::new(config, JsonFileStore::new(cli.highscores))
        .run()
        .await
}
