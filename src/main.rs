use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use neon_snake::game::{GameConfig, GameEngine};
use neon_snake::logging;
use neon_snake::modes::HumanMode;
use neon_snake::persistence::{BestScore, JsonFileStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// JSON file with game settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the best score is kept
    #[arg(long, default_value = ".neon_snake_best.json")]
    best_score_file: PathBuf,

    /// Log file
    #[arg(long, default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Fixed seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_file, cli.log_level)?;

    let config = cli.game_config()?;
    info!("Starting with {:?}", config);

    let store = JsonFileStore::new(&cli.best_score_file);
    info!("Best score kept in {:?}", store.path());
    let best = BestScore::new(store);
    let engine = GameEngine::new(config, best)?;

    let mut human_mode = HumanMode::new(engine);
    human_mode.run().await?;

    Ok(())
}
