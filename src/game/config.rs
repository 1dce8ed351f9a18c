use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest grid side accepted; keeps every coordinate well inside `i32`
pub const MAX_GRID_SIZE: usize = 200;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded per food eaten
    pub food_score: u32,

    // Difficulty curve
    /// Tick interval at the start of a game
    pub initial_interval_ms: u64,
    /// How much the interval shrinks per food eaten
    pub speed_step_ms: u64,
    /// The interval never drops below this
    pub min_interval_ms: u64,

    /// Minimum dominant-axis displacement for a drag to count as a swipe
    pub swipe_threshold: u16,

    /// Fixed seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            food_score: 10,
            initial_interval_ms: 250,
            speed_step_ms: 10,
            min_interval_ms: 100,
            swipe_threshold: 30,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.initial_snake_length >= 1,
            "initial_snake_length must be at least 1"
        );
        ensure!(
            self.grid_size <= MAX_GRID_SIZE,
            "grid_size {} exceeds the maximum of {}",
            self.grid_size,
            MAX_GRID_SIZE
        );
        // The snake is laid out from the centre towards the right edge
        ensure!(
            self.grid_size / 2 + self.initial_snake_length <= self.grid_size,
            "grid_size {} is too small for a snake of length {}",
            self.grid_size,
            self.initial_snake_length
        );
        ensure!(
            self.initial_snake_length < self.cell_count(),
            "a snake of length {} leaves no room for food on a {}x{} grid",
            self.initial_snake_length,
            self.grid_size,
            self.grid_size
        );
        ensure!(self.food_score > 0, "food_score must be positive");
        ensure!(self.min_interval_ms > 0, "min_interval_ms must be positive");
        ensure!(
            self.initial_interval_ms >= self.min_interval_ms,
            "initial_interval_ms ({}) is below min_interval_ms ({})",
            self.initial_interval_ms,
            self.min_interval_ms
        );
        Ok(())
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    /// Interval after one more food, clamped to the minimum
    pub fn next_interval(&self, current: Duration) -> Duration {
        let step = Duration::from_millis(self.speed_step_ms);
        let floor = Duration::from_millis(self.min_interval_ms);
        current.saturating_sub(step).max(floor)
    }

    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}
