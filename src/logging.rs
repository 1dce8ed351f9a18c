//! File logging. The terminal belongs to the TUI, so records go to a file.

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::Path;

pub const DEFAULT_LOG_FILE: &str = "neon_snake.log";

/// Install the global logger writing to `path`, truncating it.
/// `LevelFilter::Off` skips creating the file entirely.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, file).context("Failed to install logger")?;
    Ok(())
}
