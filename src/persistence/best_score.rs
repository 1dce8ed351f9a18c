use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Storage backend for the single persisted best score
pub trait BestScoreStore {
    /// Stored value, `Ok(0)` when nothing has been saved yet
    fn load(&self) -> Result<u32>;

    fn save(&self, score: u32) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u32,
}

/// Keeps the best score in a small JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read best score from {:?}", self.path))?;
        let record: BestScoreRecord = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse best score in {:?}", self.path))?;

        Ok(record.best_score)
    }

    fn save(&self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&BestScoreRecord { best_score: score })
            .context("Failed to serialize best score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write best score to {:?}", self.path))?;

        Ok(())
    }
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Arc<Mutex<u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u32) -> Self {
        Self {
            value: Arc::new(Mutex::new(score)),
        }
    }

    pub fn get(&self) -> u32 {
        self.value.lock().map(|v| *v).unwrap_or_default()
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.get())
    }

    fn save(&self, score: u32) -> Result<()> {
        let mut value = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("best score slot poisoned"))?;
        *value = score;
        Ok(())
    }
}

/// Cached best score that writes through to its store on every new record.
/// Store failures are logged and never reach the game.
pub struct BestScore {
    store: Box<dyn BestScoreStore + Send>,
    value: u32,
}

impl BestScore {
    pub fn new(store: impl BestScoreStore + Send + 'static) -> Self {
        let value = match store.load() {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not load best score, starting from 0: {:#}", e);
                0
            }
        };

        Self {
            store: Box::new(store),
            value,
        }
    }

    /// Best score that never touches disk
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    /// Offer a score; persists immediately and returns true if it is a new best
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.value {
            return false;
        }

        self.value = score;
        debug!("New best score {}", score);
        if let Err(e) = self.store.save(score) {
            warn!("Could not save best score {}: {:#}", score, e);
        }
        true
    }
}

impl std::fmt::Debug for BestScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestScore")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
