//! Best-score persistence, the only state that outlives a game session

pub mod best_score;

pub use best_score::{BestScore, BestScoreStore, JsonFileStore, MemoryStore};
