//! Core game logic module for Snake
//!
//! This module contains the rules and the tick timer without any terminal or
//! rendering dependencies. The engine can be driven directly, which is how
//! the tests exercise it.

pub mod config;
pub mod direction;
pub mod engine;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, START_DIRECTION, TickOutcome};
pub use scheduler::TickScheduler;
pub use state::{CollisionType, GameState, GameStatus, Position, Snake};
