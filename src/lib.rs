//! Neon Snake - classic Snake in the terminal
//!
//! This library provides:
//! - Core game rules and the tick scheduler (game module)
//! - Keyboard, button and swipe input arbitration (input module)
//! - TUI rendering (render module)
//! - Best score persistence (persistence module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
