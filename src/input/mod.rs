//! Input arbitration: keyboard, on-screen buttons and swipe gestures all
//! become the same four directional intents

pub mod arbiter;
pub mod buttons;
pub mod handler;
pub mod swipe;

pub use arbiter::{InputAction, InputArbiter, InputSource};
pub use buttons::{ControlPad, PAD_HEIGHT};
pub use handler::InputHandler;
pub use swipe::{SwipeTracker, classify_swipe};
