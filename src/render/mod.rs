pub mod renderer;

pub use renderer::{Renderer, ScreenLayout, View};
