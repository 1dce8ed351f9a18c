use crossterm::event::Event;

use super::buttons::ControlPad;
use super::handler::InputHandler;
use super::swipe::SwipeTracker;
use crate::game::Direction;

/// Normalized result of any input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Directional intent
    Steer(Direction),
    /// Start a new game, or restart a finished one
    Start,
    /// A click or touch that was not a swipe
    Tap,
    Quit,
    None,
}

/// Anything that can turn raw terminal events into actions
pub trait InputSource {
    /// `None` when this source does not claim the event
    fn translate(&mut self, event: &Event) -> Option<InputAction>;
}

/// Funnels keyboard, on-screen buttons and swipes into one action stream.
/// Buttons are consulted before swipes so a press on a button never starts a
/// gesture.
#[derive(Debug, Clone, Default)]
pub struct InputArbiter {
    keys: InputHandler,
    pad: ControlPad,
    swipe: SwipeTracker,
}

impl InputArbiter {
    pub fn new(swipe_threshold: u16) -> Self {
        Self {
            keys: InputHandler::new(),
            pad: ControlPad::default(),
            swipe: SwipeTracker::new(swipe_threshold),
        }
    }

    /// Replace the button layout with the one last drawn
    pub fn set_pad(&mut self, pad: ControlPad) {
        self.pad = pad;
    }

    pub fn pad(&self) -> &ControlPad {
        &self.pad
    }

    pub fn translate(&mut self, event: &Event) -> InputAction {
        if let Some(action) = self.keys.translate(event) {
            return action;
        }
        if let Some(action) = self.pad.translate(event) {
            self.swipe.cancel();
            return action;
        }
        if let Event::FocusLost = event {
            self.swipe.cancel();
        }
        self.swipe.translate(event).unwrap_or(InputAction::None)
    }
}
