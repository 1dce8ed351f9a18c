use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::arbiter::{InputAction, InputSource};
use crate::game::Direction;

/// Keyboard mapping: arrows and WASD steer, Enter/Space/R start
#[derive(Debug, Clone, Copy, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> InputAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => InputAction::Steer(Direction::Up),
            KeyCode::Down => InputAction::Steer(Direction::Down),
            KeyCode::Left => InputAction::Steer(Direction::Left),
            KeyCode::Right => InputAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w' | 'W') => InputAction::Steer(Direction::Up),
            KeyCode::Char('s' | 'S') => InputAction::Steer(Direction::Down),
            KeyCode::Char('a' | 'A') => InputAction::Steer(Direction::Left),
            KeyCode::Char('d' | 'D') => InputAction::Steer(Direction::Right),

            // Controls
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => InputAction::Quit,
            KeyCode::Enter | KeyCode::Char(' ' | 'r' | 'R') => InputAction::Start,

            _ => InputAction::None,
        }
    }
}

impl InputSource for InputHandler {
    fn translate(&mut self, event: &Event) -> Option<InputAction> {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Some(self.handle_key_event(*key))
            }
            _ => None,
        }
    }
}
