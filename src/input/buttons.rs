use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;

use super::arbiter::{InputAction, InputSource};
use crate::game::Direction;

pub const BUTTON_WIDTH: u16 = 7;
const BUTTON_GAP: u16 = 1;

/// Rows the pad needs: up on the first, left/down/right on the second
pub const PAD_HEIGHT: u16 = 2;

/// On-screen direction buttons. The same layout is used to draw the pad and
/// to hit-test clicks, so a click lands on exactly what was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPad {
    buttons: [(Direction, Rect); 4],
}

impl Default for ControlPad {
    /// Pad with no area; nothing can be hit until it is laid out
    fn default() -> Self {
        Self::layout(Rect::default())
    }
}

impl ControlPad {
    /// Lay the pad out centred in `area`, clipped to it
    pub fn layout(area: Rect) -> Self {
        let up_x = area.x + area.width.saturating_sub(BUTTON_WIDTH) / 2;
        let top = area.y;
        let bottom = area.y.saturating_add(1);
        let step = BUTTON_WIDTH + BUTTON_GAP;

        let button = |x: u16, y: u16| Rect::new(x, y, BUTTON_WIDTH, 1).intersection(area);

        Self {
            buttons: [
                (Direction::Up, button(up_x, top)),
                (Direction::Left, button(up_x.saturating_sub(step), bottom)),
                (Direction::Down, button(up_x, bottom)),
                (Direction::Right, button(up_x.saturating_add(step), bottom)),
            ],
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = (Direction, Rect)> + '_ {
        self.buttons.iter().copied()
    }

    /// Direction of the button under the cell, if any
    pub fn hit(&self, column: u16, row: u16) -> Option<Direction> {
        self.buttons
            .iter()
            .find(|(_, rect)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(direction, _)| *direction)
    }
}

impl InputSource for ControlPad {
    fn translate(&mut self, event: &Event) -> Option<InputAction> {
        match event {
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.hit(mouse.column, mouse.row).map(InputAction::Steer)
            }
            _ => None,
        }
    }
}
