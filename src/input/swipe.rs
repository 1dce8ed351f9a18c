use crossterm::event::{Event, MouseButton, MouseEventKind};

use super::arbiter::{InputAction, InputSource};
use crate::game::Direction;

pub const DEFAULT_SWIPE_THRESHOLD: u16 = 30;

/// Terminal rows are about twice as tall as columns are wide; vertical
/// displacement is scaled so both axes are measured in column widths.
pub const ROW_SCALE: i32 = 2;

/// Pick the dominant axis of a drag. Ties go to the vertical axis.
/// Returns `None` when the dominant displacement does not exceed `threshold`.
pub fn classify_swipe(dx: i32, dy: i32, threshold: u16) -> Option<Direction> {
    let threshold = i32::from(threshold);

    if dx.abs() > dy.abs() {
        if dx.abs() <= threshold {
            return None;
        }
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else {
        if dy.abs() <= threshold {
            return None;
        }
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    }
}

/// Turns a left-button press/release pair into a swipe.
/// A release that travelled too little is reported as a tap.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: u16,
    origin: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold,
            origin: None,
        }
    }

    pub fn begin(&mut self, column: u16, row: u16) {
        self.origin = Some((column, row));
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }

    /// Close the gesture. `None` if no gesture was open.
    pub fn finish(&mut self, column: u16, row: u16) -> Option<InputAction> {
        let (start_column, start_row) = self.origin.take()?;

        let dx = i32::from(column) - i32::from(start_column);
        let dy = (i32::from(row) - i32::from(start_row)) * ROW_SCALE;

        Some(match classify_swipe(dx, dy, self.threshold) {
            Some(direction) => InputAction::Steer(direction),
            None => InputAction::Tap,
        })
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl InputSource for SwipeTracker {
    fn translate(&mut self, event: &Event) -> Option<InputAction> {
        let Event::Mouse(mouse) = event else {
            return None;
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.begin(mouse.column, mouse.row);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => self.finish(mouse.column, mouse.row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_dominant_axis() {
        assert_eq!(classify_swipe(40, 10, 30), Some(Direction::Right));
        assert_eq!(classify_swipe(-40, 10, 30), Some(Direction::Left));
        assert_eq!(classify_swipe(5, 31, 30), Some(Direction::Down));
        assert_eq!(classify_swipe(5, -31, 30), Some(Direction::Up));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(classify_swipe(30, 0, 30), None);
        assert_eq!(classify_swipe(31, 0, 30), Some(Direction::Right));
        assert_eq!(classify_swipe(0, 0, 30), None);
    }

    #[test]
    fn test_tie_goes_vertical() {
        assert_eq!(classify_swipe(40, 40, 30), Some(Direction::Down));
        assert_eq!(classify_swipe(-40, -40, 30), Some(Direction::Up));
    }

    #[test]
    fn test_rows_are_scaled() {
        let mut tracker = SwipeTracker::new(30);
        tracker.begin(10, 2);
        // 16 rows down counts as 32 units
        assert_eq!(
            tracker.finish(12, 18),
            Some(InputAction::Steer(Direction::Down))
        );
    }

    #[test]
    fn test_short_drag_is_tap() {
        let mut tracker = SwipeTracker::new(30);
        tracker.begin(10, 10);
        assert_eq!(tracker.finish(12, 11), Some(InputAction::Tap));
    }

    #[test]
    fn test_release_without_press() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.finish(50, 5), None);
    }

    #[test]
    fn test_mouse_events() {
        let mut tracker = SwipeTracker::new(30);

        assert_eq!(
            tracker.translate(&mouse(MouseEventKind::Down(MouseButton::Left), 60, 5)),
            None
        );
        assert_eq!(
            tracker.translate(&mouse(MouseEventKind::Drag(MouseButton::Left), 40, 5)),
            None
        );
        assert_eq!(
            tracker.translate(&mouse(MouseEventKind::Up(MouseButton::Left), 20, 6)),
            Some(InputAction::Steer(Direction::Left))
        );
    }
}
