use std::collections::VecDeque;
use std::time::Duration;

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Direction that will be committed on the next tick
    pub pending_direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction.
    /// The body trails behind the head, opposite to the direction of travel.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut segment = head;
        body.push_back(segment);

        for _ in 1..length {
            segment = segment.moved_by(dx, dy);
            body.push_back(segment);
        }

        Self {
            body,
            direction,
            pending_direction: direction,
        }
    }

    /// Build a snake from explicit segments, head first.
    /// Returns `None` for an empty body or one with repeated cells.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Position>,
        direction: Direction,
    ) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        for (i, pos) in body.iter().enumerate() {
            if body.iter().skip(i + 1).any(|other| other == pos) {
                return None;
            }
        }

        Some(Self {
            body,
            direction,
            pending_direction: direction,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Whether any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head; drop the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    GameOver,
    /// Snake filled the whole grid
    Won,
}

/// Complete game state. This is also the read-only snapshot handed to the
/// renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the grid is full
    pub food: Option<Position>,
    pub grid_size: usize,
    pub score: u32,
    /// Current tick interval
    pub interval: Duration,
    pub ticks: u32,
    pub status: GameStatus,
}

impl GameState {
    /// Create a running game state
    pub fn new(snake: Snake, food: Position, grid_size: usize, interval: Duration) -> Self {
        Self {
            snake,
            food: Some(food),
            grid_size,
            score: 0,
            interval,
            ticks: 0,
            status: GameStatus::Running,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = self.grid_size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }
}
