use anyhow::{Result, ensure};
use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::time::Duration;

use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameState, GameStatus, Position, Snake},
};
use crate::persistence::BestScore;

/// Direction every new game starts moving in
pub const START_DIRECTION: Direction = Direction::Left;

/// What a single tick did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is not running; nothing changed
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake ate and grew
    Ate {
        score: u32,
        /// Tick interval to use from now on
        interval: Duration,
        /// True when the interval shrank and the timer must be re-armed
        speed_changed: bool,
    },
    /// The game ended on a collision
    Collided(CollisionType),
    /// The snake filled the whole grid
    Won,
}

impl TickOutcome {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, TickOutcome::Idle)
    }
}

/// The game engine that owns the session state and applies the rules
#[derive(Debug)]
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
    best: BestScore,
}

impl GameEngine {
    /// Create an engine waiting for `start`
    pub fn new(config: GameConfig, best: BestScore) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = fresh_state(&config, &mut rng);
        state.status = GameStatus::NotStarted;

        Ok(Self {
            config,
            rng,
            state,
            best,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view for the renderer
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn interval(&self) -> Duration {
        self.state.interval
    }

    pub fn best_score(&self) -> u32 {
        self.best.get()
    }

    /// Reset everything and begin a new run.
    /// Returns the interval the tick timer must be armed with.
    pub fn start(&mut self) -> Duration {
        self.state = fresh_state(&self.config, &mut self.rng);
        info!(
            "Game started on a {0}x{0} grid at {1:?} per tick",
            self.config.grid_size, self.state.interval
        );
        self.state.interval
    }

    /// Same as `start`, from any status
    pub fn restart(&mut self) -> Duration {
        debug!("Restarting after {:?}", self.state.status);
        self.start()
    }

    /// Begin a run from a hand-placed snake and food
    pub fn start_with(&mut self, snake: Snake, food: Position) -> Result<Duration> {
        let state = GameState::new(
            snake,
            food,
            self.config.grid_size,
            self.config.initial_interval(),
        );
        ensure!(
            state.snake.segments().all(|pos| state.is_in_bounds(*pos)),
            "snake leaves the grid"
        );
        ensure!(state.is_in_bounds(food), "food is off the grid");
        ensure!(!state.is_occupied_by_snake(food), "food sits on the snake");

        self.state = state;
        Ok(self.state.interval)
    }

    /// Queue a direction for the next tick.
    /// Ignored unless running, and when it would reverse the current direction.
    pub fn change_direction(&mut self, requested: Direction) -> bool {
        if self.state.status != GameStatus::Running {
            return false;
        }

        let snake = &mut self.state.snake;
        if snake.direction.is_opposite(requested) {
            return false;
        }

        snake.pending_direction = requested;
        true
    }

    /// Advance the simulation by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        let snake = &mut self.state.snake;
        snake.direction = snake.pending_direction;
        let new_head = snake.head().moved_in_direction(snake.direction);

        if let Some(collision) = self.check_collision(new_head) {
            self.state.ticks += 1;
            debug!("Collision {:?} at {:?}", collision, new_head);
            self.end();
            return TickOutcome::Collided(collision);
        }

        let ate_food = self.state.food == Some(new_head);
        self.state.snake.advance(new_head, ate_food);
        self.state.ticks += 1;

        if !ate_food {
            return TickOutcome::Moved;
        }

        self.state.score += self.config.food_score;
        self.best.record(self.state.score);

        let previous = self.state.interval;
        self.state.interval = self.config.next_interval(previous);
        let speed_changed = self.state.interval != previous;
        if speed_changed {
            debug!("Tick interval now {:?}", self.state.interval);
        }

        match spawn_food(&mut self.rng, &self.state.snake, self.config.grid_size) {
            Some(food) => {
                self.state.food = Some(food);
                TickOutcome::Ate {
                    score: self.state.score,
                    interval: self.state.interval,
                    speed_changed,
                }
            }
            None => {
                self.state.food = None;
                self.finish(GameStatus::Won);
                TickOutcome::Won
            }
        }
    }

    /// Stop the current run and return the final score
    pub fn end(&mut self) -> u32 {
        if self.state.status == GameStatus::Running {
            self.finish(GameStatus::GameOver);
        }
        self.state.score
    }

    fn finish(&mut self, status: GameStatus) {
        self.state.status = status;
        self.best.record(self.state.score);
        info!(
            "Game finished ({:?}) with score {} after {} ticks, best {}",
            status,
            self.state.score,
            self.state.ticks,
            self.best.get()
        );
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail counts; it has not moved away yet
        if self.state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }
}

/// New running state: centred snake heading left, food placed
fn fresh_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
    let center = (config.grid_size / 2) as i32;
    let snake = Snake::new(
        Position::new(center, center),
        START_DIRECTION,
        config.initial_snake_length,
    );

    let mut state = GameState::new(
        snake,
        Position::new(0, 0),
        config.grid_size,
        config.initial_interval(),
    );
    state.food = spawn_food(rng, &state.snake, config.grid_size);
    state
}

/// Pick a uniformly random free cell, `None` when the snake fills the grid
fn spawn_food(rng: &mut StdRng, snake: &Snake, grid_size: usize) -> Option<Position> {
    let cells = grid_size * grid_size;
    if snake.len() >= cells {
        return None;
    }

    // Rejection sampling is cheap while most of the grid is free
    if snake.len() * 2 < cells {
        loop {
            let x = rng.gen_range(0..grid_size) as i32;
            let y = rng.gen_range(0..grid_size) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }

    let size = grid_size as i32;
    let free: Vec<Position> = (0..size)
        .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();
    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::new(config, BestScore::in_memory()).unwrap()
    }

    fn seeded(grid_size: usize) -> GameConfig {
        GameConfig {
            seed: Some(42),
            ..GameConfig::new(grid_size)
        }
    }

    #[test]
    fn test_new_engine_waits_for_start() {
        let mut engine = engine(GameConfig::default());
        assert_eq!(engine.status(), GameStatus::NotStarted);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.change_direction(Direction::Up));
    }

    #[test]
    fn test_start_layout() {
        let mut engine = engine(GameConfig::default());
        let interval = engine.start();
        let state = engine.state();

        assert_eq!(interval, Duration::from_millis(250));
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        let body: Vec<Position> = state.snake.segments().copied().collect();
        assert_eq!(
            body,
            vec![
                Position::new(10, 10),
                Position::new(11, 10),
                Position::new(12, 10)
            ]
        );
        assert_eq!(state.snake.direction, Direction::Left);
        let food = state.food.unwrap();
        assert!(state.is_in_bounds(food));
        assert!(!state.is_occupied_by_snake(food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::small());
        engine.start();
        let initial_head = engine.state().snake.head();
        engine.state.food = Some(Position::new(0, 0));

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(engine.state().ticks, 1);
        assert_eq!(engine.state().snake.head(), initial_head.moved_by(-1, 0));
        assert_eq!(engine.state().snake.len(), 3);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::small());
        engine.start();

        let head = engine.state().snake.head();
        engine.state.food = Some(head.moved_in_direction(Direction::Left));

        let outcome = engine.tick();

        assert_eq!(
            outcome,
            TickOutcome::Ate {
                score: 10,
                interval: Duration::from_millis(240),
                speed_changed: true,
            }
        );
        assert_eq!(engine.state().snake.len(), 4);
        let food = engine.state().food.unwrap();
        assert!(!engine.state().is_occupied_by_snake(food));
        assert_eq!(engine.best_score(), 10);
    }

    #[test]
    fn test_speed_floor() {
        let config = GameConfig {
            initial_interval_ms: 105,
            ..GameConfig::small()
        };
        let mut engine = engine(config);
        engine.start();

        for expected in [100, 100] {
            let head = engine.state().snake.head();
            let dir = engine.state().snake.direction;
            engine.state.food = Some(head.moved_in_direction(dir));
            match engine.tick() {
                TickOutcome::Ate { interval, .. } => {
                    assert_eq!(interval, Duration::from_millis(expected))
                }
                other => panic!("expected to eat, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unchanged_speed_does_not_request_reschedule() {
        let config = GameConfig {
            initial_interval_ms: 100,
            ..GameConfig::small()
        };
        let mut engine = engine(config);
        engine.start();
        let head = engine.state().snake.head();
        engine.state.food = Some(head.moved_in_direction(Direction::Left));

        assert!(matches!(
            engine.tick(),
            TickOutcome::Ate {
                speed_changed: false,
                ..
            }
        ));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameConfig::small());
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        engine.start_with(snake.clone(), Position::new(5, 5)).unwrap();

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Wall));
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert_eq!(engine.state().snake, snake);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::small());

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        engine.start_with(snake, Position::new(8, 8)).unwrap();

        engine.change_direction(Direction::Down);
        engine.tick();
        engine.change_direction(Direction::Left);
        engine.tick();
        engine.change_direction(Direction::Up);
        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameConfig::small());
        engine.start();

        assert!(!engine.change_direction(Direction::Right));
        assert_eq!(engine.state().snake.pending_direction, Direction::Left);
    }

    #[test]
    fn test_reversal_checked_against_current_not_pending() {
        let mut engine = engine(GameConfig::small());
        engine.start();

        // Queue up, then down: down is not the reverse of the current (left)
        assert!(engine.change_direction(Direction::Up));
        assert!(engine.change_direction(Direction::Down));
        assert_eq!(engine.state().snake.pending_direction, Direction::Down);
    }

    #[test]
    fn test_last_queued_direction_wins() {
        let mut engine = engine(seeded(10));
        engine.start();
        engine.state.food = Some(Position::new(0, 0));
        let head = engine.state().snake.head();

        engine.change_direction(Direction::Up);
        engine.change_direction(Direction::Down);
        engine.tick();

        assert_eq!(engine.state().snake.head(), head.moved_by(0, 1));
        assert_eq!(engine.state().snake.direction, Direction::Down);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::small());
        engine.start();
        engine.end();
        let ticks_before = engine.state().ticks;

        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.state().ticks, ticks_before);
        assert!(!engine.change_direction(Direction::Up));
    }

    #[test]
    fn test_restart_resets_session() {
        let mut engine = engine(GameConfig::small());
        engine.start();
        engine.state.score = 70;
        engine.state.interval = Duration::from_millis(180);
        engine.end();

        let interval = engine.restart();

        assert_eq!(interval, Duration::from_millis(250));
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().snake.len(), 3);
    }

    #[test]
    fn test_filling_the_grid_wins() {
        let config = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::new(5)
        };
        let mut engine = engine(config);

        // Serpentine covering 24 of 25 cells, head at (0,4), last free cell (0,3)
        let mut cells = Vec::new();
        for y in (0..5).rev() {
            let xs: Vec<i32> = if y % 2 == 0 {
                (0..5).collect()
            } else {
                (0..5).rev().collect()
            };
            for x in xs {
                cells.push(Position::new(x, y));
            }
        }
        cells.retain(|p| *p != Position::new(0, 3));
        let snake = Snake::from_segments(cells, Direction::Up).unwrap();
        engine.start_with(snake, Position::new(0, 3)).unwrap();

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.state().food, None);
        assert_eq!(engine.state().snake.len(), 25);
    }

    #[test]
    fn test_grid_without_free_cell_is_rejected() {
        let full = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::new(1)
        };
        assert!(GameEngine::new(full, BestScore::in_memory()).is_err());

        let mut engine = engine(GameConfig {
            initial_snake_length: 1,
            seed: Some(3),
            ..GameConfig::new(2)
        });
        engine.start();
        assert_eq!(engine.status(), GameStatus::Running);
        assert!(engine.state().food.is_some());
    }

    #[test]
    fn test_spawn_food_on_crowded_grid() {
        let mut rng = StdRng::seed_from_u64(1);
        let snake = Snake::from_segments(
            [Position::new(0, 0), Position::new(1, 0), Position::new(0, 1)],
            Direction::Up,
        )
        .unwrap();
        let free = spawn_food(&mut rng, &snake, 2).unwrap();
        assert_eq!(free, Position::new(1, 1));
    }

    #[test]
    fn test_best_score_loaded_and_raised() {
        let store = MemoryStore::with_value(20);
        let mut engine =
            GameEngine::new(GameConfig::small(), BestScore::new(store.clone())).unwrap();
        assert_eq!(engine.best_score(), 20);

        engine.start();
        for _ in 0..3 {
            let head = engine.state().snake.head();
            let dir = engine.state().snake.direction;
            engine.state.food = Some(head.moved_in_direction(dir));
            engine.tick();
        }

        assert_eq!(engine.state().score, 30);
        assert_eq!(store.get(), 30);
    }

    #[test]
    fn test_start_with_rejects_food_on_snake() {
        let mut engine = engine(GameConfig::small());
        let snake = Snake::new(Position::new(5, 5), Direction::Left, 3);
        assert!(engine.start_with(snake, Position::new(6, 5)).is_err());
    }
}
