use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{GameEngine, GameStatus, TickOutcome, TickScheduler};
use crate::input::{ControlPad, InputAction, InputArbiter};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, View};

/// How often the header clock is refreshed between ticks
const CLOCK_REFRESH: Duration = Duration::from_millis(250);

/// Interactive play: one task owns the engine, the tick timer and the
/// terminal, so ticks, input and redraws never interleave.
pub struct HumanMode {
    engine: GameEngine,
    scheduler: TickScheduler,
    metrics: GameMetrics,
    renderer: Renderer,
    arbiter: InputArbiter,
    should_quit: bool,
    needs_redraw: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine) -> Self {
        let arbiter = InputArbiter::new(engine.config().swipe_threshold);

        Self {
            engine,
            scheduler: TickScheduler::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            arbiter,
            should_quit: false,
            needs_redraw: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        if self.engine.status() == GameStatus::Running {
            self.engine.end();
        }
        info!(
            "Leaving after {} games, best score {}",
            self.metrics.games_played,
            self.engine.best_score()
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut clock = interval(CLOCK_REFRESH);

        loop {
            if self.needs_redraw {
                self.draw(terminal)?;
            }

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(&event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick; never fires while the scheduler is cancelled
                _ = self.scheduler.tick() => {
                    self.on_tick();
                }

                // Keep the header clock moving
                _ = clock.tick() => {
                    if self.engine.status() == GameStatus::Running {
                        self.metrics.update();
                        self.needs_redraw = true;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Resize(..) = event {
            self.needs_redraw = true;
        }

        match self.arbiter.translate(event) {
            InputAction::Steer(direction) => {
                // Dropped by the engine unless a game is running
                self.engine.change_direction(direction);
            }
            InputAction::Start | InputAction::Tap => {
                if self.engine.status() != GameStatus::Running {
                    self.start_game();
                }
            }
            InputAction::Quit => {
                self.should_quit = true;
            }
            InputAction::None => {}
        }
    }

    fn on_tick(&mut self) {
        let outcome = self.engine.tick();

        match outcome {
            TickOutcome::Ate {
                interval,
                speed_changed: true,
                ..
            } => {
                self.scheduler.arm(interval);
            }
            TickOutcome::Collided(_) | TickOutcome::Won => {
                self.finish_game();
            }
            _ => {}
        }

        if outcome.needs_redraw() {
            self.needs_redraw = true;
        }
    }

    fn start_game(&mut self) {
        // The old timer must be gone before the new one is armed
        self.scheduler.cancel();
        let interval = self.engine.restart();
        self.scheduler.arm(interval);
        self.metrics.on_game_start();
        self.needs_redraw = true;
    }

    fn finish_game(&mut self) {
        self.scheduler.cancel();
        self.metrics.on_game_over(self.engine.state().snake.len());
        self.needs_redraw = true;
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let view = View {
            state: self.engine.state(),
            best_score: self.engine.best_score(),
            metrics: &self.metrics,
        };
        let renderer = self.renderer;
        let mut pad = ControlPad::default();

        terminal
            .draw(|frame| {
                pad = renderer.render(frame, view);
            })
            .context("Failed to draw frame")?;

        self.arbiter.set_pad(pad);
        self.needs_redraw = false;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Position, Snake};
    use crate::persistence::BestScore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::backend::TestBackend;

    fn mode() -> HumanMode {
        let engine = GameEngine::new(GameConfig::small(), BestScore::in_memory()).unwrap();
        HumanMode::new(engine)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.engine.status(), GameStatus::NotStarted);
        assert!(!mode.scheduler.is_armed());
    }

    #[tokio::test]
    async fn test_start_arms_scheduler() {
        let mut mode = mode();
        mode.handle_event(&key(KeyCode::Enter));

        assert_eq!(mode.engine.status(), GameStatus::Running);
        assert_eq!(mode.scheduler.period(), Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_intents_before_start_are_dropped() {
        let mut mode = mode();
        mode.handle_event(&key(KeyCode::Up));
        mode.handle_event(&key(KeyCode::Enter));

        assert_eq!(mode.engine.state().snake.pending_direction, Direction::Left);
    }

    #[tokio::test]
    async fn test_eating_reschedules() {
        let mut mode = mode();
        mode.handle_event(&key(KeyCode::Enter));
        mode.engine
            .start_with(
                Snake::new(Position::new(5, 5), Direction::Left, 3),
                Position::new(4, 5),
            )
            .unwrap();

        mode.on_tick();

        assert_eq!(mode.engine.state().score, 10);
        assert_eq!(mode.scheduler.period(), Some(Duration::from_millis(240)));
    }

    #[tokio::test]
    async fn test_collision_cancels_scheduler() {
        let mut mode = mode();
        mode.handle_event(&key(KeyCode::Enter));
        mode.engine
            .start_with(
                Snake::new(Position::new(0, 5), Direction::Left, 3),
                Position::new(8, 8),
            )
            .unwrap();

        mode.on_tick();

        assert_eq!(mode.engine.status(), GameStatus::GameOver);
        assert!(!mode.scheduler.is_armed());
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[tokio::test]
    async fn test_restart_after_game_over() {
        let mut mode = mode();
        mode.handle_event(&key(KeyCode::Enter));
        mode.engine.end();
        mode.finish_game();

        mode.handle_event(&key(KeyCode::Char('r')));

        assert_eq!(mode.engine.status(), GameStatus::Running);
        assert_eq!(mode.scheduler.period(), Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_start_key_ignored_mid_game() {
        let mut mode = mode();
        mode.handle_event(&key(KeyCode::Enter));
        mode.engine.change_direction(Direction::Up);

        mode.handle_event(&key(KeyCode::Enter));

        assert_eq!(mode.engine.state().snake.pending_direction, Direction::Up);
    }

    #[tokio::test]
    async fn test_drawn_buttons_steer() {
        let mut mode = mode();
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        mode.handle_event(&key(KeyCode::Enter));
        mode.draw(&mut terminal).unwrap();

        let (_, up) = mode
            .arbiter
            .pad()
            .buttons()
            .find(|(direction, _)| *direction == Direction::Up)
            .unwrap();
        mode.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: up.x,
            row: up.y,
            modifiers: KeyModifiers::NONE,
        }));

        assert_eq!(mode.engine.state().snake.pending_direction, Direction::Up);
        assert!(!mode.needs_redraw);
    }

    fn click(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[tokio::test]
    async fn test_tap_starts_and_restarts() {
        let mut mode = mode();
        mode.handle_event(&click(MouseEventKind::Down(MouseButton::Left)));
        mode.handle_event(&click(MouseEventKind::Up(MouseButton::Left)));

        assert_eq!(mode.engine.status(), GameStatus::Running);
        assert!(mode.scheduler.is_armed());

        mode.engine.end();
        mode.finish_game();
        assert!(!mode.scheduler.is_armed());

        mode.handle_event(&click(MouseEventKind::Down(MouseButton::Left)));
        mode.handle_event(&click(MouseEventKind::Up(MouseButton::Left)));

        assert_eq!(mode.engine.status(), GameStatus::Running);
        assert_eq!(mode.scheduler.period(), Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(&key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
