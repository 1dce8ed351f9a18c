use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Direction, GameState, GameStatus, Position};
use crate::input::{ControlPad, PAD_HEIGHT};
use crate::metrics::GameMetrics;

/// Everything the renderer reads, borrowed for one frame
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub state: &'a GameState,
    pub best_score: u32,
    pub metrics: &'a GameMetrics,
}

/// Screen regions for one frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub board: Rect,
    pub pad: ControlPad,
    pub pad_area: Rect,
    pub footer: Rect,
}

/// Start and end screens never shrink below this, so their text fits
const PANEL_MIN_WIDTH: u16 = 40;
const PANEL_MIN_HEIGHT: u16 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn layout(area: Rect) -> ScreenLayout {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3),          // Header
                Constraint::Min(0),             // Board
                Constraint::Length(PAD_HEIGHT), // Control pad
                Constraint::Length(2),          // Footer
            ])
            .split(area);

        ScreenLayout {
            header: chunks[0],
            board: chunks[1],
            pad: ControlPad::layout(chunks[2]),
            pad_area: chunks[2],
            footer: chunks[3],
        }
    }

    /// Draw a frame and hand back the button layout that was drawn
    pub fn render(&self, frame: &mut Frame, view: View<'_>) -> ControlPad {
        let layout = Self::layout(frame.area());

        frame.render_widget(self.render_stats(view), layout.header);

        let grid_width = view.state.grid_size as u16 * 2 + 2;
        let grid_height = view.state.grid_size as u16 + 2;
        let board = match view.state.status {
            GameStatus::Running => centered(layout.board, grid_width, grid_height),
            _ => centered(
                layout.board,
                grid_width.max(PANEL_MIN_WIDTH),
                grid_height.max(PANEL_MIN_HEIGHT),
            ),
        };
        let panel = match view.state.status {
            GameStatus::Running => self.render_grid(view.state),
            GameStatus::NotStarted => self.render_start(view),
            GameStatus::GameOver => self.render_game_over(view),
            GameStatus::Won => self.render_victory(view),
        };
        frame.render_widget(panel, board);

        for (direction, rect) in layout.pad.buttons() {
            frame.render_widget(self.render_button(direction), rect);
        }

        frame.render_widget(self.render_controls(), layout.footer);

        layout.pad
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let mut lines = Vec::with_capacity(state.grid_size);
        let head = state.snake.head();

        for y in 0..state.grid_size {
            let mut spans = Vec::with_capacity(state.grid_size);

            for x in 0..state.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::White)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("■ ", Style::default().fg(Color::Cyan))
                } else if state.food == Some(pos) {
                    Span::styled(
                        "● ",
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("· ", Style::default().fg(Color::Rgb(60, 0, 90)))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Neon Snake "),
        )
    }

    fn render_stats(&self, view: View<'_>) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(view.state.score.to_string(), value),
                Span::raw("    "),
                Span::styled("Best: ", label),
                Span::styled(view.best_score.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Speed: ", label),
                Span::styled(
                    format!("{}ms", view.state.interval.as_millis()),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Time: ", label),
                Span::styled(view.metrics.format_time(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Games: ", label),
                Span::styled(
                    view.metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Longest: ", label),
                Span::styled(
                    view.metrics.longest_snake.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_start(&self, view: View<'_>) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "NEON SNAKE",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(view.best_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter, Space or click to start",
                Style::default().fg(Color::Gray),
            )),
        ];

        self.panel(text, Color::Cyan)
    }

    fn render_game_over(&self, view: View<'_>) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        text.extend(final_score_lines(view));
        text.extend([Line::from(""), restart_hint()]);

        self.panel(text, Color::Red)
    }

    fn render_victory(&self, view: View<'_>) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "YOU WIN",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        text.extend(final_score_lines(view));
        text.extend([Line::from(""), restart_hint()]);

        self.panel(text, Color::Green)
    }

    fn panel(&self, text: Vec<Line<'static>>, border: Color) -> Paragraph<'static> {
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
    }

    fn render_button(&self, direction: Direction) -> Paragraph<'static> {
        let arrow = match direction {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Left => "◀",
            Direction::Right => "▶",
        };

        Paragraph::new(arrow)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Black).bg(Color::Magenta))
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(", "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(", buttons or swipe to move | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" to start | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

fn final_score_lines(view: View<'_>) -> [Line<'static>; 2] {
    [
        Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(view.best_score.to_string(), Style::default().fg(Color::White)),
        ]),
    ]
}

fn restart_hint() -> Line<'static> {
    Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::Gray)),
        Span::styled(
            "R",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
        Span::styled(
            "Q",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to quit", Style::default().fg(Color::Gray)),
    ])
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
