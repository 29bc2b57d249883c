use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::config::STEP;
use crate::entity::Coord;
use crate::game_loop::{GameLoop, GameState};

/// Terminal columns per lattice cell. Terminal glyphs are about twice as
/// tall as they are wide.
const CELL_WIDTH: u16 = 2;

/// Scales a player's base colour. Heads use 220, segments fade in with
/// their distance from the head.
fn shade((r, g, b): (u8, u8, u8), scale: u32) -> Color {
    let channel = |c: u8| (u32::from(c) * scale / 255).min(255) as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

pub fn segment_color(base: (u8, u8, u8), index: usize) -> Color {
    let scale = 180 + (index as u32 * 6).min(75);
    shade(base, scale)
}

pub fn head_color(base: (u8, u8, u8)) -> Color {
    shade(base, 220)
}

/// Draws the committed state of one tick. Only ever reads.
pub struct ArenaView<'a> {
    state: &'a GameState,
}

impl<'a> ArenaView<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    /// Size of the lattice in terminal cells.
    pub fn size(state: &GameState) -> (u16, u16) {
        let side = (2 * state.arena.playfield / STEP + 1) as u16;
        (side * CELL_WIDTH, side)
    }

    fn cell(&self, pos: Coord, area: Rect) -> Option<(u16, u16)> {
        let pf = self.state.arena.playfield;
        if pos.x.abs() > pf || pos.y.abs() > pf {
            return None;
        }
        let col = u16::try_from((pos.x + pf).div_euclid(STEP)).ok()? * CELL_WIDTH;
        let row = u16::try_from((pf - pos.y).div_euclid(STEP)).ok()?;
        if col + CELL_WIDTH > area.width || row >= area.height {
            return None;
        }
        Some((area.x + col, area.y + row))
    }

    fn paint(&self, buf: &mut Buffer, area: Rect, pos: Coord, symbol: &str, style: Style) {
        if let Some((x, y)) = self.cell(pos, area) {
            for dx in 0..CELL_WIDTH {
                if let Some(cell) = buf.cell_mut((x + dx, y)) {
                    cell.set_symbol(if dx == 0 { symbol } else { " " })
                        .set_style(style);
                }
            }
        }
    }
}

impl Widget for ArenaView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.paint(
            buf,
            area,
            self.state.arena.food.position,
            "●",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );

        for snake in &self.state.snakes {
            // Tail first so that overlapping cells show the segment nearest the head
            for (i, seg) in snake.segments.iter().enumerate().rev() {
                self.paint(
                    buf,
                    area,
                    seg.position,
                    " ",
                    Style::default().bg(segment_color(snake.color, i)),
                );
            }
        }
        for snake in &self.state.snakes {
            self.paint(
                buf,
                area,
                snake.head.position,
                "◆",
                Style::default()
                    .fg(Color::White)
                    .bg(head_color(snake.color))
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, game: &GameLoop) {
        let state = game.state();
        let chunks = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Scores
                Constraint::Min(0),    // Arena
                Constraint::Length(3), // Controls
            ])
            .split(frame.area());

        frame.render_widget(self.scoreboard(state), chunks[0]);

        let (width, height) = ArenaView::size(state);
        let arena_area = centered(chunks[1], width + 2, height + 2);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .title(if game.is_paused() { " Paused " } else { " Snake " });
        let inner = block.inner(arena_area);
        frame.render_widget(block, arena_area);
        frame.render_widget(ArenaView::new(state), inner);

        frame.render_widget(self.controls(state.snakes.len(), game.is_paused()), chunks[2]);
    }

    fn scoreboard(&self, state: &GameState) -> Paragraph<'_> {
        let text = state
            .snakes
            .iter()
            .map(|s| format!("{}: {} (High {})", s.name, s.score, s.high_score))
            .collect::<Vec<_>>()
            .join("    ");
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL))
    }

    fn controls(&self, players: usize, paused: bool) -> Paragraph<'_> {
        let steer = if players == 1 {
            "WASD/arrows: steer"
        } else {
            "P1 WASD  P2 IJKL"
        };
        let pause = if paused { "SPACE: resume" } else { "SPACE: pause" };
        Paragraph::new(format!("{}    {}    Q: quit", steer, pause))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
