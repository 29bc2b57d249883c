use std::io::{stdout, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::{sleep, Instant};

use crate::config::GameConfig;
use crate::game_loop::GameLoop;
use crate::highscore::{self, HighscoreWriter, JsonFileStore};
use crate::input::{Command, InputHandler};
use crate::render::Renderer;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// One terminal session: owns the game, the screen and the high score writer.
pub struct App {
    game: GameLoop,
    renderer: Renderer,
    input: InputHandler,
    writer: HighscoreWriter,
    should_quit: bool,
}

impl App {
    /// Must be called from within a tokio runtime.
    pub fn new(config: GameConfig, store: JsonFileStore) -> Self {
        let saved = highscore::load_or_default(&store);
        info!(
            "loaded {} high scores from {}",
            saved.len(),
            store.path().display()
        );
        let input = InputHandler::new(config.players.len());

        App {
            game: GameLoop::new(config, saved),
            renderer: Renderer::new(),
            input,
            writer: HighscoreWriter::spawn(store),
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let mut terminal =
            Terminal::new(CrosstermBackend::new(stdout())).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;
        if let Err(e) = &result {
            error!("game loop stopped: {:#}", e);
        }

        let cleanup = restore_terminal(&mut terminal);
        self.writer.finish().await;
        info!("session over");

        result.and(cleanup)
    }

    async fn run_loop(&mut self, terminal: &mut Term) -> Result<()> {
        let mut events = EventStream::new();

        // Re-armed after every tick so a faster interval applies from the next step.
        let next_tick = sleep(self.game.tick_interval());
        tokio::pin!(next_tick);

        terminal
            .draw(|frame| self.renderer.render(frame, &self.game))
            .context("Failed to draw frame")?;

        loop {
            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                () = &mut next_tick => {
                    let report = self.game.tick();
                    if report.highscores_changed {
                        self.writer.submit(self.game.highscores().clone());
                    }
                    next_tick.as_mut().reset(Instant::now() + self.game.tick_interval());
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // The tick, if any, is fully applied by now.
            terminal
                .draw(|frame| self.renderer.render(frame, &self.game))
                .context("Failed to draw frame")?;
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input.handle_key_event(key) {
            Some(Command::SetDirection(snake, direction)) => {
                self.game.set_direction(snake, direction)
            }
            Some(Command::TogglePause) => self.game.toggle_pause(),
            Some(Command::Quit) => self.should_quit = true,
            None => {}
        }
    }
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Direction;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn press(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_keys_drive_the_game() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("scores.json"));
        let mut app = App::new(GameConfig::two_player().with_seed(1), store);

        app.handle_event(press('w'));
        app.handle_event(press('l'));
        app.game.tick();
        let snakes = &app.game.state().snakes;
        assert_eq!(snakes[0].direction, Direction::Up);
        assert_eq!(snakes[1].direction, Direction::Right);

        app.handle_event(press(' '));
        assert!(app.game.is_paused());

        app.handle_event(press('q'));
        assert!(app.should_quit);
        app.writer.finish().await;
    }

    #[tokio::test]
    async fn test_loads_saved_high_scores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"{"P1": 50}"#).unwrap();

        let app = App::new(GameConfig::single_player(), JsonFileStore::new(&path));
        assert_eq!(app.game.state().snakes[0].high_score, 50);
        app.writer.finish().await;
    }
}
