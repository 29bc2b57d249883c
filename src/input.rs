use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::entity::Direction;
use crate::snake::SnakeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetDirection(SnakeId, Direction),
    TogglePause,
    Quit,
}

/// Translates key presses into game commands.
///
/// Player one steers with `w a s d`, player two with `i j k l`. With a single
/// player the arrow keys steer player one as well.
pub struct InputHandler {
    players: usize,
}

impl InputHandler {
    pub fn new(players: usize) -> Self {
        Self { players }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let steer = |snake: SnakeId, dir: Direction| {
            (snake < self.players).then_some(Command::SetDirection(snake, dir))
        };

        match key.code {
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => steer(0, Direction::Up),
                's' => steer(0, Direction::Down),
                'a' => steer(0, Direction::Left),
                'd' => steer(0, Direction::Right),
                'i' => steer(1, Direction::Up),
                'k' => steer(1, Direction::Down),
                'j' => steer(1, Direction::Left),
                'l' => steer(1, Direction::Right),
                ' ' | 'p' => Some(Command::TogglePause),
                'q' => Some(Command::Quit),
                _ => None,
            },
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Up if self.players == 1 => steer(0, Direction::Up),
            KeyCode::Down if self.players == 1 => steer(0, Direction::Down),
            KeyCode::Left if self.players == 1 => steer(0, Direction::Left),
            KeyCode::Right if self.players == 1 => steer(0, Direction::Right),
            _ => None,
        }
    }
}
