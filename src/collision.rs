//! Collision detection over a post-move snapshot of the game.
//!
//! Everything here is a pure function of the snakes and the arena. Callers
//! decide what to do with the outcomes.

use crate::arena::Arena;
use crate::config::PROXIMITY;
use crate::snake::{Snake, SnakeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// The head left the arena
    Border(SnakeId),
    /// The head touched one of its own segments
    SelfHit(SnakeId),
    /// `snake` ran its head into a segment of `other`
    Body { snake: SnakeId, other: SnakeId },
    /// Both heads met
    Head(SnakeId, SnakeId),
}

impl Collision {
    /// Snakes that have to start over because of this collision.
    pub fn casualties(&self) -> Vec<SnakeId> {
        match *self {
            Collision::Border(id) | Collision::SelfHit(id) => vec![id],
            Collision::Body { snake, .. } => vec![snake],
            Collision::Head(a, b) => vec![a, b],
        }
    }
}

pub fn hits_border(snake: &Snake, arena: &Arena) -> bool {
    !arena.contains(snake.head.position)
}

pub fn hits_self(snake: &Snake) -> bool {
    snake
        .segments
        .iter()
        .any(|seg| seg.is_near(&snake.head, PROXIMITY))
}

pub fn hits_body_of(snake: &Snake, other: &Snake) -> bool {
    other
        .segments
        .iter()
        .any(|seg| seg.is_near(&snake.head, PROXIMITY))
}

pub fn heads_meet(a: &Snake, b: &Snake) -> bool {
    a.head.is_near(&b.head, PROXIMITY)
}

pub fn reaches_food(snake: &Snake, arena: &Arena) -> bool {
    snake.head.is_near(&arena.food, PROXIMITY)
}

/// Runs the border, self, cross-body and head-to-head checks for every
/// snake, in registration order. Nothing is mutated, so the result does not
/// depend on which snake is examined first.
pub fn detect(snakes: &[Snake], arena: &Arena) -> Vec<Collision> {
    let mut found = Vec::new();

    for snake in snakes {
        if hits_border(snake, arena) {
            found.push(Collision::Border(snake.id));
        }
        if hits_self(snake) {
            found.push(Collision::SelfHit(snake.id));
        }
        if let Some(other) = snakes
            .iter()
            .find(|other| other.id != snake.id && hits_body_of(snake, other))
        {
            found.push(Collision::Body {
                snake: snake.id,
                other: other.id,
            });
        }
    }

    for (i, a) in snakes.iter().enumerate() {
        for b in &snakes[i + 1..] {
            if heads_meet(a, b) {
                found.push(Collision::Head(a.id, b.id));
            }
        }
    }

    found
}
