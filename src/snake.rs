use crate::config::PlayerConfig;
use crate::entity::{Coord, Direction, Entity};

/// Points awarded per food; also the score cost of one segment.
pub const FOOD_SCORE: u32 = 10;

/// Index of a snake in registration order.
pub type SnakeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub id: SnakeId,
    pub name: String,
    pub head: Entity,
    /// Closest to the head first
    pub segments: Vec<Entity>,
    pub direction: Direction,
    pub score: u32,
    pub high_score: u32,
    pub start: Coord,
    pub color: (u8, u8, u8),
}

impl Snake {
    pub fn new(id: SnakeId, player: &PlayerConfig) -> Self {
        Snake {
            id,
            name: player.name.clone(),
            head: Entity::at(player.start),
            segments: Vec::new(),
            direction: Direction::Stopped,
            score: 0,
            high_score: 0,
            start: player.start,
            color: player.color,
        }
    }

    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score.max(self.score);
        self
    }

    /// Ignores requests that would turn the snake back onto itself.
    pub fn set_direction(&mut self, requested: Direction) {
        if !self.direction.is_opposite(requested) {
            self.direction = requested;
        }
    }

    /// Every segment takes the place of the one in front of it, the first
    /// segment takes the old head position, then the head advances one step.
    pub fn move_forward(&mut self) {
        for i in (1..self.segments.len()).rev() {
            self.segments[i].position = self.segments[i - 1].position;
        }
        if let Some(first) = self.segments.first_mut() {
            first.position = self.head.position;
        }
        self.head.position = self.head.position.offset(self.direction.into());
    }

    /// Appends a segment on top of the current tail. It falls into line on
    /// the next move.
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.segments.push(Entity::at(tail));
    }

    pub fn tail(&self) -> Coord {
        self.segments
            .last()
            .map_or(self.head.position, |s| s.position)
    }

    pub fn reset(&mut self) {
        self.head.position = self.start;
        self.direction = Direction::Stopped;
        self.segments.clear();
        self.score = 0;
    }

    /// Returns true when the pickup set a new high score.
    pub fn apply_food_pickup(&mut self) -> bool {
        self.grow();
        self.score += FOOD_SCORE;
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Where the head will be after the next move.
    pub fn next_head(&self) -> Coord {
        self.head.position.offset(self.direction.into())
    }

    /// Head first, then segments.
    pub fn occupied(&self) -> impl Iterator<Item = Coord> + '_ {
        std::iter::once(self.head.position).chain(self.segments.iter().map(|s| s.position))
    }

    pub fn is_at_start(&self) -> bool {
        self.head.position == self.start
            && self.direction == Direction::Stopped
            && self.segments.is_empty()
            && self.score == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_at(x: i32, y: i32) -> Snake {
        Snake::new(0, &PlayerConfig::new("P1", Coord::new(x, y), (0, 0, 0)))
    }

    fn snake_with_segments(n: usize) -> Snake {
        let mut snake = snake_at(0, 0);
        snake.set_direction(Direction::Right);
        for _ in 0..n {
            snake.apply_food_pickup();
            snake.move_forward();
        }
        snake
    }

    #[test]
    fn test_new_snake() {
        let snake = snake_at(-100, 0);
        assert_eq!(snake.head.position, Coord::new(-100, 0));
        assert_eq!(snake.direction, Direction::Stopped);
        assert!(snake.segments.is_empty());
        assert_eq!(snake.score, 0);
        assert!(snake.is_at_start());
    }

    #[test]
    fn test_stopped_accepts_any_direction() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let mut snake = snake_at(0, 0);
            snake.set_direction(dir);
            assert_eq!(snake.direction, dir);
        }
    }

    #[test]
    fn test_reversal_is_rejected() {
        let pairs = [
            (Direction::Up, Direction::Down),
            (Direction::Down, Direction::Up),
            (Direction::Left, Direction::Right),
            (Direction::Right, Direction::Left),
        ];
        for (current, reverse) in pairs {
            let mut snake = snake_at(0, 0);
            snake.set_direction(current);
            snake.set_direction(reverse);
            assert_eq!(snake.direction, current);
        }
    }

    #[test]
    fn test_turn_is_accepted() {
        let mut snake = snake_at(0, 0);
        snake.set_direction(Direction::Up);
        snake.set_direction(Direction::Left);
        assert_eq!(snake.direction, Direction::Left);
        snake.set_direction(Direction::Left);
        assert_eq!(snake.direction, Direction::Left);
    }

    #[test]
    fn test_stopped_does_not_move() {
        let mut snake = snake_at(40, 60);
        snake.move_forward();
        assert_eq!(snake.head.position, Coord::new(40, 60));
    }

    #[test]
    fn test_head_moves_one_step() {
        let mut snake = snake_at(0, 0);
        snake.set_direction(Direction::Up);
        snake.move_forward();
        assert_eq!(snake.head.position, Coord::new(0, 20));
        snake.set_direction(Direction::Left);
        snake.move_forward();
        assert_eq!(snake.head.position, Coord::new(-20, 20));
    }

    #[test]
    fn test_first_segment_lags_head() {
        for n in 1..8 {
            let mut snake = snake_with_segments(n);
            let before = snake.head.position;
            snake.move_forward();
            assert_eq!(snake.segments[0].position, before, "with {} segments", n);
        }
    }

    #[test]
    fn test_segments_follow_chain() {
        let mut snake = snake_with_segments(3);
        let before: Vec<Coord> = snake.occupied().collect();
        snake.set_direction(Direction::Up);
        snake.move_forward();

        assert_eq!(snake.head.position, before[0].offset(Direction::Up.into()));
        for i in 0..snake.segments.len() {
            assert_eq!(snake.segments[i].position, before[i]);
        }
    }

    #[test]
    fn test_grow_appends_on_tail() {
        let mut snake = snake_at(0, 0);
        snake.grow();
        assert_eq!(snake.segments.len(), 1);
        assert_eq!(snake.segments[0].position, Coord::new(0, 0));

        let mut snake = snake_with_segments(2);
        let tail = snake.tail();
        snake.grow();
        assert_eq!(snake.segments.len(), 3);
        assert_eq!(snake.segments[2].position, tail);
    }

    #[test]
    fn test_food_pickup_updates_score_and_high() {
        let mut snake = snake_at(0, 0).with_high_score(20);

        assert!(!snake.apply_food_pickup());
        assert_eq!(snake.score, 10);
        assert_eq!(snake.high_score, 20);

        assert!(!snake.apply_food_pickup());
        assert!(snake.apply_food_pickup());
        assert_eq!(snake.score, 30);
        assert_eq!(snake.high_score, 30);
        assert_eq!(snake.segments.len() as u32, snake.score / FOOD_SCORE);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut snake = snake_with_segments(4);
        assert_eq!(snake.high_score, 40);
        snake.reset();
        assert!(snake.is_at_start());
        assert_eq!(snake.high_score, 40);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = snake_with_segments(3);
        once.reset();
        let mut twice = once.clone();
        twice.reset();
        assert_eq!(once, twice);
    }
}
