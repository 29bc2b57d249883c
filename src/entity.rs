use serde::{Deserialize, Serialize};

use crate::config::STEP;

/// A point in arena units. The origin is the centre of the arena and `y`
/// grows upward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    pub fn offset(&self, delta: Delta) -> Coord {
        Coord {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    /// Squared euclidean distance. Kept in `i64` so the arena can never
    /// overflow it.
    pub fn distance_squared(&self, other: Coord) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// True when the two points are strictly closer than `threshold`.
    pub fn is_within(&self, other: Coord, threshold: i32) -> bool {
        let t = i64::from(threshold);
        self.distance_squared(other) < t * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    Stopped,
}

impl Direction {
    /// The reverse heading. `Stopped` has no reverse.
    pub fn opposite(&self) -> Option<Direction> {
        match self {
            Direction::Up => Some(Direction::Down),
            Direction::Down => Some(Direction::Up),
            Direction::Left => Some(Direction::Right),
            Direction::Right => Some(Direction::Left),
            Direction::Stopped => None,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == Some(other)
    }
}

impl From<Direction> for Delta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => Delta { x: 0, y: STEP },
            Direction::Down => Delta { x: 0, y: -STEP },
            Direction::Left => Delta { x: -STEP, y: 0 },
            Direction::Right => Delta { x: STEP, y: 0 },
            Direction::Stopped => Delta { x: 0, y: 0 },
        }
    }
}

/// A positioned actor: a snake head, a snake segment or the food.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Entity {
    pub position: Coord,
}

impl Entity {
    pub fn at(position: Coord) -> Self {
        Entity { position }
    }

    pub fn is_near(&self, other: &Entity, threshold: i32) -> bool {
        self.position.is_within(other.position, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert_eq!(Direction::Up.opposite(), Some(Direction::Down));
        assert_eq!(Direction::Down.opposite(), Some(Direction::Up));
        assert_eq!(Direction::Left.opposite(), Some(Direction::Right));
        assert_eq!(Direction::Right.opposite(), Some(Direction::Left));
        assert_eq!(Direction::Stopped.opposite(), None);

        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(dir.opposite().and_then(|d| d.opposite()), Some(dir));
        }
    }

    #[test]
    fn test_is_opposite() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Up));
        assert!(!Direction::Stopped.is_opposite(Direction::Down));
    }

    #[test]
    fn test_direction_deltas() {
        let origin = Coord::new(0, 0);
        assert_eq!(origin.offset(Direction::Up.into()), Coord::new(0, 20));
        assert_eq!(origin.offset(Direction::Down.into()), Coord::new(0, -20));
        assert_eq!(origin.offset(Direction::Left.into()), Coord::new(-20, 0));
        assert_eq!(origin.offset(Direction::Right.into()), Coord::new(20, 0));
        assert_eq!(origin.offset(Direction::Stopped.into()), origin);
    }

    #[test]
    fn test_proximity_is_strict() {
        let a = Coord::new(0, 0);
        assert!(a.is_within(Coord::new(0, 0), 20));
        assert!(a.is_within(Coord::new(19, 0), 20));
        assert!(!a.is_within(Coord::new(20, 0), 20));
        // 12^2 + 12^2 = 288 < 400
        assert!(a.is_within(Coord::new(12, 12), 20));
        assert!(!a.is_within(Coord::new(20, 20), 20));
    }

    #[test]
    fn test_entity_proximity() {
        let head = Entity::at(Coord::new(100, 40));
        assert!(head.is_near(&Entity::at(Coord::new(100, 40)), 20));
        assert!(!head.is_near(&Entity::at(Coord::new(120, 40)), 20));
    }
}
