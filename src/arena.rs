use std::collections::HashSet;

use log::{debug, warn};
use rand::Rng;

use crate::config::{GameConfig, STEP};
use crate::entity::{Coord, Entity};

/// The square playing area and the single food item all snakes compete for.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub playfield: i32,
    pub border_margin: i32,
    pub food: Entity,
    relocation_attempts: u32,
}

impl Arena {
    pub fn new(config: &GameConfig) -> Self {
        Arena {
            playfield: config.playfield,
            border_margin: config.border_margin,
            food: Entity::at(config.food_start),
            relocation_attempts: config.food_relocation_attempts,
        }
    }

    pub fn border_limit(&self) -> i32 {
        self.playfield - self.border_margin
    }

    pub fn contains(&self, pos: Coord) -> bool {
        let limit = self.border_limit();
        pos.x.abs() <= limit && pos.y.abs() <= limit
    }

    /// Lattice values available for food along one axis, inclusive.
    fn lattice_range(&self) -> (i32, i32) {
        let max = self.border_limit().div_euclid(STEP);
        (-max, max)
    }

    pub fn lattice_cells(&self) -> usize {
        let (lo, hi) = self.lattice_range();
        let side = (hi - lo + 1) as usize;
        side * side
    }

    fn sample(&self, rng: &mut impl Rng) -> Coord {
        let (lo, hi) = self.lattice_range();
        Coord::new(rng.gen_range(lo..=hi) * STEP, rng.gen_range(lo..=hi) * STEP)
    }

    /// Moves the food to a random lattice cell, resampling a bounded number
    /// of times while the cell is in `excluding`. If every attempt lands on
    /// an excluded cell the last sample is used anyway.
    pub fn relocate_food(&mut self, excluding: &HashSet<Coord>, rng: &mut impl Rng) -> Coord {
        let mut pos = self.sample(rng);
        let mut attempts = 0;
        while excluding.contains(&pos) && attempts < self.relocation_attempts {
            pos = self.sample(rng);
            attempts += 1;
        }
        if excluding.contains(&pos) {
            warn!(
                "food placed on an occupied cell ({}, {}) after {} attempts",
                pos.x, pos.y, attempts
            );
        } else {
            debug!("food relocated to ({}, {})", pos.x, pos.y);
        }
        self.food.position = pos;
        pos
    }
}
