use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::arena::Arena;
use crate::collision::{self, Collision};
use crate::config::{GameConfig, PROXIMITY};
use crate::entity::{Coord, Direction};
use crate::highscore::HighScores;
use crate::snake::{Snake, SnakeId};

/// Everything the simulation owns. Only [`GameLoop::tick`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub arena: Arena,
    pub snakes: Vec<Snake>,
    pub tick_interval: Duration,
    pub tick_count: u64,
}

impl GameState {
    /// Every cell covered by a head or a segment.
    pub fn occupied(&self) -> HashSet<Coord> {
        self.snakes.iter().flat_map(|s| s.occupied()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    FoodEaten { snake: SnakeId, score: u32 },
    NewHighScore { snake: SnakeId, high_score: u32 },
    Collision(Collision),
    IntervalChanged(Duration),
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// The persisted high score mapping needs writing
    pub highscores_changed: bool,
}

impl TickReport {
    pub fn collisions(&self) -> impl Iterator<Item = &Collision> {
        self.events.iter().filter_map(|e| match e {
            GameEvent::Collision(c) => Some(c),
            _ => None,
        })
    }
}

/// Drives the simulation one discrete step at a time. Scheduling the steps
/// is up to the caller.
pub struct GameLoop {
    config: GameConfig,
    state: GameState,
    highscores: HighScores,
    /// Latest direction request per snake, consumed at the next tick
    intents: Vec<Option<Direction>>,
    paused: bool,
    rng: StdRng,
}

impl GameLoop {
    pub fn new(config: GameConfig, highscores: HighScores) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let snakes: Vec<Snake> = config
            .players
            .iter()
            .enumerate()
            .map(|(id, player)| {
                let saved = highscores.get(&player.name).copied().unwrap_or(0);
                Snake::new(id, player).with_high_score(saved)
            })
            .collect();

        let state = GameState {
            arena: Arena::new(&config),
            snakes,
            tick_interval: config.initial_interval(),
            tick_count: 0,
        };

        GameLoop {
            intents: vec![None; state.snakes.len()],
            config,
            state,
            highscores,
            paused: false,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("game {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Records a direction request. Later requests before the next tick
    /// replace earlier ones.
    pub fn set_direction(&mut self, snake: SnakeId, direction: Direction) {
        if let Some(slot) = self.intents.get_mut(snake) {
            *slot = Some(direction);
        }
    }

    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.paused {
            return report;
        }
        self.state.tick_count += 1;

        for (snake, intent) in self.state.snakes.iter_mut().zip(self.intents.iter_mut()) {
            if let Some(direction) = intent.take() {
                snake.set_direction(direction);
            }
        }

        self.food_pass(&mut report);

        for snake in &mut self.state.snakes {
            snake.move_forward();
        }

        self.collision_pass(&mut report);
        report
    }

    /// A snake eats when its head, where it stands or where it is about to
    /// step, is within reach of the food.
    fn food_pass(&mut self, report: &mut TickReport) {
        for i in 0..self.state.snakes.len() {
            let arena = &self.state.arena;
            let snake = &self.state.snakes[i];
            let food = arena.food.position;
            if !collision::reaches_food(snake, arena)
                && !snake.next_head().is_within(food, PROXIMITY)
            {
                continue;
            }

            let mut excluding = self.state.occupied();
            excluding.extend(self.state.snakes.iter().map(|s| s.next_head()));
            excluding.insert(food);
            self.state.arena.relocate_food(&excluding, &mut self.rng);

            let snake = &mut self.state.snakes[i];
            let new_high = snake.apply_food_pickup();
            debug!("{} ate food, score {}", snake.name, snake.score);
            report.events.push(GameEvent::FoodEaten {
                snake: snake.id,
                score: snake.score,
            });
            if new_high {
                info!("{} set a new high score of {}", snake.name, snake.high_score);
                self.highscores.insert(snake.name.clone(), snake.high_score);
                report.highscores_changed = true;
                report.events.push(GameEvent::NewHighScore {
                    snake: snake.id,
                    high_score: snake.high_score,
                });
            }

            let faster = self
                .state
                .tick_interval
                .saturating_sub(self.config.interval_decrement())
                .max(self.config.min_interval());
            self.set_interval(faster, report);
        }
    }

    /// Resets are collected first and applied afterwards so that every
    /// snake is judged against the same post-move state.
    fn collision_pass(&mut self, report: &mut TickReport) {
        let collisions = collision::detect(&self.state.snakes, &self.state.arena);
        if collisions.is_empty() {
            return;
        }

        let casualties: BTreeSet<SnakeId> =
            collisions.iter().flat_map(|c| c.casualties()).collect();
        for id in casualties {
            if let Some(snake) = self.state.snakes.get_mut(id) {
                info!("{} crashed with score {}", snake.name, snake.score);
                snake.reset();
            }
        }
        report
            .events
            .extend(collisions.into_iter().map(GameEvent::Collision));

        if self.config.reset_interval_on_collision {
            self.set_interval(self.config.initial_interval(), report);
        }
    }

    fn set_interval(&mut self, interval: Duration, report: &mut TickReport) {
        if interval != self.state.tick_interval {
            debug!("tick interval now {:?}", interval);
            self.state.tick_interval = interval;
            report.events.push(GameEvent::IntervalChanged(interval));
        }
    }
}
