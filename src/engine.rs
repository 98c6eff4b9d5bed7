//! Grid simulation: snake body, food, direction, score and level, advanced one
//! tick at a time by [`Engine::step`].

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{validate_dimensions, GameConfig};
use crate::error::ConfigError;
use crate::grid::{self, Dir, Pos};

pub const START_LENGTH: usize = 3;
pub const FOOD_POINTS: u32 = 10;
pub const LEVEL_SCORE_STEP: u32 = 80;
pub const SPEED_STEP_MS: u64 = 10;
pub const MIN_TICK_MS: u64 = 50;
pub const MAX_FOOD_ATTEMPTS: u32 = 100;

const START_HEAD_X: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfHit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate { level_up: bool },
    GameOver(Collision),
}

impl StepOutcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, StepOutcome::GameOver(_))
    }
}

#[derive(Clone, Debug)]
pub struct Engine {
    grid_size: usize,
    snake: VecDeque<Pos>,
    food: Pos,
    dir: Dir,
    pending: Dir,
    score: u32,
    level: u32,
    tick_ms: u64,
    over: Option<Collision>,
}

impl Engine {
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Engine {
            grid_size: config.grid_size,
            snake: VecDeque::new(),
            food: Pos::new(0, 0),
            dir: Dir::Right,
            pending: Dir::Right,
            score: 0,
            level: 1,
            tick_ms: config.initial_speed,
            over: None,
        };
        engine.reset(config.grid_size, config.initial_speed, rng)?;
        Ok(engine)
    }

    /// Builds an engine mid-game from an explicit body (head first) and food cell.
    /// Score and level start fresh; `dir` becomes both the current and pending direction.
    pub fn with_layout(
        grid_size: usize,
        snake: Vec<Pos>,
        dir: Dir,
        food: Pos,
        tick_ms: u64,
    ) -> Result<Self, ConfigError> {
        validate_dimensions(grid_size, tick_ms)?;
        if snake.is_empty() {
            return Err(ConfigError::InvalidLayout("snake has no segments"));
        }
        let inside = |p: &Pos| p.x < grid_size && p.y < grid_size;
        if !snake.iter().all(inside) || !inside(&food) {
            return Err(ConfigError::InvalidLayout("cell outside the grid"));
        }
        for (i, seg) in snake.iter().enumerate() {
            if snake[i + 1..].contains(seg) {
                return Err(ConfigError::InvalidLayout("snake overlaps itself"));
            }
        }
        Ok(Engine {
            grid_size,
            snake: snake.into(),
            food,
            dir,
            pending: dir,
            score: 0,
            level: 1,
            tick_ms,
            over: None,
        })
    }

    /// Starts a fresh game: three segments heading right near the left-centre.
    pub fn reset(
        &mut self,
        grid_size: usize,
        initial_speed: u64,
        rng: &mut impl Rng,
    ) -> Result<(), ConfigError> {
        validate_dimensions(grid_size, initial_speed)?;
        let head_x = START_HEAD_X.min(grid_size - 1);
        let y = grid_size / 2;
        self.grid_size = grid_size;
        self.snake = (0..START_LENGTH).map(|i| Pos::new(head_x - i, y)).collect();
        self.dir = Dir::Right;
        self.pending = Dir::Right;
        self.score = 0;
        self.level = 1;
        self.tick_ms = initial_speed;
        self.over = None;
        self.place_food(rng);
        Ok(())
    }

    /// Records the direction for the next tick. Reversing straight back into
    /// the neck is ignored; returns whether the request was accepted.
    pub fn queue_direction(&mut self, requested: Dir) -> bool {
        if requested == self.dir.opposite() {
            return false;
        }
        self.pending = requested;
        true
    }

    pub fn step(&mut self, rng: &mut impl Rng) -> StepOutcome {
        if let Some(hit) = self.over {
            return StepOutcome::GameOver(hit);
        }
        self.dir = self.pending;

        let head = self.head();
        let Some(next) = grid::step(head, self.dir, self.grid_size) else {
            return self.finish(Collision::Wall);
        };
        // The tail cell still counts as occupied here even though it would
        // move away this tick.
        if self.snake.contains(&next) {
            return self.finish(Collision::SelfHit);
        }

        self.snake.push_front(next);

        if next != self.food {
            self.snake.pop_back();
            return StepOutcome::Moved;
        }

        self.score += FOOD_POINTS * self.level;
        let level_up = self.score >= self.level * LEVEL_SCORE_STEP;
        if level_up {
            self.level += 1;
            // Intervals already at or under the floor are left alone.
            if self.tick_ms > MIN_TICK_MS {
                self.tick_ms = (self.tick_ms - SPEED_STEP_MS).max(MIN_TICK_MS);
            }
            info!(level = self.level, tick_ms = self.tick_ms, "level up");
        }
        self.place_food(rng);
        StepOutcome::Ate { level_up }
    }

    /// Picks a free cell for the food: random tries first, then a row-major scan.
    /// With every cell occupied the last random pick is kept.
    pub fn place_food(&mut self, rng: &mut impl Rng) -> Pos {
        let mut candidate = self.food;
        for _ in 0..MAX_FOOD_ATTEMPTS {
            candidate = Pos::new(
                rng.gen_range(0..self.grid_size),
                rng.gen_range(0..self.grid_size),
            );
            if !self.snake.contains(&candidate) {
                self.food = candidate;
                return candidate;
            }
        }

        debug!(length = self.snake.len(), "random food placement exhausted, scanning");
        match self.first_free_cell() {
            Some(pos) => self.food = pos,
            None => {
                warn!(length = self.snake.len(), "no free cell left for food");
                self.food = candidate;
            }
        }
        self.food
    }

    fn first_free_cell(&self) -> Option<Pos> {
        (0..self.grid_size)
            .flat_map(|y| (0..self.grid_size).map(move |x| Pos::new(x, y)))
            .find(|p| !self.snake.contains(p))
    }

    fn finish(&mut self, hit: Collision) -> StepOutcome {
        self.over = Some(hit);
        info!(
            collision = ?hit,
            score = self.score,
            length = self.snake.len(),
            "game over"
        );
        StepOutcome::GameOver(hit)
    }

    pub fn head(&self) -> Pos {
        self.snake[0]
    }

    pub fn snake(&self) -> &VecDeque<Pos> {
        &self.snake
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    pub fn direction(&self) -> Dir {
        self.dir
    }

    pub fn pending_direction(&self) -> Dir {
        self.pending
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    /// Overrides the current tick interval, e.g. from a speed setting.
    pub fn set_tick_ms(&mut self, ms: u64) {
        self.tick_ms = ms.max(1);
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn is_over(&self) -> bool {
        self.over.is_some()
    }

    pub fn collision(&self) -> Option<Collision> {
        self.over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn body(cells: &[(usize, usize)]) -> Vec<Pos> {
        cells.iter().map(|&(x, y)| Pos::new(x, y)).collect()
    }

    #[test]
    fn reset_places_three_segments_heading_right() {
        let engine = Engine::new(&GameConfig::classic(), &mut rng()).unwrap();
        assert_eq!(
            engine.snake().iter().copied().collect::<Vec<_>>(),
            body(&[(5, 7), (4, 7), (3, 7)])
        );
        assert_eq!(engine.direction(), Dir::Right);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.tick_ms(), 150);
        assert!(!engine.snake().contains(&engine.food()));
    }

    #[test]
    fn reset_fits_the_smallest_grid() {
        let mut engine = Engine::new(&GameConfig::classic(), &mut rng()).unwrap();
        engine.reset(3, 100, &mut rng()).unwrap();
        assert_eq!(
            engine.snake().iter().copied().collect::<Vec<_>>(),
            body(&[(2, 1), (1, 1), (0, 1)])
        );
        assert!(!engine.snake().contains(&engine.food()));
    }

    #[test]
    fn reset_rejects_unplayable_grid() {
        let mut engine = Engine::new(&GameConfig::classic(), &mut rng()).unwrap();
        assert_eq!(
            engine.reset(2, 150, &mut rng()),
            Err(ConfigError::GridTooSmall { size: 2, min: 3 })
        );
        assert_eq!(engine.grid_size(), 15);
    }

    #[test]
    fn reversal_is_ignored() {
        let mut engine = Engine::new(&GameConfig::classic(), &mut rng()).unwrap();
        assert!(!engine.queue_direction(Dir::Left));
        assert_eq!(engine.pending_direction(), Dir::Right);
        assert!(engine.queue_direction(Dir::Up));
        assert_eq!(engine.pending_direction(), Dir::Up);
        // Still moving right this tick, so left stays forbidden.
        assert!(!engine.queue_direction(Dir::Left));
        assert_eq!(engine.pending_direction(), Dir::Up);
    }

    #[test]
    fn level_up_speeds_up_down_to_floor() {
        let snake = body(&[(1, 0), (0, 0)]);
        let mut engine = Engine::with_layout(10, snake, Dir::Right, Pos::new(2, 0), 55).unwrap();
        engine.score = 70;
        let outcome = engine.step(&mut rng());
        assert_eq!(outcome, StepOutcome::Ate { level_up: true });
        assert_eq!(engine.score(), 80);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.tick_ms(), MIN_TICK_MS);
    }

    #[test]
    fn level_up_never_slows_a_sub_floor_interval() {
        let snake = body(&[(1, 0), (0, 0)]);
        let mut engine = Engine::with_layout(10, snake, Dir::Right, Pos::new(2, 0), 20).unwrap();
        engine.score = 70;
        assert_eq!(engine.step(&mut rng()), StepOutcome::Ate { level_up: true });
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.tick_ms(), 20);
    }

    #[test]
    fn full_board_keeps_an_occupied_food_cell() {
        let snake = body(&[
            (0, 2),
            (0, 1),
            (0, 0),
            (1, 0),
            (2, 0),
            (2, 1),
            (1, 1),
            (1, 2),
            (2, 2),
        ]);
        let mut engine = Engine::with_layout(3, snake, Dir::Down, Pos::new(2, 2), 100).unwrap();
        for seed in 0..5 {
            let pos = engine.place_food(&mut StdRng::seed_from_u64(seed));
            assert!(engine.snake().contains(&pos));
            assert_eq!(engine.food(), pos);
        }
    }

    #[test]
    fn food_falls_back_to_the_single_free_cell() {
        // 3x3 board, snake covers everything but (2, 2).
        let snake = body(&[
            (0, 2),
            (0, 1),
            (0, 0),
            (1, 0),
            (2, 0),
            (2, 1),
            (1, 1),
            (1, 2),
        ]);
        let mut engine = Engine::with_layout(3, snake, Dir::Down, Pos::new(2, 2), 100).unwrap();
        for seed in 0..20 {
            let pos = engine.place_food(&mut StdRng::seed_from_u64(seed));
            assert_eq!(pos, Pos::new(2, 2));
        }
    }

    #[test]
    fn terminal_state_is_sticky() {
        let snake = body(&[(0, 1), (1, 1), (2, 1)]);
        let mut engine = Engine::with_layout(5, snake.clone(), Dir::Left, Pos::new(4, 4), 100).unwrap();
        assert_eq!(engine.step(&mut rng()), StepOutcome::GameOver(Collision::Wall));
        engine.queue_direction(Dir::Up);
        assert_eq!(engine.step(&mut rng()), StepOutcome::GameOver(Collision::Wall));
        assert_eq!(engine.snake().iter().copied().collect::<Vec<_>>(), snake);
        assert_eq!(engine.collision(), Some(Collision::Wall));
    }

    #[test]
    fn layout_must_be_consistent() {
        assert_eq!(
            Engine::with_layout(5, vec![], Dir::Up, Pos::new(0, 0), 100).unwrap_err(),
            ConfigError::InvalidLayout("snake has no segments")
        );
        assert_eq!(
            Engine::with_layout(5, body(&[(5, 0)]), Dir::Up, Pos::new(0, 0), 100).unwrap_err(),
            ConfigError::InvalidLayout("cell outside the grid")
        );
        assert_eq!(
            Engine::with_layout(5, body(&[(1, 1), (1, 1)]), Dir::Up, Pos::new(0, 0), 100)
                .unwrap_err(),
            ConfigError::InvalidLayout("snake overlaps itself")
        );
    }
}
