//! Game lifecycle around an [`Engine`]: start, pause, restart, settings and
//! the high score that survives across games.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{info, warn};

use crate::config::{validate_dimensions, GameConfig, Theme, MAX_TICK_MS};
use crate::engine::{Engine, StepOutcome, MIN_TICK_MS, SPEED_STEP_MS};
use crate::error::{ConfigError, Result};
use crate::grid::Dir;
use crate::scheduler::Ticker;
use crate::store::{ScoreStore, HIGH_SCORE_KEY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Paused,
    GameOver,
}

pub struct Session<S: ScoreStore> {
    config: GameConfig,
    engine: Engine,
    phase: Phase,
    ticker: Ticker,
    store: S,
    high_score: u32,
    final_score: Option<u32>,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(config: GameConfig, store: S, rng: &mut impl Rng) -> Result<Self> {
        let engine = Engine::new(&config, rng)?;
        let high_score = match store.get(HIGH_SCORE_KEY) {
            Ok(score) => score.unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "could not read high score, starting from zero");
                0
            }
        };
        Ok(Self {
            ticker: Ticker::new(interval(engine.tick_ms())),
            config,
            engine,
            phase: Phase::Ready,
            store,
            high_score,
            final_score: None,
        })
    }

    pub fn start(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        self.ticker.reschedule(interval(self.engine.tick_ms()), now);
        self.ticker.arm(now);
        self.set_phase(Phase::Running);
        true
    }

    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Running => {
                self.ticker.cancel();
                self.set_phase(Phase::Paused);
            }
            Phase::Paused => {
                self.ticker.reschedule(interval(self.engine.tick_ms()), now);
                self.ticker.arm(now);
                self.set_phase(Phase::Running);
            }
            Phase::Ready | Phase::GameOver => return false,
        }
        true
    }

    /// Throws the current game away and returns to `Ready`, from any phase.
    pub fn restart(&mut self, rng: &mut impl Rng) -> Result<(), ConfigError> {
        self.ticker.cancel();
        self.engine
            .reset(self.config.grid_size, self.config.initial_speed, rng)?;
        self.final_score = None;
        self.set_phase(Phase::Ready);
        Ok(())
    }

    /// Forwards a turn to the engine; input is only taken while running.
    pub fn queue_direction(&mut self, dir: Dir) -> bool {
        self.phase == Phase::Running && self.engine.queue_direction(dir)
    }

    /// Steps the game if the ticker says a tick is due.
    pub fn update(&mut self, now: Instant, rng: &mut impl Rng) -> Option<StepOutcome> {
        if self.phase != Phase::Running || !self.ticker.poll(now) {
            return None;
        }
        self.tick(now, rng)
    }

    /// Runs one step immediately, bypassing the ticker deadline.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) -> Option<StepOutcome> {
        if self.phase != Phase::Running {
            return None;
        }
        let outcome = self.engine.step(rng);
        match outcome {
            StepOutcome::Moved => {}
            StepOutcome::Ate { level_up } => {
                self.record_score();
                if level_up {
                    self.ticker.reschedule(interval(self.engine.tick_ms()), now);
                }
            }
            StepOutcome::GameOver(_) => {
                self.ticker.cancel();
                self.final_score = Some(self.engine.score());
                self.set_phase(Phase::GameOver);
            }
        }
        Some(outcome)
    }

    /// Applies a new tick interval; a running game picks it up immediately and
    /// the next restart starts from it.
    pub fn set_speed(&mut self, ms: u64, now: Instant) -> Result<(), ConfigError> {
        validate_dimensions(self.config.grid_size, ms)?;
        self.config.initial_speed = ms;
        self.engine.set_tick_ms(ms);
        self.ticker.reschedule(interval(ms), now);
        info!(tick_ms = ms, "speed changed");
        Ok(())
    }

    /// Shortens the interval by one step, never past the floor and never
    /// lengthening an interval that is already below it.
    pub fn speed_up(&mut self, now: Instant) -> Result<(), ConfigError> {
        let current = self.engine.tick_ms();
        let ms = current.saturating_sub(SPEED_STEP_MS).max(MIN_TICK_MS).min(current);
        self.set_speed(ms, now)
    }

    /// Lengthens the interval by one step, capped at `MAX_TICK_MS` unless
    /// the interval is already longer.
    pub fn slow_down(&mut self, now: Instant) -> Result<(), ConfigError> {
        let current = self.engine.tick_ms();
        let ms = (current + SPEED_STEP_MS).min(MAX_TICK_MS).max(current);
        self.set_speed(ms, now)
    }

    /// Resizes the board. The current game is discarded.
    pub fn set_grid_size(&mut self, size: usize, rng: &mut impl Rng) -> Result<(), ConfigError> {
        validate_dimensions(size, self.config.initial_speed)?;
        self.config.grid_size = size;
        self.restart(rng)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
    }

    fn record_score(&mut self) {
        let score = self.engine.score();
        if score <= self.high_score {
            return;
        }
        self.high_score = score;
        if let Err(err) = self.store.set(HIGH_SCORE_KEY, score) {
            warn!(error = %err, score, "could not persist high score");
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            info!(from = ?self.phase, to = ?phase, score = self.engine.score(), "phase change");
        }
        self.phase = phase;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.config.theme
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn interval(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
