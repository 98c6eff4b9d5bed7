//! Single-grid snake game: a deterministic simulation engine plus the
//! scheduler, score store, input and terminal rendering around it.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod store;

pub use config::{GameConfig, Settings, Theme};
pub use engine::{Collision, Engine, StepOutcome};
pub use error::{ConfigError, Error, Result, StoreError};
pub use grid::{Dir, Pos};
pub use session::{Phase, Session};
pub use store::{FileStore, MemoryStore, ScoreStore, HIGH_SCORE_KEY};
