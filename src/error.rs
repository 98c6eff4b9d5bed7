use std::io;

use thiserror::Error;

/// Rejected game settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size {size} is below the playable minimum of {min}")]
    GridTooSmall { size: usize, min: usize },
    #[error("grid size {size} is above the maximum of {max}")]
    GridTooLarge { size: usize, max: usize },
    #[error("tick interval must be at least {min} ms, got {ms}")]
    SpeedTooLow { ms: u64, min: u64 },
    #[error("unknown theme `{0}` (expected classic, dark, green or retro)")]
    UnknownTheme(String),
    #[error("unknown preset `{0}` (expected classic or arena)")]
    UnknownPreset(String),
    #[error("invalid board layout: {0}")]
    InvalidLayout(&'static str),
    #[error("{var} must be a positive integer, got `{value}`")]
    NotANumber { var: &'static str, value: String },
}

/// Failures reading or writing the high-score store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("score store is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
