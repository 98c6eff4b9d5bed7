use std::path::PathBuf;
use std::str::FromStr;

use crossterm::style::Color;

use crate::error::ConfigError;

pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 100;
pub const MIN_SPEED_MS: u64 = 1;
/// Upper bound for the in-game slow-down key.
pub const MAX_TICK_MS: u64 = 500;

pub const CLASSIC_GRID: usize = 15;
pub const CLASSIC_SPEED_MS: u64 = 150;
pub const ARENA_GRID: usize = 25;
pub const ARENA_SPEED_MS: u64 = 100;

pub const DEFAULT_RENDER_FPS: u64 = 60;
pub const DEFAULT_SCORE_FILE: &str = ".snake_scores.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Classic,
    Dark,
    Green,
    Retro,
}

impl Theme {
    pub fn snake_color(self) -> Color {
        match self {
            Theme::Classic => rgb(0x4C, 0xAF, 0x50),
            Theme::Dark => rgb(0xBB, 0x86, 0xFC),
            Theme::Green => rgb(0x00, 0xFF, 0x88),
            Theme::Retro => rgb(0xFF, 0x6B, 0x6B),
        }
    }

    pub fn apple_color(self) -> Color {
        match self {
            Theme::Classic => rgb(0xFF, 0x00, 0x00),
            Theme::Dark => rgb(0xFF, 0x52, 0x52),
            Theme::Green => rgb(0xFF, 0x40, 0x81),
            Theme::Retro => rgb(0xFF, 0x6B, 0x6B),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Dark => "dark",
            Theme::Green => "green",
            Theme::Retro => "retro",
        }
    }

    /// Cycles through the palettes, used by the in-game theme key.
    pub fn next(self) -> Theme {
        match self {
            Theme::Classic => Theme::Dark,
            Theme::Dark => Theme::Green,
            Theme::Green => Theme::Retro,
            Theme::Retro => Theme::Classic,
        }
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "default" => Ok(Theme::Classic),
            "dark" => Ok(Theme::Dark),
            "green" => Ok(Theme::Green),
            "retro" => Ok(Theme::Retro),
            _ => Err(ConfigError::UnknownTheme(s.to_string())),
        }
    }
}

/// One game variant: board size, starting tick interval and palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_size: usize,
    pub initial_speed: u64,
    pub theme: Theme,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    pub fn classic() -> Self {
        Self {
            grid_size: CLASSIC_GRID,
            initial_speed: CLASSIC_SPEED_MS,
            theme: Theme::Classic,
        }
    }

    pub fn arena() -> Self {
        Self {
            grid_size: ARENA_GRID,
            initial_speed: ARENA_SPEED_MS,
            theme: Theme::Dark,
        }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::classic()),
            "arena" => Ok(Self::arena()),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.grid_size, self.initial_speed)
    }
}

pub(crate) fn validate_dimensions(grid_size: usize, speed: u64) -> Result<(), ConfigError> {
    if grid_size < MIN_GRID_SIZE {
        return Err(ConfigError::GridTooSmall {
            size: grid_size,
            min: MIN_GRID_SIZE,
        });
    }
    if grid_size > MAX_GRID_SIZE {
        return Err(ConfigError::GridTooLarge {
            size: grid_size,
            max: MAX_GRID_SIZE,
        });
    }
    if speed < MIN_SPEED_MS {
        return Err(ConfigError::SpeedTooLow {
            ms: speed,
            min: MIN_SPEED_MS,
        });
    }
    Ok(())
}

/// Everything the terminal binary needs besides the game itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub game: GameConfig,
    pub render_fps: u64,
    pub score_file: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from a key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut game = match lookup("SNAKE_PRESET") {
            Some(name) => GameConfig::preset(&name)?,
            None => GameConfig::classic(),
        };
        if let Some(v) = lookup("SNAKE_GRID") {
            let size = parse_positive("SNAKE_GRID", &v)?;
            game.grid_size = usize::try_from(size).unwrap_or(usize::MAX);
        }
        if let Some(v) = lookup("SNAKE_SPEED") {
            game.initial_speed = parse_positive("SNAKE_SPEED", &v)?;
        }
        if let Some(v) = lookup("SNAKE_THEME") {
            game.theme = v.parse()?;
        }
        game.validate()?;

        let render_fps = match lookup("SNAKE_FPS") {
            Some(v) => parse_positive("SNAKE_FPS", &v)?,
            None => DEFAULT_RENDER_FPS,
        };
        let score_file = lookup("SNAKE_SCORE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORE_FILE));
        let log_file = lookup("SNAKE_LOG").map(PathBuf::from);

        Ok(Self {
            game,
            render_fps,
            score_file,
            log_file,
        })
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ConfigError::NotANumber {
            var,
            value: value.to_string(),
        })
}
