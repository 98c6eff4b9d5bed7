use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Persistent integer scores that outlive a single game.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError>;
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Scores kept as a flat JSON object on disk; a missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, u32>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(HashMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.load()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value);
        let text = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
