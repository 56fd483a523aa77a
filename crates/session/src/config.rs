use std::path::{Path, PathBuf};

use external_engine::{Difficulty, EngineConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::puzzle::PuzzleSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Positions kept for undo per session; older ones are forgotten.
    pub undo_limit: usize,
    /// Difficulty used when a new session does not name one.
    pub default_difficulty: Difficulty,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            undo_limit: 512,
            default_difficulty: Difficulty::default(),
        }
    }
}

/// Everything read from the config file. Missing sections take their defaults.
///
/// ```toml
/// puzzles = "puzzles.toml"
///
/// [engine]
/// command = "stockfish"
/// base_move_time_ms = 150
///
/// [session]
/// undo_limit = 256
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub session: SessionConfig,
    /// Puzzle file replacing the built-in set. Relative to the config file.
    pub puzzles: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let (Some(puzzles), Some(dir)) = (&config.puzzles, path.parent()) {
            if puzzles.is_relative() {
                config.puzzles = Some(dir.join(puzzles));
            }
        }
        Ok(config)
    }

    /// The configured puzzle file, or the built-in set.
    pub fn puzzle_set(&self) -> Result<PuzzleSet, ConfigError> {
        match &self.puzzles {
            Some(path) => PuzzleSet::load(path),
            None => Ok(PuzzleSet::builtin()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
