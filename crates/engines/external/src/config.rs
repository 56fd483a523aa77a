//! Engine settings and the difficulty-to-search-limit mapping.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

const DEFAULT_ENGINE: &str = "stockfish";
const DEFAULT_ENGINE_PATH: &str = "/usr/games/stockfish";

/// How to run the external engine and how hard to let it think.
///
/// Thinking time grows linearly: `move_time = base_move_time_ms * difficulty`.
/// The caller-side deadline adds `startup_grace_ms` on top, covering process
/// start and the UCI handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When false the adapter never spawns anything and always falls back.
    pub enabled: bool,
    /// Executable name or path. `None` looks for stockfish.
    pub command: Option<PathBuf>,
    /// Extra arguments for the executable.
    pub args: Vec<String>,
    /// Name of the UCI spin option receiving the 0-20 strength.
    pub skill_option: String,
    pub base_move_time_ms: u64,
    /// Optional `go depth` of `depth_per_level * difficulty`.
    pub depth_per_level: Option<u8>,
    pub startup_grace_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            args: Vec::new(),
            skill_option: "Skill Level".to_string(),
            base_move_time_ms: 100,
            depth_per_level: None,
            startup_grace_ms: 2000,
        }
    }
}

/// Concrete limits for one engine request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub skill_level: u8,
    pub move_time: Duration,
    pub depth: Option<u8>,
    /// Wall-clock budget enforced by the adapter, whatever the engine does.
    pub hard_timeout: Duration,
}

impl SearchLimits {
    /// The UCI `go` command for these limits.
    pub fn go_command(&self) -> String {
        let mut cmd = format!("go movetime {}", self.move_time.as_millis());
        if let Some(depth) = self.depth {
            cmd.push_str(&format!(" depth {depth}"));
        }
        cmd
    }
}

impl EngineConfig {
    pub fn move_time(&self, difficulty: Difficulty) -> Duration {
        Duration::from_millis(self.base_move_time_ms * u64::from(difficulty.get()))
    }

    pub fn limits(&self, difficulty: Difficulty) -> SearchLimits {
        let move_time = self.move_time(difficulty);
        SearchLimits {
            skill_level: difficulty.skill_level(),
            move_time,
            depth: self
                .depth_per_level
                .map(|per| per.saturating_mul(difficulty.get())),
            hard_timeout: move_time + Duration::from_millis(self.startup_grace_ms),
        }
    }

    /// The executable to launch, if one can be found.
    ///
    /// Bare names are looked up on `PATH`; paths are taken as given.
    pub fn resolve_command(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        match &self.command {
            Some(cmd) if cmd.components().count() > 1 => Some(cmd.clone()),
            Some(cmd) => find_on_path(cmd),
            None => find_on_path(Path::new(DEFAULT_ENGINE)).or_else(|| {
                let fallback = PathBuf::from(DEFAULT_ENGINE_PATH);
                fallback.is_file().then_some(fallback)
            }),
        }
    }
}

fn find_on_path(name: &Path) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
