use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who answers the player's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// The external engine (or its fallback) replies to every move.
    Bot,
    /// The player must find each puzzle's solution; there is no reply.
    Puzzle,
    /// Both sides move through the same session.
    LocalTwoPlayer,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Bot => "bot",
            GameMode::Puzzle => "puzzle",
            GameMode::LocalTwoPlayer => "local",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bot" | "engine" => Ok(GameMode::Bot),
            "puzzle" => Ok(GameMode::Puzzle),
            "local" | "two-player" | "2p" => Ok(GameMode::LocalTwoPlayer),
            other => Err(format!("unknown mode '{other}' (expected bot, puzzle or local)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    AwaitingPlayerMove,
    AwaitingOpponentMove,
    GameOver,
}

/// Verdict on a move made against an unsolved puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleResult {
    CorrectSolution,
    WrongSolution,
}
