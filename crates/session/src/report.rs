use chess_core::GameStatus;
use external_engine::MoveSource;
use serde::Serialize;

use crate::mode::{GameMode, PuzzleResult, TurnState};

/// What a caller gets back after any session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub mode: GameMode,
    pub fen: String,
    pub status: GameStatus,
    pub state: TurnState,
    /// Every move since the start position, long algebraic.
    pub move_log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle_result: Option<PuzzleResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_move: Option<OpponentMove>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<PuzzleView>,
}

/// The automated reply played after the player's move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentMove {
    pub uci: String,
    pub san: String,
    pub source: MoveSource,
}

/// The active puzzle as shown to the player. The solution is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleView {
    pub index: usize,
    pub title: String,
    pub hint: String,
    pub solved: bool,
}
