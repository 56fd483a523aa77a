//! Terminal-state detection.

use serde::Serialize;

use crate::{board::Position, movegen::has_legal_move};

/// Outcome classification of a position, seen from the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    DrawFiftyMove,
    DrawInsufficientMaterial,
    DrawThreefoldRepetition,
}

impl GameStatus {
    /// True once the game cannot continue.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }

    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawFiftyMove
                | GameStatus::DrawInsufficientMaterial
                | GameStatus::DrawThreefoldRepetition
        )
    }
}

/// Classify `pos`.
///
/// `history` holds the `position_hash` of every position of the game so far,
/// the current one included; it is only consulted for threefold repetition.
pub fn game_status(pos: &Position, history: &[u64]) -> GameStatus {
    let in_check = pos.in_check(pos.side_to_move);
    if !has_legal_move(pos) {
        return if in_check {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
    }
    if pos.is_fifty_move_draw() {
        return GameStatus::DrawFiftyMove;
    }
    if is_threefold_repetition(pos, history) {
        return GameStatus::DrawThreefoldRepetition;
    }
    if pos.is_insufficient_material() {
        return GameStatus::DrawInsufficientMaterial;
    }
    if in_check {
        GameStatus::Check
    } else {
        GameStatus::Ongoing
    }
}

/// The current position has occurred at least three times.
pub fn is_threefold_repetition(pos: &Position, history: &[u64]) -> bool {
    let current = pos.position_hash();
    history.iter().filter(|&&h| h == current).count() >= 3
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
