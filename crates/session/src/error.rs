use std::path::PathBuf;

use chess_core::ChessError;
use external_engine::InvalidDifficulty;
use thiserror::Error;

use crate::manager::SessionId;

/// Why a session request was rejected. The session is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no session with id {0}")]
    UnknownSession(SessionId),
    #[error("difficulty {0} is outside 1..=10")]
    InvalidDifficulty(u8),
    #[error("invalid notation: {0}")]
    InvalidNotation(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("promotion piece required for {0}")]
    AmbiguousPromotion(String),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("the game is over")]
    GameOver,
    #[error("waiting for the opponent's move")]
    NotPlayerTurn,
    #[error("position is not one of the puzzles")]
    UnknownPuzzle,
    #[error("turn cancelled")]
    Cancelled,
}

impl From<ChessError> for SessionError {
    fn from(err: ChessError) -> Self {
        match err {
            ChessError::InvalidNotation(s) => SessionError::InvalidNotation(s),
            ChessError::IllegalMove(s) => SessionError::IllegalMove(s),
            ChessError::AmbiguousPromotion(s) => SessionError::AmbiguousPromotion(s),
        }
    }
}

impl From<InvalidDifficulty> for SessionError {
    fn from(err: InvalidDifficulty) -> Self {
        SessionError::InvalidDifficulty(err.0)
    }
}

/// Failure to load the application config or a puzzle file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("puzzle {index} ({title}): {reason}")]
    InvalidPuzzle {
        index: usize,
        title: String,
        reason: String,
    },
}
