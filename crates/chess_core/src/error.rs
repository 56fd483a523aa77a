use thiserror::Error;

/// Rejections produced by the rules engine. None of them change any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// Malformed move or position text.
    #[error("invalid notation: {0}")]
    InvalidNotation(String),
    /// Well-formed move that is not legal in the position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// A pawn reaches the last rank but no promotion piece was given.
    #[error("promotion piece required for {0}")]
    AmbiguousPromotion(String),
}
