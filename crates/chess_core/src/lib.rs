//! Chess rules: positions, FEN, legal move generation and game status.
//!
//! Positions are values. `Position::apply` checks legality and returns the
//! successor, leaving the original untouched, so callers keep history by
//! simply retaining earlier positions.

pub mod board;
pub mod error;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod status;
pub mod types;
pub mod zobrist;

pub use board::*;
pub use error::ChessError;
pub use movegen::{has_legal_move, legal_moves, legal_moves_into};
pub use notation::*;
pub use perft::{perft, perft_divide};
pub use status::*;
pub use types::*;
pub use zobrist::ZOBRIST;
