//! Random Move Chess Engine
//!
//! Picks uniformly among all legal moves. It never fails while a legal move
//! exists, which makes it the last line of defence whenever a real engine
//! cannot answer.

use chess_core::{legal_moves_into, Move, Position};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};


/// A chess engine that plays random legal moves.
#[derive(Debug, Clone, Default)]
pub struct RandomEngine {
    moves: Vec<Move>,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            moves: Vec::with_capacity(64),
        }
    }

    /// A uniformly random legal move, or `None` in checkmate/stalemate.
    ///
    /// Uses the thread-local generator, which is seeded from the OS.
    pub fn choose_move(&mut self, pos: &Position) -> Option<Move> {
        self.choose_move_with(pos, &mut thread_rng())
    }

    /// Same as `choose_move` with a caller-supplied generator.
    pub fn choose_move_with<R: Rng + ?Sized>(&mut self, pos: &Position, rng: &mut R) -> Option<Move> {
        let mut scratch = pos.clone();
        legal_moves_into(&mut scratch, &mut self.moves);
        self.moves.choose(rng).copied()
    }
}
