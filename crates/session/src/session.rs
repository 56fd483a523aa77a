//! One game: positions, move log, undo stack and turn state.

use std::collections::VecDeque;
use std::sync::Arc;

use chess_core::{game_status, parse_move, GameStatus, Move, Position};
use external_engine::{Difficulty, MoveRequest};
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::mode::{GameMode, PuzzleResult, TurnState};
use crate::puzzle::PuzzleSet;
use crate::report::{PuzzleView, TurnReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivePuzzle {
    index: usize,
    /// Log length right after the solution was played.
    solved_at: Option<usize>,
}

/// A player's move accepted by `GameSession::player_move`.
#[derive(Debug)]
#[must_use]
pub struct PlayerTurn {
    pub mv: Move,
    pub puzzle_result: Option<PuzzleResult>,
    /// The engine has to answer before the player moves again.
    pub reply_due: bool,
    evicted: Option<Position>,
}

/// State of a single game, owned by exactly one session.
///
/// Positions are never mutated in place: every move produces a new
/// `Position` and the previous one goes on the undo stack.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    mode: GameMode,
    difficulty: Difficulty,
    start: Position,
    position: Position,
    moves: Vec<Move>,
    undo_stack: VecDeque<Position>,
    undo_limit: usize,
    /// `position_hash` of every position since `start`, current one last.
    history: Vec<u64>,
    state: TurnState,
    status: GameStatus,
    puzzles: Arc<PuzzleSet>,
    puzzle: Option<ActivePuzzle>,
}

impl GameSession {
    /// A fresh game: the standard start, or the first puzzle in puzzle mode.
    pub fn new(
        mode: GameMode,
        difficulty: Difficulty,
        config: &SessionConfig,
        puzzles: Arc<PuzzleSet>,
    ) -> Self {
        let puzzle = (mode == GameMode::Puzzle).then_some(ActivePuzzle {
            index: 0,
            solved_at: None,
        });
        let start = match puzzle {
            Some(active) => puzzles.get(active.index).position.clone(),
            None => Position::startpos(),
        };
        let mut session = Self {
            mode,
            difficulty,
            position: start.clone(),
            history: vec![start.position_hash()],
            start,
            moves: Vec::new(),
            undo_stack: VecDeque::new(),
            // Rolling back a cancelled turn needs at least one slot.
            undo_limit: config.undo_limit.max(1),
            state: TurnState::AwaitingPlayerMove,
            status: GameStatus::Ongoing,
            puzzles,
            puzzle,
        };
        session.settle();
        session
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Number of moves that can currently be taken back.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Validate and play the player's move.
    ///
    /// Rejections leave the session untouched. In puzzle mode a legal move
    /// other than the solution is also left unplayed and reported as
    /// `WrongSolution`. When the returned turn has `reply_due` set the session
    /// waits in `AwaitingOpponentMove` until `opponent_move` or
    /// `abandon_reply`.
    pub fn player_move(&mut self, notation: &str) -> Result<PlayerTurn, SessionError> {
        match self.state {
            TurnState::GameOver => return Err(SessionError::GameOver),
            TurnState::AwaitingOpponentMove => return Err(SessionError::NotPlayerTurn),
            TurnState::AwaitingPlayerMove => {}
        }
        let mv = parse_move(&self.position, notation)?;
        let next = self.position.apply(mv)?;

        let mut puzzle_result = None;
        if let Some(active) = self.puzzle.filter(|p| p.solved_at.is_none()) {
            if !self.puzzles.get(active.index).is_solution(mv) {
                debug!(%mv, puzzle = active.index, "wrong puzzle solution");
                return Ok(PlayerTurn {
                    mv,
                    puzzle_result: Some(PuzzleResult::WrongSolution),
                    reply_due: false,
                    evicted: None,
                });
            }
            puzzle_result = Some(PuzzleResult::CorrectSolution);
        }

        let evicted = self.push(mv, next);
        let solved_at = self.moves.len();
        if let (Some(active), Some(PuzzleResult::CorrectSolution)) = (&mut self.puzzle, puzzle_result) {
            active.solved_at = Some(solved_at);
        }
        self.settle();

        let reply_due = self.mode == GameMode::Bot && self.state == TurnState::AwaitingPlayerMove;
        if reply_due {
            self.state = TurnState::AwaitingOpponentMove;
        }
        Ok(PlayerTurn {
            mv,
            puzzle_result,
            reply_due,
            evicted,
        })
    }

    /// What the engine needs to answer the current position.
    pub fn opponent_request(&self) -> MoveRequest<'_> {
        MoveRequest {
            start: &self.start,
            moves: &self.moves,
            current: &self.position,
            difficulty: self.difficulty,
        }
    }

    /// Play the opponent's reply and hand the turn back to the player.
    pub(crate) fn opponent_move(&mut self, mv: Move) -> Result<(), SessionError> {
        let next = self.position.apply(mv)?;
        // Anything evicted here is older than the player's move; it stays forgotten.
        let _ = self.push(mv, next);
        self.settle();
        Ok(())
    }

    /// Take back the player's move of `turn` without an opponent reply.
    pub(crate) fn abandon_reply(&mut self, turn: PlayerTurn) {
        if self.pop().is_some() {
            if let Some(prior) = turn.evicted {
                self.undo_stack.push_front(prior);
            }
        }
        self.settle();
    }

    /// Take back the last ply.
    pub fn undo(&mut self) -> Result<Move, SessionError> {
        let mv = self.pop().ok_or(SessionError::NothingToUndo)?;
        let len = self.moves.len();
        if let Some(active) = &mut self.puzzle {
            if active.solved_at.is_some_and(|at| len < at) {
                active.solved_at = None;
            }
        }
        self.settle();
        Ok(mv)
    }

    /// Start over from `fen`, or from the mode's default position.
    ///
    /// In puzzle mode the default is the current puzzle, or the next one once
    /// the current puzzle is solved; an explicit `fen` must be one of the
    /// puzzles.
    pub fn reset(&mut self, fen: Option<&str>) -> Result<(), SessionError> {
        let start = match (&mut self.puzzle, fen) {
            (None, None) => Position::startpos(),
            (None, Some(fen)) => Position::from_fen(fen)?,
            (Some(active), None) => {
                if active.solved_at.is_some() {
                    active.index = (active.index + 1) % self.puzzles.len();
                }
                active.solved_at = None;
                self.puzzles.get(active.index).position.clone()
            }
            (Some(active), Some(fen)) => {
                let pos = Position::from_fen(fen)?;
                active.index = self.puzzles.find(&pos).ok_or(SessionError::UnknownPuzzle)?;
                active.solved_at = None;
                pos
            }
        };

        self.moves.clear();
        self.undo_stack.clear();
        self.history.clear();
        self.history.push(start.position_hash());
        self.position = start.clone();
        self.start = start;
        self.settle();
        Ok(())
    }

    pub fn move_log(&self) -> Vec<String> {
        self.moves.iter().map(Move::to_string).collect()
    }

    /// Current state as seen by the caller.
    pub fn report(&self) -> TurnReport {
        TurnReport {
            mode: self.mode,
            fen: self.position.to_fen(),
            status: self.status,
            state: self.state,
            move_log: self.move_log(),
            puzzle_result: None,
            opponent_move: None,
            puzzle: self.puzzle.map(|active| {
                let puzzle = self.puzzles.get(active.index);
                PuzzleView {
                    index: active.index,
                    title: puzzle.title.clone(),
                    hint: puzzle.hint.clone(),
                    solved: active.solved_at.is_some(),
                }
            }),
        }
    }

    /// Returns the position evicted from a full undo stack, if any.
    fn push(&mut self, mv: Move, next: Position) -> Option<Position> {
        let prior = std::mem::replace(&mut self.position, next);
        self.undo_stack.push_back(prior);
        let evicted = if self.undo_stack.len() > self.undo_limit {
            self.undo_stack.pop_front()
        } else {
            None
        };
        self.moves.push(mv);
        self.history.push(self.position.position_hash());
        evicted
    }

    fn pop(&mut self) -> Option<Move> {
        self.position = self.undo_stack.pop_back()?;
        self.history.pop();
        self.moves.pop()
    }

    fn settle(&mut self) {
        self.status = game_status(&self.position, &self.history);
        self.state = if self.status.is_terminal() {
            TurnState::GameOver
        } else {
            TurnState::AwaitingPlayerMove
        };
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
