use std::path::PathBuf;

use chess_core::{has_legal_move, parse_move, Move, Position};
use random_engine::RandomEngine;
use serde::Serialize;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::cancel::CancelSignal;
use crate::config::EngineConfig;
use crate::difficulty::Difficulty;
use crate::error::{EngineError, FallbackReason};
use crate::process::UciProcess;

/// Everything the engine needs to answer one position.
#[derive(Debug, Clone, Copy)]
pub struct MoveRequest<'a> {
    /// Position the game started from.
    pub start: &'a Position,
    /// Moves played since `start`.
    pub moves: &'a [Move],
    /// Position after `moves`; the reply must be legal here.
    pub current: &'a Position,
    pub difficulty: Difficulty,
}

/// Where a reply move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSource {
    Engine,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Played { mv: Move, source: MoveSource },
    /// The request was cancelled; the engine was stopped and nothing was chosen.
    Cancelled,
    /// The side to move has no legal move. Callers check status first.
    NoLegalMoves,
}

impl MoveOutcome {
    pub fn played(&self) -> Option<Move> {
        match self {
            MoveOutcome::Played { mv, .. } => Some(*mv),
            _ => None,
        }
    }
}

/// Runs an external UCI engine per request, under a hard deadline, and falls
/// back to a random legal move whenever the engine cannot deliver one.
///
/// Holds no game state: any number of sessions may share one adapter.
#[derive(Debug, Clone)]
pub struct EngineAdapter {
    config: EngineConfig,
    program: Option<PathBuf>,
}

impl EngineAdapter {
    pub fn new(config: EngineConfig) -> Self {
        let program = config.resolve_command();
        match &program {
            Some(p) => info!(engine = %p.display(), "using external engine"),
            None => warn!("no external engine found, replies will be random"),
        }
        Self { config, program }
    }

    /// The engine's reply for `req`, or a random legal move if the engine
    /// fails, misbehaves or runs past its deadline.
    ///
    /// Only `Cancelled` (when `cancel` fires) and `NoLegalMoves` come back
    /// without a move.
    pub async fn request_move(&self, req: &MoveRequest<'_>, mut cancel: CancelSignal) -> MoveOutcome {
        if !has_legal_move(req.current) {
            return MoveOutcome::NoLegalMoves;
        }
        let limits = self.config.limits(req.difficulty);
        let deadline = Instant::now() + limits.hard_timeout;

        let Some(program) = &self.program else {
            return self.fallback(req.current, &EngineError::NotConfigured);
        };
        let mut process = match UciProcess::spawn(program, &self.config.args) {
            Ok(process) => process,
            Err(err) => return self.fallback(req.current, &err),
        };

        let start_fen = req.start.to_fen();
        let moves: Vec<String> = req.moves.iter().map(Move::to_string).collect();
        let exchange = tokio::select! {
            reply = timeout_at(
                deadline,
                process.best_move(&self.config.skill_option, &start_fen, &moves, &limits),
            ) => Some(reply),
            _ = cancel.cancelled() => None,
        };

        let reply = match exchange {
            None => {
                process.kill().await;
                info!("engine request cancelled");
                return MoveOutcome::Cancelled;
            }
            Some(Err(_elapsed)) => {
                process.kill().await;
                Err(EngineError::Timeout(limits.hard_timeout))
            }
            Some(Ok(Err(err))) => {
                process.kill().await;
                Err(err)
            }
            Some(Ok(Ok(text))) => {
                process.quit().await;
                parse_move(req.current, &text)
                    .map_err(|e| EngineError::Protocol(format!("engine replied {text}: {e}")))
            }
        };

        match reply {
            Ok(mv) => {
                debug!(%mv, difficulty = %req.difficulty, "engine move");
                MoveOutcome::Played {
                    mv,
                    source: MoveSource::Engine,
                }
            }
            Err(err) => self.fallback(req.current, &err),
        }
    }

    fn fallback(&self, pos: &Position, err: &EngineError) -> MoveOutcome {
        let reason = FallbackReason::from(err);
        match RandomEngine::new().choose_move(pos) {
            Some(mv) => {
                warn!(error = %err, %mv, "engine failed, playing a random move");
                MoveOutcome::Played {
                    mv,
                    source: MoveSource::Fallback(reason),
                }
            }
            None => MoveOutcome::NoLegalMoves,
        }
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod adapter_tests;
