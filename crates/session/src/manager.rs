//! Registry of concurrent sessions, each driven one turn at a time.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chess_core::to_san;
use external_engine::{cancel_pair, CancelHandle, Difficulty, EngineAdapter, MoveOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::mode::GameMode;
use crate::puzzle::PuzzleSet;
use crate::report::{OpponentMove, TurnReport};
use crate::session::GameSession;

/// Opaque handle naming one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

struct SessionSlot {
    game: tokio::sync::Mutex<GameSession>,
    /// Kept outside `game` so it can be fired without waiting for the turn
    /// to finish.
    interrupt: Mutex<Interrupt>,
}

#[derive(Default)]
struct Interrupt {
    /// Present while an engine request is in flight.
    handle: Option<CancelHandle>,
    /// Resets waiting for the game lock.
    resets_waiting: usize,
    closed: bool,
}

impl Interrupt {
    fn fire(&self) -> bool {
        match &self.handle {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

impl SessionSlot {
    fn interrupt(&self) -> MutexGuard<'_, Interrupt> {
        self.interrupt.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install the handle for an engine request about to start. Refused when
    /// a reset is queued or the session is closed; the turn is then cancelled
    /// before it reaches the engine.
    fn arm(&self, handle: CancelHandle) -> bool {
        let mut interrupt = self.interrupt();
        if interrupt.closed || interrupt.resets_waiting > 0 {
            return false;
        }
        interrupt.handle = Some(handle);
        true
    }

    fn disarm(&self) {
        self.interrupt().handle = None;
    }

    /// Fire the in-flight request's cancellation, if there is one.
    fn fire_cancel(&self) -> bool {
        self.interrupt().fire()
    }

    /// Cancel the current request and refuse new ones until the returned
    /// guard is dropped.
    fn begin_reset(&self) -> PendingReset<'_> {
        let mut interrupt = self.interrupt();
        interrupt.resets_waiting += 1;
        interrupt.fire();
        PendingReset(self)
    }

    fn close(&self) {
        let mut interrupt = self.interrupt();
        interrupt.closed = true;
        interrupt.fire();
    }
}

struct PendingReset<'a>(&'a SessionSlot);

impl Drop for PendingReset<'_> {
    fn drop(&mut self) {
        self.0.interrupt().resets_waiting -= 1;
    }
}

/// Owns every live session and the engine adapter they share.
///
/// Sessions never share a board. Requests on one session run one at a time;
/// requests on different sessions run concurrently.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<SessionSlot>>>,
    adapter: EngineAdapter,
    puzzles: Arc<PuzzleSet>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(adapter: EngineAdapter, puzzles: PuzzleSet, config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            adapter,
            puzzles: Arc::new(puzzles),
            config,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.slot(id).is_ok()
    }

    pub fn new_session(&self, mode: GameMode, difficulty: u8) -> Result<SessionId, SessionError> {
        let difficulty = Difficulty::try_from(difficulty)?;
        let game = GameSession::new(mode, difficulty, &self.config, Arc::clone(&self.puzzles));
        let slot = Arc::new(SessionSlot {
            game: tokio::sync::Mutex::new(game),
            interrupt: Mutex::new(Interrupt::default()),
        });

        let id = SessionId::new();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, slot);
        info!(session = %id, %mode, difficulty = %difficulty, "session opened");
        Ok(id)
    }

    /// Play the player's move and, in bot mode, the engine's reply.
    ///
    /// Fails with `Cancelled` if `cancel` or `reset` interrupts the engine; the
    /// player's move is then taken back as well.
    pub async fn apply_move(&self, id: SessionId, notation: &str) -> Result<TurnReport, SessionError> {
        let slot = self.slot(id)?;
        let mut game = slot.game.lock().await;

        let turn = game.player_move(notation)?;
        debug!(session = %id, mv = %turn.mv, result = ?turn.puzzle_result, "player move");
        if !turn.reply_due {
            let mut report = game.report();
            report.puzzle_result = turn.puzzle_result;
            info!(session = %id, status = ?report.status, "turn complete");
            return Ok(report);
        }

        let (handle, signal) = cancel_pair();
        let outcome = if slot.arm(handle) {
            let outcome = self.adapter.request_move(&game.opponent_request(), signal).await;
            slot.disarm();
            outcome
        } else {
            MoveOutcome::Cancelled
        };

        let opponent = match outcome {
            MoveOutcome::Played { mv, source } => {
                let san = to_san(game.position(), mv);
                if let Err(err) = game.opponent_move(mv) {
                    warn!(session = %id, %mv, %err, "opponent move rejected");
                    game.abandon_reply(turn);
                    return Err(err);
                }
                Some(OpponentMove {
                    uci: mv.to_string(),
                    san,
                    source,
                })
            }
            MoveOutcome::Cancelled => {
                game.abandon_reply(turn);
                info!(session = %id, "turn cancelled, player move taken back");
                return Err(SessionError::Cancelled);
            }
            MoveOutcome::NoLegalMoves => {
                warn!(session = %id, "engine asked to move in a finished position");
                game.abandon_reply(turn);
                return Err(SessionError::GameOver);
            }
        };

        let mut report = game.report();
        report.puzzle_result = turn.puzzle_result;
        report.opponent_move = opponent;
        info!(session = %id, status = ?report.status, "turn complete");
        Ok(report)
    }

    pub async fn undo(&self, id: SessionId) -> Result<TurnReport, SessionError> {
        let slot = self.slot(id)?;
        let mut game = slot.game.lock().await;
        let mv = game.undo()?;
        debug!(session = %id, %mv, "move taken back");
        Ok(game.report())
    }

    /// Restart the game, cancelling any engine request in flight first.
    pub async fn reset(&self, id: SessionId, fen: Option<&str>) -> Result<TurnReport, SessionError> {
        let slot = self.slot(id)?;
        let pending = slot.begin_reset();
        let mut game = slot.game.lock().await;
        drop(pending);
        game.reset(fen)?;
        info!(session = %id, fen = %game.position().to_fen(), "session reset");
        Ok(game.report())
    }

    /// Current state of the session, waiting for any turn in progress.
    pub async fn snapshot(&self, id: SessionId) -> Result<TurnReport, SessionError> {
        let slot = self.slot(id)?;
        let game = slot.game.lock().await;
        Ok(game.report())
    }

    /// Abort the session's engine request, if any. Returns whether one was running.
    pub fn cancel(&self, id: SessionId) -> Result<bool, SessionError> {
        let fired = self.slot(id)?.fire_cancel();
        if fired {
            info!(session = %id, "cancellation requested");
        }
        Ok(fired)
    }

    /// Forget the session, cancelling its engine request if one is running.
    pub fn close_session(&self, id: SessionId) -> Result<(), SessionError> {
        let slot = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        slot.close();
        info!(session = %id, "session closed");
        Ok(())
    }

    fn slot(&self, id: SessionId) -> Result<Arc<SessionSlot>, SessionError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownSession(id))
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod manager_tests;
