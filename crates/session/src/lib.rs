//! Chess sessions: one game per session id, played against the external
//! engine, against a puzzle, or by two people sharing the board.
//!
//! ```no_run
//! # async fn demo() -> Result<(), session::SessionError> {
//! use external_engine::{EngineAdapter, EngineConfig};
//! use session::{GameMode, PuzzleSet, SessionConfig, SessionManager};
//!
//! let manager = SessionManager::new(
//!     EngineAdapter::new(EngineConfig::default()),
//!     PuzzleSet::builtin(),
//!     SessionConfig::default(),
//! );
//! let id = manager.new_session(GameMode::Bot, 3)?;
//! let report = manager.apply_move(id, "e2e4").await?;
//! println!("{}", report.fen);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod manager;
mod mode;
mod puzzle;
mod report;
mod session;

pub use config::{AppConfig, SessionConfig};
pub use error::{ConfigError, SessionError};
pub use manager::{SessionId, SessionManager};
pub use mode::{GameMode, PuzzleResult, TurnState};
pub use puzzle::{Puzzle, PuzzleDef, PuzzleSet};
pub use report::{OpponentMove, PuzzleView, TurnReport};
pub use session::{GameSession, PlayerTurn};
