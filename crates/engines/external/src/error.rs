use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Why a request to the external engine failed.
///
/// These never leave the adapter; each one is turned into a fallback move.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no engine executable configured or found")]
    NotConfigured,
    #[error("could not start engine {program:?}: {source}")]
    Unavailable {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("engine protocol error: {0}")]
    Protocol(String),
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
    #[error("engine i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an `EngineError`, reported with fallback moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NotConfigured,
    Unavailable,
    Protocol,
    Timeout,
}

impl From<&EngineError> for FallbackReason {
    fn from(err: &EngineError) -> Self {
        match err {
            EngineError::NotConfigured => FallbackReason::NotConfigured,
            EngineError::Unavailable { .. } => FallbackReason::Unavailable,
            EngineError::Protocol(_) | EngineError::Io(_) => FallbackReason::Protocol,
            EngineError::Timeout(_) => FallbackReason::Timeout,
        }
    }
}
