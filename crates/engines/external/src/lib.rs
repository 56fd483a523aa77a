//! Adapter between a chess session and an external UCI engine process.
//!
//! The adapter turns a 1-10 difficulty into a skill level and a time budget,
//! runs the engine under a deadline measured on our side, and answers with a
//! random legal move if anything goes wrong. From the caller's point of view
//! a request always yields a legal move unless the position is already over
//! or the caller cancelled it.

mod adapter;
mod cancel;
mod config;
mod difficulty;
mod error;
mod process;

pub use adapter::*;
pub use cancel::*;
pub use config::*;
pub use difficulty::*;
pub use error::*;
