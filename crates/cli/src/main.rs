//! Chess session driver
//!
//! Reads one command per line from stdin and answers each with one line of
//! JSON on stdout. Logs go to stderr, filtered by `RUST_LOG`.

mod command;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use external_engine::EngineAdapter;
use serde_json::{json, Value};
use session::{AppConfig, SessionError, SessionId, SessionManager, TurnReport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use command::{Command, USAGE};

fn print_usage() {
    eprintln!("Chess session driver");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  chess_session [--config <path>]");
    eprintln!();
    eprintln!("Commands (stdin, one per line):");
    for line in USAGE {
        eprintln!("  {line}");
    }
    eprintln!();
    eprintln!("Example:");
    eprintln!("  printf 'new bot 3\\nmove e2e4\\nquit\\n' | chess_session");
}

/// `Ok(None)` when only help was requested.
fn parse_args(args: &[String]) -> Result<Option<Option<PathBuf>>> {
    let mut config = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--config needs a path");
                };
                config = Some(PathBuf::from(path));
                i += 1;
            }
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument '{other}'"),
        }
        i += 1;
    }
    Ok(Some(config))
}

fn emit(reply: Value) {
    println!("{reply}");
}

fn emit_error(session: Option<SessionId>, err: impl std::fmt::Display) {
    emit(json!({ "session": session, "error": err.to_string() }));
}

fn emit_report(session: SessionId, result: Result<TurnReport, SessionError>) {
    match result {
        Ok(report) => emit(json!({ "session": session, "report": report })),
        Err(err) => emit_error(Some(session), err),
    }
}

/// Session work done in command order by a single worker task.
#[derive(Debug)]
enum Op {
    Move(String),
    Undo,
    Reset(Option<String>),
    Show,
}

async fn run_ops(manager: Arc<SessionManager>, mut ops: mpsc::UnboundedReceiver<(SessionId, Op)>) {
    while let Some((id, op)) = ops.recv().await {
        let result = match op {
            Op::Move(mv) => manager.apply_move(id, &mv).await,
            Op::Undo => manager.undo(id).await,
            Op::Reset(fen) => manager.reset(id, fen.as_deref()).await,
            Op::Show => manager.snapshot(id).await,
        };
        emit_report(id, result);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config_path = match parse_args(&args) {
        Ok(Some(path)) => path,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            print_usage();
            return Err(err);
        }
    };

    let config = match &config_path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    let puzzles = config.puzzle_set().context("loading puzzles")?;
    info!(puzzles = puzzles.len(), "configuration loaded");

    let default_difficulty = config.session.default_difficulty.get();
    let manager = Arc::new(SessionManager::new(
        EngineAdapter::new(config.engine),
        puzzles,
        config.session,
    ));

    // The worker runs turns so `cancel` can be read while the engine thinks.
    let (ops, queue) = mpsc::unbounded_channel();
    let worker = tokio::spawn(run_ops(Arc::clone(&manager), queue));
    let mut current: Option<SessionId> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                emit_error(current, err);
                continue;
            }
        };
        debug!(?command, "command");

        let command = match command {
            Command::Quit => break,
            Command::Help => {
                emit(json!({ "commands": USAGE }));
                continue;
            }
            Command::New { mode, difficulty } => {
                match manager.new_session(mode, difficulty.unwrap_or(default_difficulty)) {
                    Ok(id) => {
                        current = Some(id);
                        emit_report(id, manager.snapshot(id).await);
                    }
                    Err(err) => emit_error(None, err),
                }
                continue;
            }
            Command::Use(id) => {
                if !manager.contains(id) {
                    emit_error(Some(id), SessionError::UnknownSession(id));
                    continue;
                }
                // The report is queued behind any turn still running there.
                current = Some(id);
                Command::Show
            }
            session_command => session_command,
        };

        let Some(id) = current else {
            emit_error(None, "no session; start one with 'new'");
            continue;
        };
        let op = match command {
            Command::Move(mv) => Op::Move(mv),
            Command::Undo => Op::Undo,
            Command::Reset(fen) => {
                // Interrupt a running turn now rather than after it finishes.
                let _ = manager.cancel(id);
                Op::Reset(fen)
            }
            Command::Show => Op::Show,
            Command::Cancel => {
                match manager.cancel(id) {
                    Ok(cancelled) => emit(json!({ "session": id, "cancelled": cancelled })),
                    Err(err) => emit_error(Some(id), err),
                }
                continue;
            }
            Command::Close => {
                match manager.close_session(id) {
                    Ok(()) => emit(json!({ "session": id, "closed": true })),
                    Err(err) => emit_error(Some(id), err),
                }
                current = None;
                continue;
            }
            Command::New { .. } | Command::Use(_) | Command::Help | Command::Quit => continue,
        };
        ops.send((id, op)).context("session worker stopped")?;
    }

    drop(ops);
    worker.await.context("session worker panicked")?;
    info!(sessions = manager.session_count(), "input closed");
    Ok(())
}
