//! One UCI engine child process, spoken to over stdin/stdout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

use crate::config::SearchLimits;
use crate::error::EngineError;

/// How long a well-behaved engine gets to exit after `quit`.
const QUIT_GRACE: Duration = Duration::from_millis(100);

pub(crate) struct UciProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl UciProcess {
    pub(crate) fn spawn(program: &Path, args: &[String]) -> Result<Self, EngineError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Unavailable {
                program: program.to_path_buf(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdout unavailable".into()))?;

        debug!(program = %program.display(), pid = child.id(), "engine started");
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        })
    }

    async fn send(&mut self, command: &str) -> Result<(), EngineError> {
        debug!(target: "uci", "> {command}");
        self.stdin.write_all(command.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Read lines until one satisfies `done`, skipping everything else.
    async fn read_until(&mut self, done: impl Fn(&str) -> bool) -> Result<String, EngineError> {
        loop {
            match self.stdout.next_line().await? {
                Some(line) => {
                    debug!(target: "uci", "< {line}");
                    let line = line.trim();
                    if done(line) {
                        return Ok(line.to_string());
                    }
                }
                None => return Err(EngineError::Protocol("engine closed its output".into())),
            }
        }
    }

    /// Full exchange for one move: handshake, strength, position, search.
    ///
    /// Returns the engine's move text exactly as sent after `bestmove`.
    pub(crate) async fn best_move(
        &mut self,
        skill_option: &str,
        start_fen: &str,
        moves: &[String],
        limits: &SearchLimits,
    ) -> Result<String, EngineError> {
        self.send("uci").await?;
        self.read_until(|l| l == "uciok").await?;

        // Engines without the option simply ignore it.
        self.send(&format!(
            "setoption name {skill_option} value {}",
            limits.skill_level
        ))
        .await?;
        self.send("ucinewgame").await?;
        self.send("isready").await?;
        self.read_until(|l| l == "readyok").await?;

        let mut position = format!("position fen {start_fen}");
        if !moves.is_empty() {
            position.push_str(" moves ");
            position.push_str(&moves.join(" "));
        }
        self.send(&position).await?;
        self.send(&limits.go_command()).await?;

        let reply = self.read_until(|l| l.starts_with("bestmove")).await?;
        reply
            .split_whitespace()
            .nth(1)
            .map(str::to_string)
            .ok_or_else(|| EngineError::Protocol(format!("malformed reply '{reply}'")))
    }

    /// Ask the engine to exit, killing it if it lingers.
    pub(crate) async fn quit(mut self) {
        let _ = self.send("quit").await;
        match tokio::time::timeout(QUIT_GRACE, self.child.wait()).await {
            Ok(_) => debug!("engine exited"),
            Err(_) => self.kill().await,
        }
    }

    /// Terminate the process and reap it.
    pub(crate) async fn kill(mut self) {
        match self.child.kill().await {
            Ok(()) => debug!("engine killed"),
            // Already gone.
            Err(err) => trace!(%err, "engine kill failed"),
        }
    }
}
