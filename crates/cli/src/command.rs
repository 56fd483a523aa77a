//! Parsing of the text commands read from stdin.

use session::{GameMode, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New {
        mode: GameMode,
        difficulty: Option<u8>,
    },
    Use(SessionId),
    Move(String),
    Undo,
    /// Remaining text of the line, usually a FEN.
    Reset(Option<String>),
    Show,
    Cancel,
    Close,
    Help,
    Quit,
}

pub const USAGE: &[&str] = &[
    "new bot|puzzle|local [difficulty]",
    "use <session-id>",
    "move <uci>",
    "undo",
    "reset [fen]",
    "show",
    "cancel",
    "close",
    "help",
    "quit",
];

impl Command {
    /// `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word.to_ascii_lowercase().as_str() {
            "new" => {
                let mode = args
                    .first()
                    .ok_or("new needs a mode: bot, puzzle or local")?
                    .parse::<GameMode>()?;
                let difficulty = match args.get(1) {
                    Some(d) => Some(
                        d.parse::<u8>()
                            .map_err(|_| format!("difficulty must be a number, got '{d}'"))?,
                    ),
                    None => None,
                };
                Command::New { mode, difficulty }
            }
            "use" => {
                let id = args.first().ok_or("use needs a session id")?;
                Command::Use(id.parse().map_err(|e| format!("bad session id '{id}': {e}"))?)
            }
            "move" | "m" => match args.as_slice() {
                [mv] => Command::Move((*mv).to_string()),
                _ => return Err("move needs exactly one move, e.g. 'move e2e4'".into()),
            },
            "undo" => Command::Undo,
            "reset" => Command::Reset((!rest.is_empty()).then(|| rest.to_string())),
            "show" => Command::Show,
            "cancel" => Command::Cancel,
            "close" => Command::Close,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;
