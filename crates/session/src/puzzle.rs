//! Mate-in-one puzzles: a built-in set plus optional TOML files.
//!
//! A puzzle file is a list of tables:
//!
//! ```toml
//! [[puzzle]]
//! title = "Back Rank"
//! fen = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"
//! solution = "a1a8"
//! hint = "The last rank is unguarded"
//! ```

use std::path::Path;

use chess_core::{parse_move, Move, Position};
use serde::Deserialize;

use crate::error::ConfigError;

/// A puzzle as written in source or in a file, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PuzzleDef {
    #[serde(default)]
    pub title: String,
    pub fen: String,
    /// Long algebraic, e.g. `h5f7`.
    pub solution: String,
    #[serde(default)]
    pub hint: String,
}

#[derive(Debug, Deserialize)]
struct PuzzleFile {
    #[serde(default)]
    puzzle: Vec<PuzzleDef>,
}

/// A validated puzzle: the position parses and the solution is legal in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub title: String,
    pub hint: String,
    pub position: Position,
    pub solution: Move,
}

impl Puzzle {
    pub fn from_def(index: usize, def: &PuzzleDef) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPuzzle {
            index,
            title: def.title.clone(),
            reason,
        };
        let position = Position::from_fen(&def.fen).map_err(|e| invalid(e.to_string()))?;
        let solution = parse_move(&position, &def.solution).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            title: def.title.clone(),
            hint: def.hint.clone(),
            position,
            solution,
        })
    }

    /// True when `mv` is the expected solution.
    pub fn is_solution(&self, mv: Move) -> bool {
        mv.same_as(self.solution.from, self.solution.to, self.solution.promo)
    }
}

const BUILTIN: &[(&str, &str, &str, &str)] = &[
    (
        "Scholar's Mate",
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        "h5f7",
        "The queen delivers checkmate on the weakest square",
    ),
    (
        "Fool's Mate",
        "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2",
        "d8h4",
        "The queen strikes along the open diagonal",
    ),
    (
        "Back Rank",
        "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1",
        "a1a8",
        "The king is walled in by its own pawns",
    ),
    (
        "Smothered Mate",
        "6rk/6pp/8/6N1/8/8/8/6K1 w - - 0 1",
        "g5f7",
        "The king has no room to breathe",
    ),
    (
        "King and Queen",
        "k7/8/1K6/8/8/8/8/6Q1 w - - 0 1",
        "g1g8",
        "Your king guards the escape squares",
    ),
    (
        "Black's Back Rank",
        "r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1",
        "a8a1",
        "White forgot to make luft",
    ),
];

/// Ordered puzzles served one after another in puzzle mode. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSet {
    puzzles: Vec<Puzzle>,
}

impl PuzzleSet {
    /// The puzzles shipped with the crate.
    pub fn builtin() -> Self {
        let puzzles = BUILTIN
            .iter()
            .enumerate()
            .map(|(i, &(title, fen, solution, hint))| {
                let def = PuzzleDef {
                    title: title.into(),
                    fen: fen.into(),
                    solution: solution.into(),
                    hint: hint.into(),
                };
                Puzzle::from_def(i, &def).expect("built-in puzzle is valid")
            })
            .collect();
        Self { puzzles }
    }

    pub fn from_defs(defs: &[PuzzleDef]) -> Result<Self, ConfigError> {
        if defs.is_empty() {
            return Err(ConfigError::InvalidPuzzle {
                index: 0,
                title: String::new(),
                reason: "no puzzles defined".into(),
            });
        }
        let puzzles = defs
            .iter()
            .enumerate()
            .map(|(i, def)| Puzzle::from_def(i, def))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { puzzles })
    }

    /// Load and validate a `[[puzzle]]` TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: PuzzleFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_defs(&file.puzzle)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Puzzle `index`, wrapping past the end.
    pub fn get(&self, index: usize) -> &Puzzle {
        &self.puzzles[index % self.puzzles.len()]
    }

    /// Index of the puzzle starting from `pos`.
    pub fn find(&self, pos: &Position) -> Option<usize> {
        self.puzzles.iter().position(|p| &p.position == pos)
    }
}

impl Default for PuzzleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "puzzle_tests.rs"]
mod puzzle_tests;
