use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player-facing strength dial, 1 (weakest) to 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("difficulty {0} is outside 1..=10")]
pub struct InvalidDifficulty(pub u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Engine "Skill Level" on the 0-20 scale: 0, 2, ..., 18.
    pub fn skill_level(self) -> u8 {
        (self.0 - 1) * 2
    }

    /// Every difficulty from easiest to hardest.
    pub fn all() -> impl Iterator<Item = Difficulty> {
        (Self::MIN..=Self::MAX).map(Difficulty)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidDifficulty(value))
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
