//! The three static difficulty presets.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Names one of the three presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyId {
    Easy,
    Medium,
    Hard,
}

impl DifficultyId {
    /// All presets, easiest first.
    pub const ALL: [DifficultyId; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// The preset this id names.
    pub fn config(self) -> &'static DifficultyConfig {
        match self {
            Self::Easy => &EASY,
            Self::Medium => &MEDIUM,
            Self::Hard => &HARD,
        }
    }

    /// Lowercase name, as used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(EngineError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// An immutable difficulty preset.
///
/// Both factors of every question are drawn from `table_range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyConfig {
    pub id: DifficultyId,
    /// Inclusive range of factors.
    pub table_range: RangeInclusive<u32>,
    /// Length of a round in seconds.
    pub time_limit_secs: u32,
    /// Score awarded per correct answer.
    pub points_per_correct: u32,
}

pub static EASY: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Easy,
    table_range: 1..=5,
    time_limit_secs: 60,
    points_per_correct: 10,
};

pub static MEDIUM: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Medium,
    table_range: 1..=8,
    time_limit_secs: 60,
    points_per_correct: 15,
};

pub static HARD: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Hard,
    table_range: 1..=10,
    time_limit_secs: 60,
    points_per_correct: 20,
};
