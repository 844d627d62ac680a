//! Practice-session difficulty levels and practice types.
//!
//! Both enums are stored as lowercase text in the database and appear
//! verbatim in API payloads, so the serde names and [`as_str`] values
//! must stay in sync with the `CHECK` constraints in the migrations.
//!
//! [`as_str`]: DifficultyLevel::as_str

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Practice difficulty. Harder levels advance per-level progress more slowly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    /// All levels, in ascending difficulty order.
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(CoreError::Validation(format!(
                "Level must be easy, medium, or hard (got '{other}')"
            ))),
        }
    }
}

/// The kind of practice exercise a session records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeType {
    Freestyle,
    Guided,
    Interview,
    Presentation,
}

impl PracticeType {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Freestyle => "freestyle",
            Self::Guided => "guided",
            Self::Interview => "interview",
            Self::Presentation => "presentation",
        }
    }
}

impl Default for PracticeType {
    fn default() -> Self {
        Self::Freestyle
    }
}

impl fmt::Display for PracticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PracticeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "freestyle" => Ok(Self::Freestyle),
            "guided" => Ok(Self::Guided),
            "interview" => Ok(Self::Interview),
            "presentation" => Ok(Self::Presentation),
            other => Err(CoreError::Validation(format!(
                "Invalid practice type '{other}'"
            ))),
        }
    }
}
