//! Problem model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

/// Problem database model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Problem {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub statement: String,
    /// SHA-256 hex of `statement`
    #[serde(skip_serializing)]
    pub statement_digest: String,
    pub translated_statement: Option<String>,
    pub translated_at: Option<DateTime<Utc>>,
    pub difficulty: String,
    pub tags: Json<Vec<String>>,
    pub default_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    pub fn is_translated(&self) -> bool {
        self.translated_statement.is_some()
    }

    pub fn difficulty_level(&self) -> Option<Difficulty> {
        Difficulty::from_str(&self.difficulty)
    }
}

/// Problem difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
