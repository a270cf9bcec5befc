//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Submission database model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub language: String,
    pub source_code: String,
    pub status: String,
    pub verdict: Option<String>,
    pub critique: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub judged_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn status(&self) -> Option<SubmissionStatus> {
        SubmissionStatus::from_str(&self.status)
    }

    /// Completed with a `correct` verdict
    pub fn is_solved(&self) -> bool {
        self.status() == Some(SubmissionStatus::Completed)
            && self.verdict.as_deref() == Some(Verdict::Correct.as_str())
    }
}

/// Judging lifecycle; `Pending` moves to exactly one final state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// AI critique verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    NeedsReview,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::NeedsReview => "needs_review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Self::Correct),
            "incorrect" => Some(Self::Incorrect),
            "needs_review" => Some(Self::NeedsReview),
            _ => None,
        }
    }

    /// Lenient parse of the label a model puts in its reply
    pub fn from_model_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "correct" | "accepted" | "passed" => Some(Self::Correct),
            "incorrect" | "wrong" | "wrong_answer" | "failed" => Some(Self::Incorrect),
            "needs_review" | "review" | "unknown" => Some(Self::NeedsReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
