//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Submission;

/// Submission with its critique
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
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

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            problem_id: s.problem_id,
            language: s.language,
            source_code: s.source_code,
            status: s.status,
            verdict: s.verdict,
            critique: s.critique,
            time_complexity: s.time_complexity,
            space_complexity: s.space_complexity,
            failure_reason: s.failure_reason,
            created_at: s.created_at,
            judged_at: s.judged_at,
        }
    }
}

/// Submission summary for list views
#[derive(Debug, Serialize)]
pub struct SubmissionSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub language: String,
    pub status: String,
    pub verdict: Option<String>,
    pub created_at: DateTime<Utc>,
    pub judged_at: Option<DateTime<Utc>>,
}

impl From<Submission> for SubmissionSummary {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            problem_id: s.problem_id,
            language: s.language,
            status: s.status,
            verdict: s.verdict,
            created_at: s.created_at,
            judged_at: s.judged_at,
        }
    }
}

/// Submission list response
#[derive(Debug, Serialize)]
pub struct SubmissionsListResponse {
    pub submissions: Vec<SubmissionSummary>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Response for a submission accepted without waiting for the critique
#[derive(Debug, Serialize)]
pub struct CreateSubmissionResponse {
    pub id: Uuid,
    pub message: String,
    pub status: String,
}
