//! Problem response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Problem;

/// Problem response
#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub statement: String,
    pub translated_statement: Option<String>,
    pub translated_at: Option<DateTime<Utc>>,
    /// Set when the translation was requested but could not be produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_error: Option<String>,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub default_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Problem> for ProblemResponse {
    fn from(problem: Problem) -> Self {
        Self {
            id: problem.id,
            slug: problem.slug,
            title: problem.title,
            statement: problem.statement,
            translated_statement: problem.translated_statement,
            translated_at: problem.translated_at,
            translation_error: None,
            difficulty: problem.difficulty,
            tags: problem.tags.0,
            default_code: problem.default_code,
            created_at: problem.created_at,
            updated_at: problem.updated_at,
        }
    }
}

/// Problem list response
#[derive(Debug, Serialize)]
pub struct ProblemsListResponse {
    pub problems: Vec<ProblemSummary>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Problem summary for list views
#[derive(Debug, Serialize)]
pub struct ProblemSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub is_translated: bool,
}

impl From<Problem> for ProblemSummary {
    fn from(problem: Problem) -> Self {
        let is_translated = problem.is_translated();
        Self {
            id: problem.id,
            slug: problem.slug,
            title: problem.title,
            difficulty: problem.difficulty,
            tags: problem.tags.0,
            is_translated,
        }
    }
}
