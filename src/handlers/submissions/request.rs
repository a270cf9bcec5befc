//! Submission request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_SOURCE_CODE_SIZE;

/// Create submission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    /// Problem ID or slug
    #[serde(alias = "problem_slug")]
    #[validate(length(min = 1))]
    pub problem_id: String,

    /// Programming language
    #[validate(length(min = 1, max = 20))]
    pub language: String,

    /// Source code
    #[validate(length(min = 1, max = MAX_SOURCE_CODE_SIZE))]
    pub source_code: String,
}

/// Query options for submitting code
#[derive(Debug, Default, Deserialize)]
pub struct SubmitQuery {
    /// Wait for the critique before responding (default `true`)
    pub wait: Option<bool>,
}

/// List submissions query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListSubmissionsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub problem_id: Option<Uuid>,
    /// Honored for admins only
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
}
