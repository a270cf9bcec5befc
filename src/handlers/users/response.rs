//! User response DTOs

use serde::Serialize;

use crate::db::repositories::RecentSubmissionRow;

/// Per-user activity summary
#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub total_submissions: i64,
    /// Distinct problems with a correct verdict
    pub problems_solved_count: i64,
    pub recent_submissions: Vec<RecentSubmissionRow>,
}
