//! Admin response DTOs

use serde::Serialize;

/// Counts keyed by problem difficulty
#[derive(Debug, Default, Serialize)]
pub struct DifficultyBreakdown {
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
}

/// Platform-wide statistics
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub total_problems: i64,
    pub total_submissions: i64,
    pub pending_submissions: i64,
    pub failed_submissions: i64,
    pub problems_solved_count: i64,
    pub problems_by_difficulty: DifficultyBreakdown,
    pub solved_by_difficulty: DifficultyBreakdown,
}
