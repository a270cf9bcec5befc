//! Admin service

use sqlx::SqlitePool;

use crate::{
    constants::{difficulties, statuses},
    db::repositories::{ProblemRepository, SubmissionRepository, UserRepository},
    error::AppResult,
    handlers::admin::response::{AdminStatsResponse, DifficultyBreakdown},
};

/// Admin service for dashboard queries
pub struct AdminService;

impl AdminService {
    /// Platform-wide totals and solved counts by difficulty
    pub async fn get_system_stats(pool: &SqlitePool) -> AppResult<AdminStatsResponse> {
        let total_users = UserRepository::count(pool).await?;
        let total_problems = ProblemRepository::count(pool).await?;
        let total_submissions = SubmissionRepository::count(pool).await?;
        let pending_submissions =
            SubmissionRepository::count_by_status(pool, statuses::PENDING).await?;
        let failed_submissions =
            SubmissionRepository::count_by_status(pool, statuses::FAILED).await?;

        let problems_by_difficulty =
            DifficultyBreakdown::from_rows(ProblemRepository::count_by_difficulty(pool).await?);
        let solved_by_difficulty = DifficultyBreakdown::from_rows(
            SubmissionRepository::count_solved_by_difficulty(pool).await?,
        );

        Ok(AdminStatsResponse {
            total_users,
            total_problems,
            total_submissions,
            pending_submissions,
            failed_submissions,
            problems_solved_count: solved_by_difficulty.total(),
            problems_by_difficulty,
            solved_by_difficulty,
        })
    }
}

impl DifficultyBreakdown {
    fn from_rows(rows: Vec<(String, i64)>) -> Self {
        let mut breakdown = Self::default();
        for (difficulty, count) in rows {
            match difficulty.as_str() {
                difficulties::EASY => breakdown.easy = count,
                difficulties::MEDIUM => breakdown.medium = count,
                difficulties::HARD => breakdown.hard = count,
                _ => {}
            }
        }
        breakdown
    }

    fn total(&self) -> i64 {
        self.easy + self.medium + self.hard
    }
}
