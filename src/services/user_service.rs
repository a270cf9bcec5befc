//! User service

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    constants::RECENT_SUBMISSIONS_LIMIT,
    db::repositories::{SubmissionRepository, UserRepository},
    error::{AppError, AppResult},
    handlers::users::response::UserStatsResponse,
    models::User,
};

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(pool: &SqlitePool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Totals, solved problems, and recent activity of one account
    pub async fn get_user_stats(pool: &SqlitePool, user_id: &Uuid) -> AppResult<UserStatsResponse> {
        let user = Self::get_user_by_id(pool, user_id).await?;

        let total_submissions = SubmissionRepository::count_by_user(pool, user_id).await?;
        let problems_solved_count = SubmissionRepository::count_solved_by_user(pool, user_id).await?;
        let recent_submissions =
            SubmissionRepository::recent_for_user(pool, user_id, RECENT_SUBMISSIONS_LIMIT).await?;

        Ok(UserStatsResponse {
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            total_submissions,
            problems_solved_count,
            recent_submissions,
        })
    }
}
