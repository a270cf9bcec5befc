//! Submission repository

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    ai::Critique,
    constants::{statuses, verdicts},
    error::AppResult,
    models::Submission,
};

/// Repository for submission database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Create a new pending submission
    pub async fn create(
        pool: &SqlitePool,
        user_id: &Uuid,
        problem_id: &Uuid,
        language: &str,
        source_code: &str,
    ) -> AppResult<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (id, user_id, problem_id, language, source_code, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(problem_id)
        .bind(language)
        .bind(source_code)
        .bind(statuses::PENDING)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(submission)
    }

    /// Find submission by ID
    pub async fn find_by_id(pool: &SqlitePool, id: &Uuid) -> AppResult<Option<Submission>> {
        let submission =
            sqlx::query_as::<_, Submission>(r#"SELECT * FROM submissions WHERE id = ?1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(submission)
    }

    /// Move a pending submission to `completed` with its critique.
    ///
    /// Returns `None` when the submission is missing or no longer pending.
    pub async fn complete(
        pool: &SqlitePool,
        id: &Uuid,
        critique: &Critique,
    ) -> AppResult<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET
                status = ?2,
                verdict = ?3,
                critique = ?4,
                time_complexity = ?5,
                space_complexity = ?6,
                judged_at = ?7
            WHERE id = ?1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(statuses::COMPLETED)
        .bind(critique.verdict.as_str())
        .bind(&critique.critique)
        .bind(&critique.time_complexity)
        .bind(&critique.space_complexity)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(submission)
    }

    /// Move a pending submission to `failed` with a reason.
    ///
    /// Returns `None` when the submission is missing or no longer pending.
    pub async fn fail(
        pool: &SqlitePool,
        id: &Uuid,
        failure_reason: &str,
    ) -> AppResult<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET status = ?2, failure_reason = ?3, judged_at = ?4
            WHERE id = ?1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(statuses::FAILED)
        .bind(failure_reason)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(submission)
    }

    /// Delete submission
    pub async fn delete(pool: &SqlitePool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM submissions WHERE id = ?1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List submissions with pagination and filters
    pub async fn list(
        pool: &SqlitePool,
        offset: i64,
        limit: i64,
        user_id: Option<&Uuid>,
        problem_id: Option<&Uuid>,
        status: Option<&str>,
    ) -> AppResult<(Vec<Submission>, i64)> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE
                (?1 IS NULL OR user_id = ?1)
                AND (?2 IS NULL OR problem_id = ?2)
                AND (?3 IS NULL OR status = ?3)
            ORDER BY created_at DESC
            LIMIT ?4 OFFSET ?5
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM submissions
            WHERE
                (?1 IS NULL OR user_id = ?1)
                AND (?2 IS NULL OR problem_id = ?2)
                AND (?3 IS NULL OR status = ?3)
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok((submissions, count))
    }

    /// Get pending submissions, oldest first
    pub async fn get_pending(pool: &SqlitePool) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"SELECT * FROM submissions WHERE status = 'pending' ORDER BY created_at"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }

    /// Recent submissions of a user joined with the problem title
    pub async fn recent_for_user(
        pool: &SqlitePool,
        user_id: &Uuid,
        limit: i64,
    ) -> AppResult<Vec<RecentSubmissionRow>> {
        let rows = sqlx::query_as::<_, RecentSubmissionRow>(
            r#"
            SELECT s.id, s.problem_id, p.slug AS problem_slug, p.title AS problem_title,
                   s.language, s.status, s.verdict, s.created_at
            FROM submissions s
            JOIN problems p ON p.id = s.problem_id
            WHERE s.user_id = ?1
            ORDER BY s.created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Count total submissions
    pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM submissions"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Count submissions by user
    pub async fn count_by_user(pool: &SqlitePool, user_id: &Uuid) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM submissions WHERE user_id = ?1"#)
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Count submissions referencing a problem
    pub async fn count_by_problem(pool: &SqlitePool, problem_id: &Uuid) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM submissions WHERE problem_id = ?1"#)
                .bind(problem_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Count submissions by status
    pub async fn count_by_status(pool: &SqlitePool, status: &str) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM submissions WHERE status = ?1"#)
                .bind(status)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Distinct problems a user has solved
    pub async fn count_solved_by_user(pool: &SqlitePool, user_id: &Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT problem_id) FROM submissions
            WHERE user_id = ?1 AND status = 'completed' AND verdict = ?2
            "#,
        )
        .bind(user_id)
        .bind(verdicts::CORRECT)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Distinct problems solved by anyone, per difficulty
    pub async fn count_solved_by_difficulty(pool: &SqlitePool) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT p.difficulty, COUNT(DISTINCT s.problem_id)
            FROM submissions s
            JOIN problems p ON p.id = s.problem_id
            WHERE s.status = 'completed' AND s.verdict = ?1
            GROUP BY p.difficulty
            "#,
        )
        .bind(verdicts::CORRECT)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// Submission summary row used in account statistics
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct RecentSubmissionRow {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub problem_slug: String,
    pub problem_title: String,
    pub language: String,
    pub status: String,
    pub verdict: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
}
