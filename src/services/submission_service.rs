//! Submission service
//!
//! Submissions are persisted as `pending` and judged by a detached task that
//! asks the AI gateway for a critique, then moves the row to `completed` or
//! `failed` exactly once.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    ai::AiGateway,
    db::repositories::{ProblemRepository, SubmissionRepository},
    error::{AppError, AppResult},
    handlers::submissions::{request::CreateSubmissionRequest, response::SubmissionSummary},
    models::{Submission, SubmissionStatus},
    services::ProblemService,
    utils::{validate_language, validate_source_code},
};

/// Submission service for business logic
pub struct SubmissionService;

impl SubmissionService {
    /// Validate and persist a new pending submission
    pub async fn create_submission(
        pool: &SqlitePool,
        user_id: &Uuid,
        payload: CreateSubmissionRequest,
    ) -> AppResult<Submission> {
        let language = payload.language.to_ascii_lowercase();
        validate_language(&language).map_err(|e| {
            AppError::Validation(format!("{}: {}", e, payload.language))
        })?;
        validate_source_code(&payload.source_code)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let problem = ProblemService::find_problem(pool, &payload.problem_id).await?;

        let submission = SubmissionRepository::create(
            pool,
            user_id,
            &problem.id,
            &language,
            &payload.source_code,
        )
        .await?;

        info!(
            submission_id = %submission.id,
            user_id = %user_id,
            problem_id = %problem.id,
            language = %language,
            "Submission received"
        );
        Ok(submission)
    }

    /// Judge a submission on a detached task.
    ///
    /// Dropping the returned handle does not cancel judging.
    pub fn spawn_judging(
        pool: SqlitePool,
        gateway: Arc<AiGateway>,
        submission_id: Uuid,
    ) -> JoinHandle<AppResult<Submission>> {
        tokio::spawn(async move { Self::judge(&pool, &gateway, &submission_id).await })
    }

    /// Ask the gateway for a critique and record the outcome.
    ///
    /// Gateway failures are recorded on the submission, not returned; the
    /// error path is only taken for store failures.
    pub async fn judge(
        pool: &SqlitePool,
        gateway: &AiGateway,
        submission_id: &Uuid,
    ) -> AppResult<Submission> {
        let submission = SubmissionRepository::find_by_id(pool, submission_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        if submission.status() != Some(SubmissionStatus::Pending) {
            return Ok(submission);
        }

        let problem = ProblemRepository::find_by_id(pool, &submission.problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        let outcome = gateway
            .critique(&problem.statement, &submission.source_code, &submission.language)
            .await;

        let transitioned = match outcome {
            Ok(critique) => {
                info!(
                    submission_id = %submission.id,
                    verdict = %critique.verdict,
                    "Submission judged"
                );
                SubmissionRepository::complete(pool, &submission.id, &critique).await?
            }
            Err(err) => {
                warn!(submission_id = %submission.id, error = %err, "Submission judging failed");
                SubmissionRepository::fail(pool, &submission.id, &err.failure_reason()).await?
            }
        };

        match transitioned {
            Some(judged) => Ok(judged),
            // Another task finished it first; report what is stored
            None => SubmissionRepository::find_by_id(pool, &submission.id)
                .await?
                .ok_or_else(|| AppError::NotFound("Submission not found".to_string())),
        }
    }

    /// Re-spawn judging for submissions left pending by a previous run
    pub async fn resume_pending(pool: &SqlitePool, gateway: Arc<AiGateway>) -> AppResult<usize> {
        let pending = SubmissionRepository::get_pending(pool).await?;
        let count = pending.len();

        for submission in pending {
            let handle = Self::spawn_judging(pool.clone(), Arc::clone(&gateway), submission.id);
            tokio::spawn(async move {
                match handle.await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => error!(submission_id = %submission.id, error = %e, "Resumed judging failed"),
                    Err(e) => error!(submission_id = %submission.id, error = %e, "Resumed judging task panicked"),
                }
            });
        }

        if count > 0 {
            info!(count, "Resumed judging of pending submissions");
        }
        Ok(count)
    }

    /// Get a submission visible to the requester
    pub async fn get_submission(
        pool: &SqlitePool,
        id: &Uuid,
        requester_id: &Uuid,
        is_admin: bool,
    ) -> AppResult<Submission> {
        let submission = SubmissionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        if submission.user_id != *requester_id && !is_admin {
            return Err(AppError::Forbidden(
                "Cannot view other users' submissions".to_string(),
            ));
        }

        Ok(submission)
    }

    /// Delete a submission owned by the requester (or any, for admins)
    pub async fn delete_submission(
        pool: &SqlitePool,
        id: &Uuid,
        requester_id: &Uuid,
        is_admin: bool,
    ) -> AppResult<()> {
        let submission = SubmissionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        if submission.user_id != *requester_id && !is_admin {
            return Err(AppError::Forbidden(
                "Cannot delete other users' submissions".to_string(),
            ));
        }

        SubmissionRepository::delete(pool, id).await?;
        info!(submission_id = %id, "Submission deleted");
        Ok(())
    }

    /// List submissions with pagination
    pub async fn list_submissions(
        pool: &SqlitePool,
        page: u32,
        per_page: u32,
        user_id: Option<&Uuid>,
        problem_id: Option<&Uuid>,
        status: Option<&str>,
    ) -> AppResult<(Vec<SubmissionSummary>, i64)> {
        if let Some(status) = status {
            if SubmissionStatus::from_str(status).is_none() {
                return Err(AppError::Validation(format!("Unknown status: {}", status)));
            }
        }

        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let (submissions, total) =
            SubmissionRepository::list(pool, offset, per_page as i64, user_id, problem_id, status)
                .await?;

        Ok((
            submissions.into_iter().map(SubmissionSummary::from).collect(),
            total,
        ))
    }
}
