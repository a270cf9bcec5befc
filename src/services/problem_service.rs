//! Problem service

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    ai::AiGateway,
    db::repositories::{ProblemRepository, SubmissionRepository},
    error::{AppError, AppResult},
    handlers::problems::{
        request::{CreateProblemRequest, UpdateProblemRequest},
        response::{ProblemResponse, ProblemSummary},
    },
    models::Problem,
    utils::{
        hash_string, normalize_tags, sanitize_string, slugify, validate_difficulty, validate_slug,
    },
};

/// Problem service for business logic
pub struct ProblemService;

impl ProblemService {
    /// Create a new problem
    pub async fn create_problem(
        pool: &SqlitePool,
        payload: CreateProblemRequest,
    ) -> AppResult<ProblemResponse> {
        let title = sanitize_string(&payload.title);
        if title.is_empty() {
            return Err(AppError::Validation("Problem title cannot be empty".to_string()));
        }
        if payload.statement.trim().is_empty() {
            return Err(AppError::Validation("Problem statement cannot be empty".to_string()));
        }

        let difficulty = payload.difficulty.to_ascii_lowercase();
        validate_difficulty(&difficulty).map_err(|e| AppError::Validation(e.to_string()))?;

        let slug = match payload.slug {
            Some(slug) => slug,
            None => slugify(&title),
        };
        validate_slug(&slug).map_err(|e| AppError::Validation(e.to_string()))?;

        let tags = normalize_tags(&payload.tags.unwrap_or_default());

        let problem = ProblemRepository::create(
            pool,
            &slug,
            &title,
            &payload.statement,
            &hash_string(&payload.statement),
            &difficulty,
            &tags,
            payload.default_code.as_deref(),
        )
        .await
        .map_err(|e| match e {
            AppError::AlreadyExists(_) => {
                AppError::AlreadyExists(format!("Problem with slug '{}' already exists", slug))
            }
            other => other,
        })?;

        info!(problem_id = %problem.id, slug = %problem.slug, "Problem created");
        Ok(problem.into())
    }

    /// Get a problem by ID or slug, translating it on first view.
    ///
    /// A failed translation degrades to the original statement with
    /// `translation_error` set.
    pub async fn get_problem(
        pool: &SqlitePool,
        gateway: &AiGateway,
        id_or_slug: &str,
    ) -> AppResult<ProblemResponse> {
        let problem = Self::find_problem(pool, id_or_slug).await?;

        if problem.is_translated() {
            return Ok(problem.into());
        }

        match Self::translate_and_store(pool, gateway, &problem).await {
            Ok(translated) => {
                let mut response = ProblemResponse::from(problem);
                response.translated_at = Some(translated.1);
                response.translated_statement = Some(translated.0);
                Ok(response)
            }
            Err(err) => {
                warn!(problem_id = %problem.id, error = %err, "Serving problem without translation");
                let mut response = ProblemResponse::from(problem);
                response.translation_error = Some(err.to_string());
                Ok(response)
            }
        }
    }

    /// Translate the current statement again, replacing the stored
    /// translation only once the new one exists
    pub async fn retranslate(
        pool: &SqlitePool,
        gateway: &AiGateway,
        id: &Uuid,
    ) -> AppResult<ProblemResponse> {
        let problem = ProblemRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        gateway.invalidate(&problem.id).await;

        let (text, translated_at) = Self::translate_and_store(pool, gateway, &problem).await?;

        let mut response = ProblemResponse::from(problem);
        response.translated_statement = Some(text);
        response.translated_at = Some(translated_at);
        Ok(response)
    }

    /// Update problem
    pub async fn update_problem(
        pool: &SqlitePool,
        gateway: &AiGateway,
        id: &Uuid,
        payload: UpdateProblemRequest,
    ) -> AppResult<ProblemResponse> {
        let title = payload.title.as_deref().map(sanitize_string);
        if title.as_deref().is_some_and(str::is_empty) {
            return Err(AppError::Validation("Problem title cannot be empty".to_string()));
        }
        if payload.statement.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(AppError::Validation("Problem statement cannot be empty".to_string()));
        }

        let difficulty = payload.difficulty.as_deref().map(str::to_ascii_lowercase);
        if let Some(difficulty) = difficulty.as_deref() {
            validate_difficulty(difficulty).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        if let Some(slug) = payload.slug.as_deref() {
            validate_slug(slug).map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let digest = payload.statement.as_deref().map(hash_string);
        let tags = payload.tags.as_deref().map(normalize_tags);

        let problem = ProblemRepository::update(
            pool,
            id,
            payload.slug.as_deref(),
            title.as_deref(),
            payload.statement.as_deref(),
            digest.as_deref(),
            difficulty.as_deref(),
            tags.as_deref(),
            payload.default_code.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        if !problem.is_translated() {
            gateway.invalidate(&problem.id).await;
        }

        info!(problem_id = %problem.id, statement_changed = digest.is_some(), "Problem updated");
        Ok(problem.into())
    }

    /// Delete a problem that no submission references
    pub async fn delete_problem(
        pool: &SqlitePool,
        gateway: &AiGateway,
        id: &Uuid,
    ) -> AppResult<()> {
        if ProblemRepository::find_by_id(pool, id).await?.is_none() {
            return Err(AppError::NotFound("Problem not found".to_string()));
        }

        let submissions = SubmissionRepository::count_by_problem(pool, id).await?;
        if submissions > 0 {
            return Err(AppError::Conflict(format!(
                "Problem has {} submission(s) and cannot be deleted",
                submissions
            )));
        }

        if !ProblemRepository::delete(pool, id).await? {
            return Err(AppError::NotFound("Problem not found".to_string()));
        }
        gateway.invalidate(id).await;

        info!(problem_id = %id, "Problem deleted");
        Ok(())
    }

    /// List problems with pagination
    pub async fn list_problems(
        pool: &SqlitePool,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        difficulty: Option<&str>,
        tag: Option<&str>,
    ) -> AppResult<(Vec<ProblemSummary>, i64)> {
        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let difficulty = difficulty.map(str::to_ascii_lowercase);
        let tag = tag.map(str::to_lowercase);

        let (problems, total) = ProblemRepository::list(
            pool,
            offset,
            per_page as i64,
            difficulty.as_deref(),
            tag.as_deref(),
            search,
        )
        .await?;

        Ok((problems.into_iter().map(ProblemSummary::from).collect(), total))
    }

    /// Resolve a path segment that is either a UUID or a slug
    pub async fn find_problem(pool: &SqlitePool, id_or_slug: &str) -> AppResult<Problem> {
        let problem = match Uuid::parse_str(id_or_slug) {
            Ok(id) => ProblemRepository::find_by_id(pool, &id).await?,
            Err(_) => ProblemRepository::find_by_slug(pool, id_or_slug).await?,
        };

        problem.ok_or_else(|| AppError::NotFound("Problem not found".to_string()))
    }

    /// Translate the problem's current statement and persist the result.
    ///
    /// The gateway call holds no connection; the write is guarded by the
    /// statement digest so a concurrent edit is never overwritten with a
    /// translation of the old text.
    async fn translate_and_store(
        pool: &SqlitePool,
        gateway: &AiGateway,
        problem: &Problem,
    ) -> AppResult<(String, chrono::DateTime<Utc>)> {
        let translated = gateway
            .translate_problem(problem.id, &problem.statement)
            .await?;

        let translated_at = Utc::now();
        let stored = ProblemRepository::set_translation(
            pool,
            &problem.id,
            &problem.statement_digest,
            &translated,
            translated_at,
        )
        .await?;

        if stored {
            debug!(problem_id = %problem.id, "Stored translation");
        } else {
            debug!(problem_id = %problem.id, "Statement changed during translation, result not stored");
        }

        Ok((translated, translated_at))
    }
}
