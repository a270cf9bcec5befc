//! Submission handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::SubmissionService,
    state::AppState,
};

use super::{
    request::{CreateSubmissionRequest, ListSubmissionsQuery, SubmitQuery},
    response::{
        CreateSubmissionResponse, SubmissionResponse, SubmissionsListResponse,
    },
};

/// Submit code for critique.
///
/// By default the response carries the finished critique. With
/// `?wait=false` the submission is acknowledged with `202 Accepted` and
/// judged in the background.
pub async fn create_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<SubmitQuery>,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<Response> {
    payload.validate()?;

    let submission =
        SubmissionService::create_submission(state.db(), &auth_user.id, payload).await?;

    let handle =
        SubmissionService::spawn_judging(state.db().clone(), state.gateway(), submission.id);

    if !query.wait.unwrap_or(true) {
        let response = CreateSubmissionResponse {
            id: submission.id,
            message: "Submission received and queued for review".to_string(),
            status: submission.status,
        };
        return Ok((StatusCode::ACCEPTED, Json(response)).into_response());
    }

    let judged = handle
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Judging task failed: {}", e)))??;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(judged))).into_response())
}

/// List submissions (participants only see their own)
pub async fn list_submissions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListSubmissionsQuery>,
) -> AppResult<Json<SubmissionsListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let user_id = if auth_user.is_admin() {
        query.user_id
    } else {
        Some(auth_user.id)
    };

    let (submissions, total) = SubmissionService::list_submissions(
        state.db(),
        page,
        per_page,
        user_id.as_ref(),
        query.problem_id.as_ref(),
        query.status.as_deref(),
    )
    .await?;

    Ok(Json(SubmissionsListResponse {
        submissions,
        total,
        page,
        per_page,
    }))
}

/// Get a submission with its critique
pub async fn get_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission =
        SubmissionService::get_submission(state.db(), &id, &auth_user.id, auth_user.is_admin())
            .await?;

    Ok(Json(submission.into()))
}

/// Delete a submission
pub async fn delete_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    SubmissionService::delete_submission(state.db(), &id, &auth_user.id, auth_user.is_admin())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
