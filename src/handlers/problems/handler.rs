//! Problem handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppResult,
    middleware::auth::AdminUser,
    services::ProblemService,
    state::AppState,
};

use super::{
    request::{CreateProblemRequest, ListProblemsQuery, UpdateProblemRequest},
    response::{ProblemResponse, ProblemsListResponse},
};

/// List all problems (paginated)
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ListProblemsQuery>,
) -> AppResult<Json<ProblemsListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let (problems, total) = ProblemService::list_problems(
        state.db(),
        page,
        per_page,
        query.search.as_deref(),
        query.difficulty.as_deref(),
        query.tag.as_deref(),
    )
    .await?;

    Ok(Json(ProblemsListResponse {
        problems,
        total,
        page,
        per_page,
    }))
}

/// Create a new problem
pub async fn create_problem(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateProblemRequest>,
) -> AppResult<(StatusCode, Json<ProblemResponse>)> {
    payload.validate()?;

    let problem = ProblemService::create_problem(state.db(), payload).await?;
    debug!(admin_id = %admin.id, problem_id = %problem.id, "Problem created by admin");

    Ok((StatusCode::CREATED, Json(problem)))
}

/// Get a problem by ID or slug, with its Uzbek statement
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> AppResult<Json<ProblemResponse>> {
    let gateway = state.gateway();
    let problem = ProblemService::get_problem(state.db(), &gateway, &id_or_slug).await?;
    Ok(Json(problem))
}

/// Update a problem
pub async fn update_problem(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProblemRequest>,
) -> AppResult<Json<ProblemResponse>> {
    payload.validate()?;

    let gateway = state.gateway();
    let problem = ProblemService::update_problem(state.db(), &gateway, &id, payload).await?;

    Ok(Json(problem))
}

/// Delete a problem
pub async fn delete_problem(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let gateway = state.gateway();
    ProblemService::delete_problem(state.db(), &gateway, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Force a fresh translation of the problem statement
pub async fn translate_problem(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProblemResponse>> {
    let gateway = state.gateway();
    let problem = ProblemService::retranslate(state.db(), &gateway, &id).await?;
    Ok(Json(problem))
}
