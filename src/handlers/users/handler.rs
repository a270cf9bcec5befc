//! User handler implementations

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::UserService,
    state::AppState,
};

use super::response::UserStatsResponse;

/// Statistics of the calling user
pub async fn get_my_stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserStatsResponse>> {
    let stats = UserService::get_user_stats(state.db(), &auth_user.id).await?;
    Ok(Json(stats))
}

/// Statistics of any user (self or admin)
pub async fn get_user_stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserStatsResponse>> {
    if auth_user.id != id && !auth_user.is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view other users' statistics".to_string(),
        ));
    }

    let stats = UserService::get_user_stats(state.db(), &id).await?;
    Ok(Json(stats))
}
