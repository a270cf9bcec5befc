//! Admin handler implementations

use axum::{Json, extract::State};

use crate::{
    error::AppResult, middleware::auth::AdminUser, services::AdminService, state::AppState,
};

use super::response::AdminStatsResponse;

/// Get system statistics
pub async fn get_system_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<AdminStatsResponse>> {
    let stats = AdminService::get_system_stats(state.db()).await?;
    Ok(Json(stats))
}
