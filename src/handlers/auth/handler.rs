//! Authentication handler implementations

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::AuthService,
    state::AppState,
    utils::{sanitize_string, validate_username},
};

use super::{
    request::{LoginRequest, RegisterRequest},
    response::{AuthResponse, CurrentUserResponse, RegisterResponse},
};

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.validate()?;
    validate_username(&payload.username).map_err(|e| AppError::Validation(e.to_string()))?;

    let full_name = payload
        .full_name
        .as_deref()
        .map(sanitize_string)
        .filter(|n| !n.is_empty());

    let user = AuthService::register(
        state.db(),
        &payload.username,
        payload.email.as_deref(),
        &payload.password,
        full_name.as_deref(),
    )
    .await?;

    let response = RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username/email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (user, access_token, expires_in) = AuthService::login(
        state.db(),
        state.config(),
        &payload.identifier,
        &payload.password,
    )
    .await?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in,
        user: user.into(),
    }))
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let user = AuthService::get_user_by_id(state.db(), &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}
