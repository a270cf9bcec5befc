//! Health check and project information handlers

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Project information response
#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub project_name: String,
    pub description: String,
    pub version: String,
    pub copyright: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn about() -> Json<AboutResponse> {
    Json(AboutResponse {
        project_name: "UzLeetCode AI Judge".to_string(),
        description: "Coding practice platform with Uzbek problem statements and \
                      AI-generated code critique"
            .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        copyright: "All rights reserved UzLeetCode 2025".to_string(),
    })
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/about", get(about))
}
