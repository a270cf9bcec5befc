//! UzLeetCode - Coding Practice with Uzbek Statements and AI Critique
//!
//! This library provides the core functionality for the UzLeetCode platform:
//! problem statements are served in Uzbek, translated on first view by a
//! generative AI provider, and submitted code is critiqued by the same
//! provider instead of being executed.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **AI**: Gateway with retry, timeout, and translation caching in front
//!   of the provider client
//! - **Models**: Domain models

pub mod ai;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

use axum::{Router, middleware as axum_middleware};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

use crate::{
    constants::{API_BASE_PATH, MAX_REQUEST_BODY_SIZE},
    middleware::{logging_middleware, optional_auth_middleware},
};

/// Build the application router with all middleware layers applied
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_SIZE))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
