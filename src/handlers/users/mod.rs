//! User handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{Router, routing::get};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me/stats", get(handler::get_my_stats))
        .route("/{id}/stats", get(handler::get_user_stats))
}
