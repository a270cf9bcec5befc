//! Admin handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(handler::get_system_stats))
}
