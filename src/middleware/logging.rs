//! Request logging middleware

use std::time::{Duration, Instant};

use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::{debug, info, warn};

/// Requests slower than this are logged at warn level
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(30);

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    let duration_ms = format!("{:.2}", elapsed.as_secs_f64() * 1000.0);

    if response.status().is_server_error() {
        warn!(%method, %path, status, %duration_ms, "Request completed with server error");
    } else if response.status().is_client_error() && response.status() != StatusCode::NOT_FOUND {
        warn!(%method, %path, status, %duration_ms, "Request completed with client error");
    } else if elapsed > SLOW_REQUEST_THRESHOLD {
        warn!(%method, %path, status, %duration_ms, "Slow request");
    } else if path.ends_with("/health") {
        debug!(%method, %path, status, %duration_ms, "Request completed");
    } else {
        info!(%method, %path, status, %duration_ms, "Request completed");
    }

    response
}
