//! UzLeetCode - Application Entry Point
//!
//! This is the main entry point for the UzLeetCode server.

use std::{net::SocketAddr, sync::Arc};

use tokio::{net::TcpListener, signal};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use uzleetcode::{
    ai::{AiGateway, GeminiClient, RetryPolicy},
    config::CONFIG,
    create_router, db,
    services::{AuthService, SubmissionService},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&CONFIG.server.rust_log));
    let registry = tracing_subscriber::registry().with(filter);
    if CONFIG.server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting UzLeetCode server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;
    db::test_connection(&db_pool).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    if let Some(admin) = AuthService::ensure_bootstrap_admin(&db_pool, &CONFIG.bootstrap).await? {
        tracing::info!(username = %admin.username, "Bootstrap admin ready");
    }

    // Initialize AI gateway
    let client = GeminiClient::new(&CONFIG.ai)?;
    let gateway = Arc::new(AiGateway::new(
        Arc::new(client),
        RetryPolicy::from_config(&CONFIG.ai),
    ));
    tracing::info!(
        model = %CONFIG.ai.model,
        timeout_secs = CONFIG.ai.timeout.as_secs(),
        max_retries = CONFIG.ai.max_retries,
        "AI gateway configured"
    );

    SubmissionService::resume_pending(&db_pool, Arc::clone(&gateway)).await?;

    // Create application state
    let state = AppState::new(db_pool, gateway, CONFIG.clone());
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
