//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{ai::AiGateway, config::Config};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: SqlitePool,

    /// Translation/critique gateway, shared with detached judging tasks
    pub gateway: Arc<AiGateway>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: SqlitePool, gateway: Arc<AiGateway>, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db, gateway, config }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get a handle to the AI gateway
    pub fn gateway(&self) -> Arc<AiGateway> {
        Arc::clone(&self.inner.gateway)
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
