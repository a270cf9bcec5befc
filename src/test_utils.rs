//! Shared fixtures for unit and router tests

use std::{
    collections::VecDeque,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{
    ai::{AiGateway, AiProvider, GatewayError, GenerationRequest, ResponseFormat, RetryPolicy},
    config::{AiConfig, BootstrapConfig, Config, DatabaseConfig, JwtConfig, ServerConfig},
    constants::{difficulties, roles},
    db::{
        repositories::{ProblemRepository, UserRepository},
        run_migrations,
    },
    models::{Problem, User},
    services::AuthService,
    state::AppState,
    utils::hash_string,
};

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

pub const CORRECT_CRITIQUE: &str = r#"{"verdict":"correct","time_complexity":"O(n)","space_complexity":"O(n)","critique":"Yechim to'g'ri va samarali."}"#;

/// Fresh in-memory database with migrations applied.
///
/// A single connection that never expires keeps the in-memory database alive
/// for the whole test.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}

/// Gateway policy with millisecond backoff so retry tests run on real time
pub fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_secs(5),
        max_retries,
        backoff_base: Duration::from_millis(1),
        backoff_max: Duration::from_millis(5),
    }
}

/// Provider replaying a script of results, then a fallback, counting calls
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    fallback: Result<String, GatewayError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(fallback: Result<String, GatewayError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Translation replies echo the prompt tail prefixed with `uz:`;
    /// critique replies are a correct verdict
    pub fn echo() -> Self {
        Self::new(Ok(String::new()))
    }

    pub fn then(self, result: Result<String, GatewayError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(result) => result,
            None => match (&self.fallback, request.format) {
                (Ok(reply), _) if !reply.is_empty() => Ok(reply.clone()),
                (Ok(_), ResponseFormat::Text) => {
                    let source = request.prompt.rsplit("\n\n").next().unwrap_or_default();
                    Ok(format!("uz:{source}"))
                }
                (Ok(_), ResponseFormat::CritiqueJson) => Ok(CORRECT_CRITIQUE.to_string()),
                (Err(err), _) => Err(err.clone()),
            },
        }
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            json_logs: false,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_hours: 1,
        },
        ai: AiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
            backoff_base: Duration::from_millis(1),
            backoff_max: Duration::from_millis(5),
        },
        bootstrap: BootstrapConfig::default(),
    }
}

pub fn test_gateway(provider: Arc<dyn AiProvider>, max_retries: u32) -> Arc<AiGateway> {
    Arc::new(AiGateway::new(provider, fast_policy(max_retries)))
}

pub async fn test_state(provider: Arc<dyn AiProvider>) -> AppState {
    AppState::new(test_pool().await, test_gateway(provider, 3), test_config())
}

pub async fn create_user(pool: &SqlitePool, username: &str, role: &str) -> User {
    let password_hash = AuthService::hash_password("Password123").unwrap();
    UserRepository::create(
        pool,
        username,
        Some(&format!("{username}@example.com")),
        None,
        &password_hash,
        role,
    )
    .await
    .unwrap()
}

pub async fn create_participant(pool: &SqlitePool, username: &str) -> User {
    create_user(pool, username, roles::PARTICIPANT).await
}

pub async fn create_problem(pool: &SqlitePool, slug: &str, statement: &str) -> Problem {
    create_problem_with_difficulty(pool, slug, statement, difficulties::EASY).await
}

pub async fn create_problem_with_difficulty(
    pool: &SqlitePool,
    slug: &str,
    statement: &str,
    difficulty: &str,
) -> Problem {
    ProblemRepository::create(
        pool,
        slug,
        &slug.replace('-', " "),
        statement,
        &hash_string(statement),
        difficulty,
        &["array".to_string()],
        None,
    )
    .await
    .unwrap()
}

/// Bearer header value for a user
pub fn bearer(user: &User) -> String {
    let token = AuthService::generate_token(user, TEST_JWT_SECRET, 1).unwrap();
    format!("Bearer {token}")
}
