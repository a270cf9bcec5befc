//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_AI_BACKOFF_BASE_MS, DEFAULT_AI_BACKOFF_MAX_MS, DEFAULT_AI_BASE_URL,
    DEFAULT_AI_MAX_RETRIES, DEFAULT_AI_MODEL, DEFAULT_AI_TIMEOUT_SECONDS, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRY_HOURS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
    pub bootstrap: BootstrapConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

/// AI provider and gateway policy configuration
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Deadline for a whole gateway operation, retries and backoff included
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

/// Optional administrator account created at startup
#[derive(Debug, Clone, Default)]
pub struct BootstrapConfig {
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            ai: AiConfig::from_env()?,
            bootstrap: BootstrapConfig::from_env(),
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: parse_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
        })
    }
}

impl AiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // Quotes are a common copy-paste artifact around provider keys
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| ConfigError::Missing("GEMINI_API_KEY".to_string()))?
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();

        if api_key.is_empty() {
            return Err(ConfigError::InvalidValue("GEMINI_API_KEY".to_string()));
        }

        let config = Self {
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(parse_var("AI_TIMEOUT_SECONDS", DEFAULT_AI_TIMEOUT_SECONDS)?),
            max_retries: parse_var("AI_MAX_RETRIES", DEFAULT_AI_MAX_RETRIES)?,
            backoff_base: Duration::from_millis(parse_var("AI_BACKOFF_BASE_MS", DEFAULT_AI_BACKOFF_BASE_MS)?),
            backoff_max: Duration::from_millis(parse_var("AI_BACKOFF_MAX_MS", DEFAULT_AI_BACKOFF_MAX_MS)?),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue("AI_TIMEOUT_SECONDS".to_string()));
        }
        if self.backoff_max < self.backoff_base {
            return Err(ConfigError::InvalidValue("AI_BACKOFF_MAX_MS".to_string()));
        }
        Ok(())
    }
}

impl BootstrapConfig {
    fn from_env() -> Self {
        Self {
            admin_username: env::var("BOOTSTRAP_ADMIN_USERNAME").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ai_config() -> AiConfig {
        AiConfig {
            api_key: "key".to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECONDS),
            max_retries: DEFAULT_AI_MAX_RETRIES,
            backoff_base: Duration::from_millis(DEFAULT_AI_BACKOFF_BASE_MS),
            backoff_max: Duration::from_millis(DEFAULT_AI_BACKOFF_MAX_MS),
        }
    }

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
            json_logs: false,
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let value: u32 = parse_var("UZLEETCODE_TEST_SURELY_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_ai_config_validation() {
        assert!(ai_config().validate().is_ok());

        let mut zero_timeout = ai_config();
        zero_timeout.timeout = Duration::ZERO;
        assert!(zero_timeout.validate().is_err());

        let mut inverted_backoff = ai_config();
        inverted_backoff.backoff_max = Duration::from_millis(10);
        assert!(inverted_backoff.validate().is_err());
    }
}
