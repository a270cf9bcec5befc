//! Authentication service

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::{BootstrapConfig, Config},
    constants::roles,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new participant
    pub async fn register(
        pool: &SqlitePool,
        username: &str,
        email: Option<&str>,
        password: &str,
        full_name: Option<&str>,
    ) -> AppResult<User> {
        if UserRepository::find_by_username(pool, username).await?.is_some() {
            return Err(AppError::AlreadyExists("Username already taken".to_string()));
        }

        if let Some(email) = email {
            if UserRepository::find_by_identifier(pool, email).await?.is_some() {
                return Err(AppError::AlreadyExists("Email already registered".to_string()));
            }
        }

        let password_hash = Self::hash_password(password)?;

        let user = UserRepository::create(
            pool,
            username,
            email,
            full_name,
            &password_hash,
            roles::PARTICIPANT,
        )
        .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Login with username/email and password
    pub async fn login(
        pool: &SqlitePool,
        config: &Config,
        identifier: &str,
        password: &str,
    ) -> AppResult<(User, String, i64)> {
        let user = UserRepository::find_by_identifier(pool, identifier)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = Self::generate_token(&user, &config.jwt.secret, config.jwt.expiry_hours)?;
        let expires_in = config.jwt.expiry_hours * 3600;

        Ok((user, token, expires_in))
    }

    /// Create the configured administrator, or promote an existing account
    /// with that username. No-op when bootstrap credentials are absent.
    pub async fn ensure_bootstrap_admin(
        pool: &SqlitePool,
        bootstrap: &BootstrapConfig,
    ) -> AppResult<Option<User>> {
        let (Some(username), Some(password)) =
            (bootstrap.admin_username.as_deref(), bootstrap.admin_password.as_deref())
        else {
            return Ok(None);
        };

        if let Some(existing) = UserRepository::find_by_username(pool, username).await? {
            if existing.is_admin() {
                return Ok(Some(existing));
            }
            let promoted = UserRepository::update_role(pool, &existing.id, roles::ADMIN).await?;
            info!(user_id = %promoted.id, "Promoted bootstrap account to admin");
            return Ok(Some(promoted));
        }

        let password_hash = Self::hash_password(password)?;
        let admin =
            UserRepository::create(pool, username, None, None, &password_hash, roles::ADMIN).await?;

        info!(user_id = %admin.id, username = %admin.username, "Created bootstrap admin");
        Ok(Some(admin))
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &SqlitePool, user_id: &Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(pool, user_id).await
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate an HS256 access token
    pub fn generate_token(user: &User, secret: &str, expiry_hours: i64) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_JWT_SECRET, test_config, test_pool};

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = test_pool().await;
        let config = test_config();

        let user = AuthService::register(&pool, "nodira", Some("nodira@example.com"), "Password123", None)
            .await
            .unwrap();
        assert_eq!(user.role, roles::PARTICIPANT);
        assert_ne!(user.password_hash, "Password123");

        let (logged_in, token, expires_in) =
            AuthService::login(&pool, &config, "nodira@example.com", "Password123")
                .await
                .unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(expires_in, 3600);

        let claims = AuthService::verify_token(&token, TEST_JWT_SECRET).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, roles::PARTICIPANT);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let pool = test_pool().await;
        AuthService::register(&pool, "nodira", None, "Password123", None).await.unwrap();

        let err = AuthService::login(&pool, &test_config(), "nodira", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let pool = test_pool().await;
        AuthService::register(&pool, "nodira", Some("n@example.com"), "Password123", None)
            .await
            .unwrap();

        let same_name = AuthService::register(&pool, "nodira", None, "Password123", None).await;
        let same_email =
            AuthService::register(&pool, "other", Some("n@example.com"), "Password123", None).await;

        assert!(matches!(same_name, Err(AppError::AlreadyExists(_))));
        assert!(matches!(same_email, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_created_once() {
        let pool = test_pool().await;
        let bootstrap = BootstrapConfig {
            admin_username: Some("root".to_string()),
            admin_password: Some("Password123".to_string()),
        };

        let first = AuthService::ensure_bootstrap_admin(&pool, &bootstrap).await.unwrap().unwrap();
        let second = AuthService::ensure_bootstrap_admin(&pool, &bootstrap).await.unwrap().unwrap();

        assert!(first.is_admin());
        assert_eq!(first.id, second.id);
        assert!(AuthService::ensure_bootstrap_admin(&pool, &BootstrapConfig::default())
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        assert!(matches!(
            AuthService::verify_token("not.a.token", TEST_JWT_SECRET),
            Err(AppError::InvalidToken)
        ));
    }
}
