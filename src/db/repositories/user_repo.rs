//! User repository

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{error::AppResult, models::User};

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &SqlitePool,
        username: &str,
        email: Option<&str>,
        full_name: Option<&str>,
        password_hash: &str,
        role: &str,
    ) -> AppResult<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, full_name, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: &Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE username = ?1"#)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by username or email (for login)
    pub async fn find_by_identifier(pool: &SqlitePool, identifier: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE username = ?1 OR email = ?1"#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Update user role
    pub async fn update_role(pool: &SqlitePool, id: &Uuid, role: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Count total users
    pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM users"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::roles, error::AppError, test_utils::test_pool};

    #[tokio::test]
    async fn test_create_and_find_by_identifier() {
        let pool = test_pool().await;
        let user = UserRepository::create(
            &pool,
            "alisher",
            Some("alisher@example.com"),
            Some("Alisher Navoiy"),
            "hash",
            roles::PARTICIPANT,
        )
        .await
        .unwrap();

        let by_name = UserRepository::find_by_identifier(&pool, "alisher").await.unwrap();
        let by_email = UserRepository::find_by_identifier(&pool, "alisher@example.com")
            .await
            .unwrap();

        assert_eq!(by_name.map(|u| u.id), Some(user.id));
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        assert_eq!(UserRepository::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_already_exists() {
        let pool = test_pool().await;
        UserRepository::create(&pool, "bobur", None, None, "hash", roles::PARTICIPANT)
            .await
            .unwrap();

        let err = UserRepository::create(&pool, "bobur", None, None, "hash", roles::PARTICIPANT)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_update_role() {
        let pool = test_pool().await;
        let user = UserRepository::create(&pool, "zarina", None, None, "hash", roles::PARTICIPANT)
            .await
            .unwrap();

        let promoted = UserRepository::update_role(&pool, &user.id, roles::ADMIN).await.unwrap();
        assert!(promoted.is_admin());
    }
}
