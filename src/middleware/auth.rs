//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    constants::roles,
    error::{AppError, AppResult},
    services::AuthService,
    state::AppState,
};

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Authenticated user holding the admin role
pub struct AdminUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Administrator role required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(token: &str, secret: &str) -> AppResult<AuthenticatedUser> {
    let claims = AuthService::verify_token(token, secret)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

    Ok(AuthenticatedUser {
        id,
        username: claims.username,
        role: claims.role,
    })
}

/// Authentication middleware (rejects requests without a valid token)
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(token) = bearer_token(request.headers()) else {
        debug!(path = %path, "Auth failed: missing or malformed Authorization header");
        return Err(AppError::Unauthorized);
    };

    let user = authenticate(token, &state.config().jwt.secret).inspect_err(|e| {
        debug!(path = %path, error = %e, "Auth failed: token rejected");
    })?;

    debug!(path = %path, user_id = %user.id, role = %user.role, "User authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no token)
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = bearer_token(request.headers())
        .and_then(|token| authenticate(token, &state.config().jwt.secret).ok());

    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::test_utils::{TEST_JWT_SECRET, create_participant, test_pool};

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[tokio::test]
    async fn test_authenticate_round_trips_claims() {
        let pool = test_pool().await;
        let user = create_participant(&pool, "aziz").await;
        let token = AuthService::generate_token(&user, TEST_JWT_SECRET, 1).unwrap();

        let authed = authenticate(&token, TEST_JWT_SECRET).unwrap();
        assert_eq!(authed.id, user.id);
        assert!(!authed.is_admin());

        assert!(matches!(
            authenticate(&token, "another-secret"),
            Err(AppError::InvalidToken)
        ));
    }
}
