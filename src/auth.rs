use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::handlers::ErrorResponse;
use crate::models::{Claims, User};
use crate::AppState;

/// Extractor that validates JWT and provides the authenticated user's claims.
///
/// Add `auth: AuthUser` to a handler's parameters to require authentication;
/// `auth.user_id` scopes history queries to the caller.
pub struct AuthUser {
    pub user_id: i64,
    pub claims: Claims,
}

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = decode_token(token, &state.config.jwt_secret)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser { user_id, claims })
    }
}

/// Sign a token for `user` valid for `ttl_hours`
pub fn issue_token(user: &User, secret: &str, ttl_hours: i64) -> jsonwebtoken::errors::Result<String> {
    let now = chrono::Utc::now();
    let exp = now + chrono::TimeDelta::hours(ttl_hours);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
        &jsonwebtoken::Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: 7,
            name: "Tech".into(),
            email: "tech@example.com".into(),
            password_hash: String::new(),
            role: "technician".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(&user(), "secret", 24).unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.email, "tech@example.com");
        assert_eq!(claims.role, "technician");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_wrong_secret() {
        let token = issue_token(&user(), "secret", 24).unwrap();
        assert_eq!(decode_token(&token, "other").unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_token_expired() {
        let token = issue_token(&user(), "secret", -2).unwrap();
        assert_eq!(decode_token(&token, "secret").unwrap_err(), AuthError::InvalidToken);
    }
}
