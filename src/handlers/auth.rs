use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::auth::{issue_token, AuthUser};
use crate::models::{user_role, LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use crate::AppState;

use super::{created, ApiError, MessageResponse};

/// POST /api/users/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("name, email and password are required"));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("email is not valid"));
    }
    if !user_role::is_valid(&req.role) {
        return Err(ApiError::bad_request(format!(
            "role must be one of: {}",
            user_role::ALL.join(", ")
        )));
    }
    if state.store.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("Email is already registered"));
    }

    let password_hash = bcrypt::hash(&req.password, state.config.bcrypt_cost)
        .map_err(|e| ApiError::internal(format!("password hashing error: {}", e)))?;

    let user = state
        .store
        .create_user(name, &email, &password_hash, &req.role)
        .await?;
    tracing::info!("Registered user {} ({})", user.id, user.role);

    let body = MessageResponse::new("Registration successful");
    Ok(created(body.0))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let user = state
        .store
        .get_user_by_email(&req.email.trim().to_lowercase())
        .await
        .map_err(|_| ApiError::internal("database error"))?
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    let valid = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|_| ApiError::internal("password verification error"))?;

    if !valid {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)
        .map_err(|e| ApiError::internal(format!("token generation error: {}", e)))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

/// GET /api/users/me
pub async fn me(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state
        .store
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}
