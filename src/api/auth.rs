use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{validate_nonempty, validate_password, validate_username};
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::db::User;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i32,
    pub username: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
}

// ============================================================================
// Authentication
// ============================================================================

/// Resolve the caller to a user, checking:
/// 1. Session cookie (from login, used by the web UI)
/// 2. `Authorization: Bearer <token>` header
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    session: &Session,
) -> Result<User, ApiError> {
    if let Ok(Some(username)) = session.get::<String>("user").await
        && let Ok(Some(user)) = state.store().get_user_by_username(&username).await
    {
        return Ok(user);
    }

    if let Some(token) = extract_bearer_token(headers)
        && let Ok(Some(user)) = state.store().verify_session_token(&token).await
    {
        return Ok(user);
    }

    Err(ApiError::Unauthorized(
        "Invalid or missing authentication".to_string(),
    ))
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
/// Create a new user account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>, ApiError> {
    let username = validate_username(&payload.username)?;
    let email = validate_nonempty(&payload.email, "Email")?;
    let password = validate_password(&payload.password)?;

    let existing = state
        .store()
        .get_user_by_username(username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to check username: {e}")))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let security = state.config().read().await.security.clone();

    let user = state
        .store()
        .create_user(username, email, password, &security)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create user: {e}")))?;

    tracing::info!("Registered user: {}", user.username);

    Ok(Json(ApiResponse::success(RegisterResponse {
        id: user.id,
        username: user.username,
    })))
}

/// POST /login
/// Authenticate with username and password, returns an expiring bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let is_valid = state
        .store()
        .verify_user_password(&payload.username, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user = state
        .store()
        .get_user_by_username(&payload.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    // Expired tokens accumulate silently otherwise
    if let Err(e) = state.store().prune_expired_sessions().await {
        tracing::warn!("Failed to prune expired sessions: {}", e);
    }

    let ttl_hours = state.config().read().await.security.session_ttl_hours;

    let issued = state
        .store()
        .create_session(user.id, ttl_hours)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    if let Err(e) = session.insert("user", &user.username).await {
        return Err(ApiError::internal(format!(
            "Failed to create cookie session: {e}"
        )));
    }

    Ok(Json(ApiResponse::success(LoginResponse {
        username: user.username,
        access_token: issued.token,
        token_type: "bearer".to_string(),
        expires_at: issued.expires_at,
    })))
}

/// POST /logout
/// Invalidate the cookie session and revoke the presented bearer token
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
) -> Json<ApiResponse<MessageResponse>> {
    let _ = session.flush().await;

    if let Some(token) = extract_bearer_token(&headers)
        && let Err(e) = state.store().revoke_session_token(&token).await
    {
        tracing::warn!("Failed to revoke session token: {}", e);
    }

    Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
