/// Authentication endpoints
///
/// This module provides the admin session endpoints:
/// - Login
/// - Logout
/// - Session status
///
/// # Endpoints
///
/// - `POST /api/login` (alias `POST /api/auth/login`) - Open a session
/// - `POST /api/logout` - Close the session
/// - `GET /api/auth/status` - Report the current session

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use loanlead_shared::auth::SessionUser;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Logout response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Session status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub authenticated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// Login
///
/// Checks the credentials and binds the user to the session under a fresh
/// session ID. The session layer sets the signed cookie.
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "username": "admin", "password": "adminpass" }
/// ```
///
/// # Response
///
/// ```json
/// { "id": 1, "username": "admin", "isAdmin": true }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing username or password, or malformed JSON
/// - `401 Unauthorized`: Unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<SessionUser>> {
    let Json(req) = body?;
    req.validate()
        .map_err(|e| ApiError::from_validation(e, &["username", "password"]))?;

    match state.auth.login(&session, &req.username, &req.password).await {
        Ok(user) => Ok(Json(user)),
        Err(err) => {
            tracing::warn!(username = %req.username, "Login failed: {}", err);
            Err(err.into())
        }
    }
}

/// Logout
///
/// Destroys the session (if any); the session layer clears the cookie.
/// Always succeeds.
pub async fn logout(State(state): State<AppState>, session: Session) -> Json<MessageResponse> {
    match state.auth.logout(&session).await {
        Ok(()) => tracing::info!("User logged out"),
        Err(err) => tracing::warn!("Failed to destroy session: {}", err),
    }

    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Session status
///
/// ```json
/// { "authenticated": true, "user": { "id": 1, "username": "admin", "isAdmin": true } }
/// ```
///
/// or `{ "authenticated": false }`.
pub async fn status(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<StatusResponse>> {
    let user = state.auth.current_user(&session).await?;

    Ok(Json(StatusResponse {
        authenticated: user.is_some(),
        user,
    }))
}
