//! Authentication route handlers.
//!
//! Registration, login, and logout. Login failures surface as 404 rather than
//! 401 - a deliberate, tested contract that keeps wrong-password responses
//! indistinguishable from unknown-user responses.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::BearerToken;
use crate::models::UserView;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A user together with a freshly issued session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}

/// Handle `POST /api/auth` - register a new diner.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(AppError::Validation(
            "name, email, and password are required".to_owned(),
        ));
    };
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "name, email, and password are required".to_owned(),
        ));
    }

    let (user, token) =
        AuthService::new(state.users(), state.tokens()).register(&name, &email, &password)?;

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

/// Handle `PUT /api/auth` - login with email and password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::Validation(
            "email and password are required".to_owned(),
        ));
    };

    let (user, token) = AuthService::new(state.users(), state.tokens()).login(&email, &password)?;

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

/// Handle `DELETE /api/auth` - revoke the presented token.
///
/// Revoking an already-revoked or unknown token is a 401, not a no-op.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>> {
    AuthService::new(state.users(), state.tokens()).logout(&token)?;

    Ok(Json(json!({ "message": "logout successful" })))
}
