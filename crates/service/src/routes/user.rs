//! User route handlers.
//!
//! Self-service record access: a user may view and update their own record,
//! admins may update anyone. The list and delete endpoints are deliberate
//! stubs kept for API-surface compatibility.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use pronto_core::{Email, UserId};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::UserView;
use crate::routes::auth::AuthResponse;
use crate::services::auth::{self, AuthService};
use crate::services::authz::{self, Action};
use crate::state::AppState;

/// User update request body. All fields optional; present fields replace the
/// stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Handle `GET /api/user/me` - the authenticated user.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserView> {
    Json(UserView::from(&user))
}

/// Handle `PUT /api/user/{id}` - update a user record.
///
/// Allowed for the user themselves or an admin; ownership is decided by the
/// authenticated identity, never by the payload. Returns the updated user
/// with a freshly issued token.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<AuthResponse>> {
    let target = UserId::new(id);
    authz::ensure(&user, Action::UpdateUser { target })?;

    let email = match body.email {
        Some(raw) => Some(Email::parse(&raw).map_err(|e| AppError::Validation(e.to_string()))?),
        None => None,
    };
    let password_hash = match body.password {
        Some(password) => Some(auth::hash_password(&password)?),
        None => None,
    };

    let updated = state.users().update(target, body.name, email, password_hash)?;
    let token = AuthService::new(state.users(), state.tokens()).issue(&updated);

    tracing::info!(subject = %user.id, target = %target, "user updated");

    Ok(Json(AuthResponse {
        user: UserView::from(&updated),
        token,
    }))
}

/// Handle `DELETE /api/user/{id}` - deliberately stubbed.
pub async fn delete_user(CurrentUser(_user): CurrentUser, Path(_id): Path<i32>) -> Json<Value> {
    Json(json!({ "message": "not implemented" }))
}

/// Handle `GET /api/user/` - deliberately stubbed.
pub async fn list_users(CurrentUser(_user): CurrentUser) -> Json<Value> {
    Json(json!({ "message": "not implemented" }))
}
