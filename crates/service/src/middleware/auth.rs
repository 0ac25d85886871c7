//! Authentication extractors.
//!
//! Provides extractors that resolve the `Authorization: Bearer` header in
//! route handlers. A missing, malformed, or revoked token always rejects with
//! 401; privilege checks happen later in the handler and reject with 403 -
//! the two are never conflated.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// Verifies the bearer token against the token store and re-reads the user
/// record, so role changes apply from the next request on.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthenticated)?;

        let user = AuthService::new(state.users(), state.tokens())
            .verify(&token)
            .map_err(|_| AppError::Unauthenticated)?;

        Ok(Self(user))
    }
}

/// Extractor for the raw bearer token, without resolving it to a user.
///
/// Used by logout, where revocation itself decides whether the token is
/// still valid.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(parts)
            .map(Self)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Pull the token out of the `Authorization: Bearer` header.
fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_owned())
}
