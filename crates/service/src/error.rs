//! Unified error handling for the HTTP boundary.
//!
//! Domain components return typed failures; this module funnels them into a
//! single `AppError` whose `IntoResponse` impl maps each class to its fixed
//! status code and a minimal `{message}` JSON body. The two access failures
//! are deliberately distinct: a missing/invalid/revoked token is always 401,
//! a valid identity lacking privilege is always 403.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::factory::FactoryError;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;
use crate::store::StoreError;

/// Application-level error type for the service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed, or revoked bearer token.
    #[error("unauthorized")]
    Unauthenticated,

    /// Valid identity, insufficient privilege.
    #[error("{0}")]
    Forbidden(String),

    /// Unknown credential or resource, including bad login.
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (email or franchise name).
    #[error("{0}")]
    Conflict(String),

    /// The external factory failed, rejected the order, or timed out.
    #[error("Failed to fulfill order at factory")]
    Fulfillment {
        /// Diagnostic report reference supplied by the factory, if any.
        report_url: Option<String>,
    },

    /// Internal server error.
    #[error("internal server error")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Fulfillment { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
            }
            Self::Fulfillment { report_url } => {
                tracing::error!(report_url = ?report_url, "factory fulfillment failed");
            }
            _ => {}
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Fulfillment { report_url } => json!({
                "message": self.to_string(),
                "reportUrl": report_url,
            }),
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(err.to_string()),
            StoreError::Conflict(_) => Self::Conflict(err.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            // Bad login surfaces as not-found, never 401. Deliberate, tested
            // contract: a wrong password is indistinguishable from an unknown
            // user at the HTTP surface.
            AuthError::UnknownUser | AuthError::InvalidCredential => {
                Self::NotFound("unknown user".to_owned())
            }
            AuthError::Unauthenticated => Self::Unauthenticated,
            AuthError::EmailTaken => Self::Conflict("email already registered".to_owned()),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyOrder => Self::Validation(err.to_string()),
            OrderError::UnknownFranchise => Self::NotFound("unknown franchise".to_owned()),
            OrderError::UnknownStore => Self::NotFound("unknown store".to_owned()),
            OrderError::Factory(factory) => factory.into(),
        }
    }
}

impl From<FactoryError> for AppError {
    fn from(err: FactoryError) -> Self {
        let report_url = match err {
            FactoryError::Rejected { report_url } => report_url,
            FactoryError::Unreachable(_) => None,
        };
        Self::Fulfillment { report_url }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::Forbidden("no".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("unknown user".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("taken".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Fulfillment { report_url: None }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_login_maps_to_not_found() {
        let err = AppError::from(AuthError::InvalidCredential);
        assert!(matches!(err, AppError::NotFound(ref m) if m == "unknown user"));

        let err = AppError::from(AuthError::UnknownUser);
        assert!(matches!(err, AppError::NotFound(ref m) if m == "unknown user"));
    }

    #[test]
    fn test_revoked_token_maps_to_unauthenticated() {
        let err = AppError::from(AuthError::Unauthenticated);
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[test]
    fn test_factory_rejection_keeps_report_url() {
        let err = AppError::from(FactoryError::Rejected {
            report_url: Some("http://factory/report/1".to_owned()),
        });
        match err {
            AppError::Fulfillment { report_url } => {
                assert_eq!(report_url.as_deref(), Some("http://factory/report/1"));
            }
            other => panic!("expected fulfillment error, got {other:?}"),
        }
    }
}
