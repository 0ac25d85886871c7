//! Pronto Pizza ordering backend.
//!
//! # Architecture
//!
//! Every protected request flows through the same pipeline: the bearer token
//! is resolved to a user ([`services::auth`]), the action is checked against
//! the user's role grants ([`services::authz`]), and only then does the domain
//! operation run against the in-process stores ([`store`]). Order creation
//! additionally calls the external pizza factory ([`factory`]) after the order
//! record is persisted, so a factory failure never loses the order.
//!
//! The [`app`] function builds the complete router and is shared by the binary
//! and the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod factory;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use state::AppState;

/// Build the full application router for the given state.
#[must_use]
pub fn app(state: AppState) -> Router {
    routes::router(state)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
