//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                    - Welcome message and version
//! GET    /api/docs                            - Endpoint catalog
//!
//! # Auth
//! POST   /api/auth                            - Register a new diner
//! PUT    /api/auth                            - Login
//! DELETE /api/auth                            - Logout (revoke the bearer token)
//!
//! # Franchises
//! GET    /api/franchise                       - List franchises (public)
//! POST   /api/franchise                       - Create a franchise (admin)
//! GET    /api/franchise/{userId}              - Franchises a user administers
//! DELETE /api/franchise/{franchiseId}         - Delete a franchise and its stores
//! POST   /api/franchise/{franchiseId}/store   - Create a store
//! DELETE /api/franchise/{franchiseId}/store/{storeId} - Delete a store
//!
//! # Orders
//! GET    /api/order/menu                      - The public menu
//! PUT    /api/order/menu                      - Add a menu item (admin)
//! GET    /api/order                           - The caller's orders
//! POST   /api/order                           - Place an order
//!
//! # Users
//! GET    /api/user/me                         - The authenticated user
//! PUT    /api/user/{userId}                   - Update a user (self or admin)
//! DELETE /api/user/{userId}                   - Stubbed (not implemented)
//! GET    /api/user/                           - Stubbed (not implemented)
//! ```

pub mod auth;
pub mod docs;
pub mod franchise;
pub mod order;
pub mod user;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        post(auth::register).put(auth::login).delete(auth::logout),
    )
}

/// Create the franchise routes router.
pub fn franchise_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(franchise::list).post(franchise::create))
        .route(
            "/{id}",
            get(franchise::user_franchises).delete(franchise::delete_franchise),
        )
        .route("/{id}/store", post(franchise::create_store))
        .route("/{id}/store/{store_id}", delete(franchise::delete_store))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(order::menu).put(order::add_menu_item))
        .route("/", get(order::list).post(order::create))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users))
        .route("/me", get(user::me))
        .route("/{id}", axum::routing::put(user::update).delete(user::delete_user))
}

/// Create all routes for the service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/api/docs", get(docs::docs))
        .nest("/api/auth", auth_routes())
        .nest("/api/franchise", franchise_routes())
        .nest("/api/order", order_routes())
        .nest("/api/user", user_routes())
        .fallback(unknown_endpoint)
        .with_state(state)
}

/// Welcome message for the service root.
async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "welcome to Pronto Pizza",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Catch-all for paths that match no route.
async fn unknown_endpoint() -> (axum::http::StatusCode, Json<Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({ "message": "unknown endpoint" })),
    )
}
