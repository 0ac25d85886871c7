//! Order and menu route handlers.
//!
//! The menu is public to read and admin-only to extend. Orders are always
//! owned by the authenticated caller; the diner id is never taken from the
//! request body.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::MenuItem;
use crate::services::authz::{self, Action};
use crate::services::orders::{OrderRequest, OrderWorkflow, PlacedOrder};
use crate::state::AppState;

/// Menu item request body.
#[derive(Debug, Deserialize)]
pub struct MenuItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

/// Pagination query for order listing.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<u32>,
}

/// Handle `GET /api/order/menu` - the public menu.
pub async fn menu(State(state): State<AppState>) -> Json<Vec<MenuItem>> {
    Json(state.menu().list())
}

/// Handle `PUT /api/order/menu` - append a menu item. Admin only.
///
/// Returns the full updated menu.
pub async fn add_menu_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<MenuItemRequest>,
) -> Result<Json<Vec<MenuItem>>> {
    authz::ensure(&user, Action::UpdateMenu)?;

    let (Some(title), Some(description), Some(image), Some(price)) =
        (body.title, body.description, body.image, body.price)
    else {
        return Err(AppError::Validation(
            "title, description, image, and price are required".to_owned(),
        ));
    };
    if price < Decimal::ZERO {
        return Err(AppError::Validation("price must not be negative".to_owned()));
    }

    let items = state.menu().add(&title, &description, &image, price);

    tracing::info!(subject = %user.id, title = %title, "menu item added");

    Ok(Json(items))
}

/// Handle `GET /api/order` - the caller's orders.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> Json<Value> {
    let orders = state.orders().list_for_diner(user.id);
    Json(json!({
        "dinerId": user.id,
        "orders": orders,
        "page": query.page.unwrap_or(1),
    }))
}

/// Handle `POST /api/order` - place an order and submit it to the factory.
///
/// The order is persisted before the factory call; a factory failure returns
/// 500 while the record stays retrievable in the `Failed` state.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<OrderRequest>,
) -> Result<Json<PlacedOrder>> {
    let workflow = OrderWorkflow::new(state.franchises(), state.orders(), state.factory());
    let placed = workflow.submit(&user, body).await?;

    Ok(Json(placed))
}
