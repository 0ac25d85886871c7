//! Order domain types and the fulfillment state attached to each order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pronto_core::{FranchiseId, MenuItemId, OrderId, StoreId, UserId};

/// A diner's order.
///
/// Immutable after creation except for the fulfillment state, which moves from
/// [`Fulfillment::Pending`] to exactly one of `Confirmed` or `Failed` once the
/// factory call resolves. The record is persisted before the factory is
/// contacted, so a failed submission leaves it retrievable in the `Failed`
/// state rather than rolling it back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The owning diner; always the authenticated caller, never caller-supplied.
    pub diner_id: UserId,
    /// The franchise the order was placed against.
    pub franchise_id: FranchiseId,
    /// The store the order was placed against.
    pub store_id: StoreId,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
    /// Outcome of the factory submission.
    #[serde(flatten)]
    pub fulfillment: Fulfillment,
}

/// One line of an order. Prices are caller-supplied at current menu values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The menu item this line refers to.
    pub menu_id: MenuItemId,
    /// Line description.
    pub description: String,
    /// Line price, serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Factory submission outcome for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Fulfillment {
    /// Persisted, factory call not yet resolved.
    Pending,
    /// Factory accepted the order.
    Confirmed {
        /// Opaque confirmation reference returned by the factory.
        receipt: String,
    },
    /// Factory call failed or was rejected; the order record remains.
    Failed {
        /// Diagnostic report reference supplied by the factory, if any.
        #[serde(rename = "reportUrl", skip_serializing_if = "Option::is_none")]
        report_url: Option<String>,
    },
}
