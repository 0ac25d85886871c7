//! Menu item domain type.

use rust_decimal::Decimal;
use serde::Serialize;

use pronto_core::MenuItemId;

/// One pizza on the public menu.
///
/// The menu is append-only from the API's perspective; items are added by
/// admins and never updated or removed.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    /// Unique menu item ID.
    pub id: MenuItemId,
    /// Item title shown to diners.
    pub title: String,
    /// Item description.
    pub description: String,
    /// Image reference.
    pub image: String,
    /// Non-negative price, serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}
