//! Menu store.
//!
//! Append-only: items are added by admins and never updated or removed.

use std::sync::RwLock;

use rust_decimal::Decimal;

use pronto_core::MenuItemId;

use crate::models::MenuItem;

/// Concurrent store for the public menu.
pub struct MenuStore {
    inner: RwLock<Inner>,
}

struct Inner {
    next_id: i32,
    items: Vec<MenuItem>,
}

impl Default for MenuStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuStore {
    /// Create an empty menu.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                items: Vec::new(),
            }),
        }
    }

    /// The full menu in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<MenuItem> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .items
            .clone()
    }

    /// Append an item and return the full updated menu.
    pub fn add(&self, title: &str, description: &str, image: &str, price: Decimal) -> Vec<MenuItem> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let id = MenuItemId::new(inner.next_id);
        inner.next_id += 1;
        inner.items.push(MenuItem {
            id,
            title: title.to_owned(),
            description: description.to_owned(),
            image: image.to_owned(),
            price,
        });

        inner.items.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert!(MenuStore::new().list().is_empty());
    }

    #[test]
    fn test_add_returns_full_menu() {
        let menu = MenuStore::new();
        menu.add("Veggie", "A garden of delight", "pizza1.png", Decimal::new(38, 4));
        let items = menu.add("Pepperoni", "Spicy treat", "pizza2.png", Decimal::new(42, 4));

        assert_eq!(items.len(), 2);
        assert_eq!(items.first().map(|i| i.title.as_str()), Some("Veggie"));
        assert_eq!(items.last().map(|i| i.id), Some(MenuItemId::new(2)));
    }
}
