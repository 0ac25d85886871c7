//! Order store.
//!
//! Orders are persisted before the factory call is attempted, so the record
//! survives a failed submission; `update` then attaches the final fulfillment
//! state.

use std::collections::HashMap;
use std::sync::RwLock;

use pronto_core::{FranchiseId, OrderId, StoreId, UserId};

use crate::models::{Fulfillment, Order, OrderItem};

/// Concurrent store for orders.
pub struct OrderStore {
    inner: RwLock<Inner>,
}

struct Inner {
    next_id: i32,
    orders: HashMap<OrderId, Order>,
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore {
    /// Create an empty order store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                orders: HashMap::new(),
            }),
        }
    }

    /// Persist a new order with a fresh id in the `Pending` state.
    pub fn insert(
        &self,
        diner_id: UserId,
        franchise_id: FranchiseId,
        store_id: StoreId,
        items: Vec<OrderItem>,
    ) -> Order {
        let mut inner = self.write();

        let id = OrderId::new(inner.next_id);
        inner.next_id += 1;

        let order = Order {
            id,
            diner_id,
            franchise_id,
            store_id,
            items,
            fulfillment: Fulfillment::Pending,
        };
        inner.orders.insert(id, order.clone());

        order
    }

    /// Overwrite an order record, keyed by its id.
    pub fn update(&self, order: &Order) {
        self.write().orders.insert(order.id, order.clone());
    }

    /// Get one order by id.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.read().orders.get(&id).cloned()
    }

    /// All orders belonging to a diner, ordered by id.
    #[must_use]
    pub fn list_for_diner(&self, diner_id: UserId) -> Vec<Order> {
        let inner = self.read();
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|order| order.diner_id == diner_id)
            .cloned()
            .collect();
        orders.sort_by_key(|order| order.id);
        orders
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
