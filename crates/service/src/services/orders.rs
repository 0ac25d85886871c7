//! Order fulfillment workflow.
//!
//! Drives one order through `Requested -> Priced -> Persisted -> Submitted ->
//! Confirmed | Failed`. The order record is persisted before the factory is
//! contacted, so a factory failure never loses it; the record is left in the
//! `Failed` state for later inspection rather than rolled back. The workflow
//! never retries the factory call - a retry could duplicate submissions for
//! one logical order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pronto_core::{FranchiseId, StoreId};

use crate::factory::{DinerInfo, FactoryError, FulfillmentRequest, PizzaFactory};
use crate::models::{Fulfillment, Order, OrderItem, User};
use crate::store::{FranchiseStore, OrderStore};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order has no line items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// The referenced franchise does not exist.
    #[error("unknown franchise")]
    UnknownFranchise,

    /// The referenced store does not exist within the franchise.
    #[error("unknown store")]
    UnknownStore,

    /// The factory call failed; the order record remains persisted.
    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// An incoming order request, priced by the caller at current menu values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// The franchise to order from.
    pub franchise_id: FranchiseId,
    /// The store to order from.
    pub store_id: StoreId,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
}

/// A successfully fulfilled order, as returned to the caller.
#[derive(Debug, Serialize)]
pub struct PlacedOrder {
    /// The confirmed order record.
    pub order: Order,
    /// Integrity-signed confirmation from the factory.
    pub jwt: String,
    /// Reference to the factory's report page, if provided.
    #[serde(rename = "reportUrl", skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
}

/// The order fulfillment workflow.
pub struct OrderWorkflow<'a> {
    directory: &'a FranchiseStore,
    orders: &'a OrderStore,
    factory: &'a dyn PizzaFactory,
}

impl<'a> OrderWorkflow<'a> {
    /// Create a new workflow over the given stores and factory port.
    #[must_use]
    pub const fn new(
        directory: &'a FranchiseStore,
        orders: &'a OrderStore,
        factory: &'a dyn PizzaFactory,
    ) -> Self {
        Self {
            directory,
            orders,
            factory,
        }
    }

    /// Place an order for `diner` and submit it to the factory.
    ///
    /// The diner id on the persisted order is always the authenticated
    /// caller's, never caller-supplied.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` for an empty item list,
    /// `OrderError::UnknownFranchise`/`UnknownStore` for invalid references
    /// (checked before any persistence), and `OrderError::Factory` when the
    /// factory call fails after the order was persisted.
    pub async fn submit(
        &self,
        diner: &User,
        request: OrderRequest,
    ) -> Result<PlacedOrder, OrderError> {
        if request.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let franchise = self
            .directory
            .get(request.franchise_id)
            .ok_or(OrderError::UnknownFranchise)?;
        if !franchise.stores.iter().any(|s| s.id == request.store_id) {
            return Err(OrderError::UnknownStore);
        }

        let mut order = self.orders.insert(
            diner.id,
            request.franchise_id,
            request.store_id,
            request.items,
        );

        let payload = FulfillmentRequest {
            diner: DinerInfo::from(diner),
            order: order.clone(),
        };

        match self.factory.fulfill(&payload).await {
            Ok(receipt) => {
                order.fulfillment = Fulfillment::Confirmed {
                    receipt: receipt.jwt.clone(),
                };
                self.orders.update(&order);

                tracing::info!(order = %order.id, diner = %diner.id, "order confirmed");

                Ok(PlacedOrder {
                    order,
                    jwt: receipt.jwt,
                    report_url: receipt.report_url,
                })
            }
            Err(err) => {
                let report_url = match &err {
                    FactoryError::Rejected { report_url } => report_url.clone(),
                    FactoryError::Unreachable(_) => None,
                };
                order.fulfillment = Fulfillment::Failed { report_url };
                self.orders.update(&order);

                tracing::warn!(
                    order = %order.id,
                    diner = %diner.id,
                    error = %err,
                    "order failed at factory, record kept"
                );

                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use pronto_core::{Email, MenuItemId, RoleGrant, UserId};

    use crate::factory::FactoryReceipt;
    use crate::models::FranchiseAdmin;

    /// Deterministic stand-in for the factory collaborator.
    enum StubFactory {
        Confirm,
        Reject,
        Unreachable,
    }

    #[async_trait]
    impl PizzaFactory for StubFactory {
        async fn fulfill(
            &self,
            _request: &FulfillmentRequest,
        ) -> Result<FactoryReceipt, FactoryError> {
            match self {
                Self::Confirm => Ok(FactoryReceipt {
                    jwt: "eyJ0factory".to_owned(),
                    report_url: Some("http://factory/report/1".to_owned()),
                }),
                Self::Reject => Err(FactoryError::Rejected {
                    report_url: Some("http://factory/report/2".to_owned()),
                }),
                Self::Unreachable => Err(FactoryError::Unreachable("timed out".to_owned())),
            }
        }
    }

    struct Fixture {
        directory: FranchiseStore,
        orders: OrderStore,
        diner: User,
        franchise_id: FranchiseId,
        store_id: StoreId,
    }

    impl Fixture {
        fn new() -> Self {
            let directory = FranchiseStore::new();
            let franchise = directory
                .create(
                    "pizzaPocket",
                    vec![FranchiseAdmin {
                        id: UserId::new(9),
                        name: "owner".to_owned(),
                        email: Email::parse("owner@test.com").unwrap(),
                    }],
                )
                .unwrap();
            let store = directory.create_store(franchise.id, "SLC").unwrap();

            Self {
                directory,
                orders: OrderStore::new(),
                diner: User {
                    id: UserId::new(1),
                    name: "d1".to_owned(),
                    email: Email::parse("d1@test.com").unwrap(),
                    password_hash: "hash".to_owned(),
                    roles: vec![RoleGrant::Diner],
                    created_at: Utc::now(),
                },
                franchise_id: franchise.id,
                store_id: store.id,
            }
        }

        fn request(&self) -> OrderRequest {
            OrderRequest {
                franchise_id: self.franchise_id,
                store_id: self.store_id,
                items: vec![OrderItem {
                    menu_id: MenuItemId::new(1),
                    description: "Veggie".to_owned(),
                    price: Decimal::new(38, 4),
                }],
            }
        }
    }

    #[tokio::test]
    async fn test_confirmed_order_attaches_receipt() {
        let fx = Fixture::new();
        let factory = StubFactory::Confirm;
        let workflow = OrderWorkflow::new(&fx.directory, &fx.orders, &factory);

        let placed = workflow.submit(&fx.diner, fx.request()).await.unwrap();
        assert_eq!(placed.jwt, "eyJ0factory");
        assert_eq!(placed.order.diner_id, fx.diner.id);

        let stored = fx.orders.get(placed.order.id).unwrap();
        assert_eq!(
            stored.fulfillment,
            Fulfillment::Confirmed {
                receipt: "eyJ0factory".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn test_rejected_order_is_persisted_as_failed() {
        let fx = Fixture::new();
        let factory = StubFactory::Reject;
        let workflow = OrderWorkflow::new(&fx.directory, &fx.orders, &factory);

        let err = workflow.submit(&fx.diner, fx.request()).await.unwrap_err();
        assert!(matches!(err, OrderError::Factory(_)));

        // The record survives the failure in the Failed state.
        let orders = fx.orders.list_for_diner(fx.diner.id);
        assert_eq!(orders.len(), 1);
        assert_eq!(
            orders.first().map(|o| o.fulfillment.clone()),
            Some(Fulfillment::Failed {
                report_url: Some("http://factory/report/2".to_owned())
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_factory_is_treated_as_failure() {
        let fx = Fixture::new();
        let factory = StubFactory::Unreachable;
        let workflow = OrderWorkflow::new(&fx.directory, &fx.orders, &factory);

        let err = workflow.submit(&fx.diner, fx.request()).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::Factory(FactoryError::Unreachable(_))
        ));

        let orders = fx.orders.list_for_diner(fx.diner.id);
        assert_eq!(
            orders.first().map(|o| o.fulfillment.clone()),
            Some(Fulfillment::Failed { report_url: None })
        );
    }

    #[tokio::test]
    async fn test_unknown_franchise_fails_before_persistence() {
        let fx = Fixture::new();
        let factory = StubFactory::Confirm;
        let workflow = OrderWorkflow::new(&fx.directory, &fx.orders, &factory);

        let request = OrderRequest {
            franchise_id: FranchiseId::new(999),
            ..fx.request()
        };
        let err = workflow.submit(&fx.diner, request).await.unwrap_err();
        assert!(matches!(err, OrderError::UnknownFranchise));

        // Nothing was persisted.
        assert!(fx.orders.list_for_diner(fx.diner.id).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_store_fails_before_persistence() {
        let fx = Fixture::new();
        let factory = StubFactory::Confirm;
        let workflow = OrderWorkflow::new(&fx.directory, &fx.orders, &factory);

        let request = OrderRequest {
            store_id: StoreId::new(999),
            ..fx.request()
        };
        let err = workflow.submit(&fx.diner, request).await.unwrap_err();
        assert!(matches!(err, OrderError::UnknownStore));
        assert!(fx.orders.list_for_diner(fx.diner.id).is_empty());
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() {
        let fx = Fixture::new();
        let factory = StubFactory::Confirm;
        let workflow = OrderWorkflow::new(&fx.directory, &fx.orders, &factory);

        let request = OrderRequest {
            items: Vec::new(),
            ..fx.request()
        };
        let err = workflow.submit(&fx.diner, request).await.unwrap_err();
        assert!(matches!(err, OrderError::EmptyOrder));
    }
}
