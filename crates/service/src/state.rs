//! Application state shared across handlers.

use std::sync::Arc;

use pronto_core::{Email, RoleGrant};

use crate::config::ServiceConfig;
use crate::factory::PizzaFactory;
use crate::services::auth::{self, AuthError};
use crate::store::{FranchiseStore, MenuStore, OrderStore, StoreError, TokenStore, UserStore};

/// Errors that can occur while seeding the bootstrap admin.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("invalid admin email: {0}")]
    InvalidEmail(#[from] pronto_core::EmailError),
    #[error("failed to hash admin password")]
    PasswordHash,
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the backing stores, the factory port,
/// and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServiceConfig,
    users: UserStore,
    tokens: TokenStore,
    franchises: FranchiseStore,
    menu: MenuStore,
    orders: OrderStore,
    factory: Arc<dyn PizzaFactory>,
}

impl AppState {
    /// Create a new application state with empty stores.
    #[must_use]
    pub fn new(config: ServiceConfig, factory: Arc<dyn PizzaFactory>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users: UserStore::new(),
                tokens: TokenStore::new(),
                franchises: FranchiseStore::new(),
                menu: MenuStore::new(),
                orders: OrderStore::new(),
                factory,
            }),
        }
    }

    /// Create the bootstrap admin account from configuration.
    ///
    /// Idempotent: if a user with the configured email already exists the
    /// store is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the configured email is invalid or the password
    /// cannot be hashed.
    pub fn seed_admin(&self) -> Result<(), SeedError> {
        use secrecy::ExposeSecret;

        let admin = &self.inner.config.admin;
        if self.users().get_by_email(&admin.email).is_some() {
            return Ok(());
        }

        let email = Email::parse(&admin.email)?;
        let password_hash = auth::hash_password(admin.password.expose_secret())
            .map_err(|_: AuthError| SeedError::PasswordHash)?;

        match self.users().create(
            &admin.name,
            email,
            password_hash,
            vec![RoleGrant::Admin],
        ) {
            Ok(user) => {
                tracing::info!(user = %user.id, "bootstrap admin created");
                Ok(())
            }
            // A concurrent registration won the email; the account exists.
            Err(StoreError::Conflict(_) | StoreError::NotFound(_)) => Ok(()),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    /// Get a reference to the token store.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Get a reference to the franchise directory.
    #[must_use]
    pub fn franchises(&self) -> &FranchiseStore {
        &self.inner.franchises
    }

    /// Get a reference to the menu store.
    #[must_use]
    pub fn menu(&self) -> &MenuStore {
        &self.inner.menu
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    /// Get a reference to the factory port.
    #[must_use]
    pub fn factory(&self) -> &dyn PizzaFactory {
        self.inner.factory.as_ref()
    }
}
