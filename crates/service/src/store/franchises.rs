//! Franchise/store directory.
//!
//! Stores are embedded in their owning franchise record, so a franchise
//! deletion removes its stores in the same write-lock critical section —
//! concurrent store creation on the same franchise either lands before the
//! delete (and is removed with it) or observes the franchise as gone.

use std::collections::HashMap;
use std::sync::RwLock;

use pronto_core::{FranchiseId, StoreId, UserId};

use super::StoreError;
use crate::models::{Franchise, FranchiseAdmin, Store};

/// Concurrent store for franchises and their stores.
pub struct FranchiseStore {
    inner: RwLock<Inner>,
}

struct Inner {
    next_franchise_id: i32,
    next_store_id: i32,
    franchises: HashMap<FranchiseId, Franchise>,
}

impl Default for FranchiseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FranchiseStore {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_franchise_id: 1,
                next_store_id: 1,
                franchises: HashMap::new(),
            }),
        }
    }

    /// Create a franchise with the given (already resolved) admins.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a franchise with this name exists.
    pub fn create(
        &self,
        name: &str,
        admins: Vec<FranchiseAdmin>,
    ) -> Result<Franchise, StoreError> {
        let mut inner = self.write();

        if inner.franchises.values().any(|f| f.name == name) {
            return Err(StoreError::Conflict("franchise"));
        }

        let id = FranchiseId::new(inner.next_franchise_id);
        inner.next_franchise_id += 1;

        let franchise = Franchise {
            id,
            name: name.to_owned(),
            admins,
            stores: Vec::new(),
        };
        inner.franchises.insert(id, franchise.clone());

        Ok(franchise)
    }

    /// List all franchises, ordered by id.
    #[must_use]
    pub fn list(&self) -> Vec<Franchise> {
        let inner = self.read();
        let mut franchises: Vec<Franchise> = inner.franchises.values().cloned().collect();
        franchises.sort_by_key(|f| f.id);
        franchises
    }

    /// List the franchises a user administers, ordered by id.
    #[must_use]
    pub fn list_for_user(&self, user: UserId) -> Vec<Franchise> {
        let inner = self.read();
        let mut franchises: Vec<Franchise> = inner
            .franchises
            .values()
            .filter(|f| f.admins.iter().any(|admin| admin.id == user))
            .cloned()
            .collect();
        franchises.sort_by_key(|f| f.id);
        franchises
    }

    /// Get a franchise by id.
    #[must_use]
    pub fn get(&self, id: FranchiseId) -> Option<Franchise> {
        self.read().franchises.get(&id).cloned()
    }

    /// Delete a franchise and all of its stores atomically.
    ///
    /// Returns the removed record so the caller can revoke the matching
    /// franchisee grants.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the franchise does not exist.
    pub fn delete(&self, id: FranchiseId) -> Result<Franchise, StoreError> {
        self.write()
            .franchises
            .remove(&id)
            .ok_or(StoreError::NotFound("franchise"))
    }

    /// Create a store under a franchise.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the franchise does not exist (or was
    /// deleted concurrently).
    pub fn create_store(&self, franchise: FranchiseId, name: &str) -> Result<Store, StoreError> {
        let mut inner = self.write();

        let id = StoreId::new(inner.next_store_id);
        let entry = inner
            .franchises
            .get_mut(&franchise)
            .ok_or(StoreError::NotFound("franchise"))?;

        let store = Store {
            id,
            name: name.to_owned(),
        };
        entry.stores.push(store.clone());
        inner.next_store_id += 1;

        Ok(store)
    }

    /// Delete a store from a franchise.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the franchise or the store does not
    /// exist.
    pub fn delete_store(&self, franchise: FranchiseId, store: StoreId) -> Result<(), StoreError> {
        let mut inner = self.write();
        let entry = inner
            .franchises
            .get_mut(&franchise)
            .ok_or(StoreError::NotFound("franchise"))?;

        let before = entry.stores.len();
        entry.stores.retain(|s| s.id != store);
        if entry.stores.len() == before {
            return Err(StoreError::NotFound("store"));
        }

        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
