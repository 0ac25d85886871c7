//! Franchise and store domain types.

use serde::Serialize;

use pronto_core::{Email, FranchiseId, StoreId, UserId};

/// A franchise with its admins and stores.
///
/// Stores live inside the franchise record, so removing the franchise removes
/// them in the same operation with no observable dangling store.
#[derive(Debug, Clone, Serialize)]
pub struct Franchise {
    /// Unique franchise ID.
    pub id: FranchiseId,
    /// Franchise name; unique across the directory.
    pub name: String,
    /// Users who manage this franchise.
    pub admins: Vec<FranchiseAdmin>,
    /// Stores belonging to this franchise.
    pub stores: Vec<Store>,
}

/// A franchise admin reference, resolved from a user record at creation time.
#[derive(Debug, Clone, Serialize)]
pub struct FranchiseAdmin {
    /// The admin's user ID.
    pub id: UserId,
    /// The admin's display name.
    pub name: String,
    /// The admin's email address.
    pub email: Email,
}

/// A store; owned by exactly one franchise, fixed at creation.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
}
