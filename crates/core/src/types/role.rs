//! Role grants for access-control decisions.
//!
//! A user's privileges are a set of [`RoleGrant`] values. `Admin` is a global
//! grant, `Franchisee` is scoped to a single franchise, and `Diner` is the
//! default grant every registered user receives.

use serde::{Deserialize, Serialize};

use super::id::FranchiseId;

/// The role carried by a grant, without its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Global administrator.
    Admin,
    /// Manages the stores of one franchise.
    Franchisee,
    /// Ordering customer.
    Diner,
}

/// A role assignment attached to a user record.
///
/// Serializes to the wire shape `{ "role": "...", "objectId": ... }`, where
/// `objectId` is present only for franchise-scoped grants.
///
/// ```
/// use pronto_core::{FranchiseId, RoleGrant};
///
/// let grant = RoleGrant::Franchisee {
///     object_id: FranchiseId::new(3),
/// };
/// let json = serde_json::to_string(&grant).unwrap();
/// assert_eq!(json, r#"{"role":"franchisee","objectId":3}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleGrant {
    /// Global administrator; allowed every action.
    Admin,
    /// Store management rights within one franchise.
    Franchisee {
        /// The franchise this grant is scoped to.
        #[serde(rename = "objectId")]
        object_id: FranchiseId,
    },
    /// Ordering customer; the implicit baseline role.
    Diner,
}

impl RoleGrant {
    /// The role of this grant, ignoring scope.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Franchisee { .. } => Role::Franchisee,
            Self::Diner => Role::Diner,
        }
    }

    /// The franchise this grant is scoped to, if any.
    #[must_use]
    pub const fn franchise(&self) -> Option<FranchiseId> {
        match self {
            Self::Franchisee { object_id } => Some(*object_id),
            Self::Admin | Self::Diner => None,
        }
    }
}
