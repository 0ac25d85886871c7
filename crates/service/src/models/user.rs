//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pronto_core::{Email, FranchiseId, RoleGrant, UserId};

/// A registered user (domain type).
///
/// Carries the password hash, so it never serializes directly; responses use
/// [`UserView`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address; unique case-insensitively.
    pub email: Email,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Role grants evaluated by the authorization engine.
    pub roles: Vec<RoleGrant>,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user holds the global admin grant.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&RoleGrant::Admin)
    }

    /// Whether this user holds a franchisee grant scoped to `franchise`.
    #[must_use]
    pub fn has_franchise_grant(&self, franchise: FranchiseId) -> bool {
        self.roles
            .iter()
            .any(|grant| grant.franchise() == Some(franchise))
    }
}

/// The response shape of a user record.
///
/// Everything except the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, in its original casing.
    pub email: Email,
    /// Role grants.
    pub roles: Vec<RoleGrant>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}
