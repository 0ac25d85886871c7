//! User store: the credential store of the service.
//!
//! Owns user records and their role grants. Email lookups are
//! case-insensitive; the secondary index is keyed by the normalized
//! (lowercase) address while the record keeps the original casing.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use pronto_core::{Email, FranchiseId, RoleGrant, UserId};

use super::StoreError;
use crate::models::User;

/// Concurrent store for user records.
pub struct UserStore {
    inner: RwLock<Inner>,
}

struct Inner {
    next_id: i32,
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create an empty user store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                by_id: HashMap::new(),
                by_email: HashMap::new(),
            }),
        }
    }

    /// Create a new user with a fresh server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already registered
    /// (case-insensitive).
    pub fn create(
        &self,
        name: &str,
        email: Email,
        password_hash: String,
        roles: Vec<RoleGrant>,
    ) -> Result<User, StoreError> {
        let mut inner = self.write();

        let key = email.normalized();
        if inner.by_email.contains_key(&key) {
            return Err(StoreError::Conflict("email"));
        }

        let id = UserId::new(inner.next_id);
        inner.next_id += 1;

        let user = User {
            id,
            name: name.to_owned(),
            email,
            password_hash,
            roles,
            created_at: Utc::now(),
        };

        inner.by_email.insert(key, id);
        inner.by_id.insert(id, user.clone());

        Ok(user)
    }

    /// Get a user by id.
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<User> {
        self.read().by_id.get(&id).cloned()
    }

    /// Get a user by email, matching case-insensitively.
    #[must_use]
    pub fn get_by_email(&self, email: &str) -> Option<User> {
        let inner = self.read();
        let id = inner.by_email.get(&email.to_lowercase())?;
        inner.by_id.get(id).cloned()
    }

    /// Update a user's name, email, and/or password hash.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist and
    /// `StoreError::Conflict` if the new email belongs to a different user.
    pub fn update(
        &self,
        id: UserId,
        name: Option<String>,
        email: Option<Email>,
        password_hash: Option<String>,
    ) -> Result<User, StoreError> {
        let mut inner = self.write();

        if !inner.by_id.contains_key(&id) {
            return Err(StoreError::NotFound("user"));
        }

        if let Some(new_email) = &email {
            let key = new_email.normalized();
            if inner.by_email.get(&key).is_some_and(|owner| *owner != id) {
                return Err(StoreError::Conflict("email"));
            }
        }

        let Some(user) = inner.by_id.get(&id).cloned() else {
            return Err(StoreError::NotFound("user"));
        };

        if let Some(new_email) = &email {
            inner.by_email.remove(&user.email.normalized());
            inner.by_email.insert(new_email.normalized(), id);
        }

        let Some(user) = inner.by_id.get_mut(&id) else {
            return Err(StoreError::NotFound("user"));
        };
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }

        Ok(user.clone())
    }

    /// Attach a role grant to a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn grant_role(&self, id: UserId, grant: RoleGrant) -> Result<(), StoreError> {
        let mut inner = self.write();
        let user = inner.by_id.get_mut(&id).ok_or(StoreError::NotFound("user"))?;
        if !user.roles.contains(&grant) {
            user.roles.push(grant);
        }
        Ok(())
    }

    /// Remove every franchisee grant scoped to `franchise` from all users.
    ///
    /// Called when a franchise is deleted so stale grants cannot authorize
    /// actions against a recycled id.
    pub fn revoke_franchise_grants(&self, franchise: FranchiseId) {
        let mut inner = self.write();
        for user in inner.by_id.values_mut() {
            user.roles
                .retain(|grant| grant.franchise() != Some(franchise));
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let store = UserStore::new();
        let a = store
            .create("a", email("a@test.com"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap();
        let b = store
            .create("b", email("b@test.com"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_email_lookup_is_case_insensitive() {
        let store = UserStore::new();
        store
            .create("a", email("Mixed@Test.Com"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap();

        let found = store.get_by_email("mixed@test.com").unwrap();
        assert_eq!(found.email.as_str(), "Mixed@Test.Com");
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let store = UserStore::new();
        store
            .create("a", email("a@test.com"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap();
        let err = store
            .create("b", email("A@TEST.COM"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict("email"));
    }

    #[test]
    fn test_update_reindexes_email() {
        let store = UserStore::new();
        let user = store
            .create("a", email("old@test.com"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap();

        store
            .update(user.id, None, Some(email("new@test.com")), None)
            .unwrap();

        assert!(store.get_by_email("old@test.com").is_none());
        assert_eq!(store.get_by_email("new@test.com").unwrap().id, user.id);
    }

    #[test]
    fn test_update_unknown_user_is_not_found() {
        let store = UserStore::new();
        let err = store
            .update(UserId::new(99), Some("x".to_owned()), None, None)
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("user"));
    }

    #[test]
    fn test_grant_and_revoke_franchise_grants() {
        let store = UserStore::new();
        let user = store
            .create("a", email("a@test.com"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap();

        let franchise = FranchiseId::new(7);
        store
            .grant_role(user.id, RoleGrant::Franchisee { object_id: franchise })
            .unwrap();
        assert!(store.get(user.id).unwrap().has_franchise_grant(franchise));

        store.revoke_franchise_grants(franchise);
        assert!(!store.get(user.id).unwrap().has_franchise_grant(franchise));
    }

    #[test]
    fn test_grant_role_is_idempotent() {
        let store = UserStore::new();
        let user = store
            .create("a", email("a@test.com"), "h".to_owned(), vec![RoleGrant::Diner])
            .unwrap();

        let grant = RoleGrant::Franchisee {
            object_id: FranchiseId::new(1),
        };
        store.grant_role(user.id, grant).unwrap();
        store.grant_role(user.id, grant).unwrap();

        let roles = store.get(user.id).unwrap().roles;
        assert_eq!(roles.iter().filter(|g| **g == grant).count(), 1);
    }
}
