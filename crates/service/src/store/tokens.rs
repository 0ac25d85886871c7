//! Session token store.
//!
//! An explicit token → user mapping with an atomic revoke-then-deny contract:
//! `revoke` flips the record's `revoked` flag under the write lock, so every
//! `resolve` that starts after `revoke` returns observes the token as invalid.
//! Tokens have no expiry; they die only by explicit revocation.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use pronto_core::UserId;

/// One issued session token.
#[derive(Debug, Clone)]
struct TokenRecord {
    user_id: UserId,
    #[allow(dead_code, reason = "issuance time is kept for auditability")]
    issued_at: DateTime<Utc>,
    revoked: bool,
}

/// Concurrent store for session tokens.
#[derive(Default)]
pub struct TokenStore {
    inner: RwLock<HashMap<String, TokenRecord>>,
}

impl TokenStore {
    /// Create an empty token store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly issued token bound to `user_id`.
    ///
    /// Has no effect on any other token; a user may hold any number of
    /// concurrently valid tokens.
    pub fn insert(&self, token: &str, user_id: UserId) {
        self.write().insert(
            token.to_owned(),
            TokenRecord {
                user_id,
                issued_at: Utc::now(),
                revoked: false,
            },
        );
    }

    /// Resolve a token to its bound user.
    ///
    /// Returns `None` for unknown or revoked tokens.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        let inner = self.read();
        let record = inner.get(token)?;
        if record.revoked {
            return None;
        }
        Some(record.user_id)
    }

    /// Revoke exactly the presented token.
    ///
    /// Returns `true` if the token was valid and is now revoked, `false` if it
    /// was unknown or already revoked. Revoking an already-dead token is an
    /// authentication failure for the caller, not a no-op success.
    #[must_use]
    pub fn revoke(&self, token: &str) -> bool {
        let mut inner = self.write();
        match inner.get_mut(token) {
            Some(record) if !record.revoked => {
                record.revoked = true;
                true
            }
            _ => false,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, TokenRecord>> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, TokenRecord>> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
