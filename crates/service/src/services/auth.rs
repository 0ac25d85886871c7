//! Authentication service.
//!
//! Issues, verifies, and revokes bearer session tokens, and owns password
//! hashing for the credential store. Tokens are opaque random strings mapped
//! to a user id in the token store; verification re-reads the user record so
//! role changes take effect on the next verified request.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::{Rng, distr::Alphanumeric};
use thiserror::Error;

use pronto_core::{Email, EmailError, RoleGrant};

use crate::models::User;
use crate::store::{StoreError, TokenStore, UserStore};

/// Length of issued bearer tokens.
const TOKEN_LENGTH: usize = 40;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user with that email.
    #[error("unknown user")]
    UnknownUser,

    /// The password did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredential,

    /// Missing, unknown, or revoked token.
    #[error("token is not valid")]
    Unauthenticated,

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Authentication service over the credential and token stores.
pub struct AuthService<'a> {
    users: &'a UserStore,
    tokens: &'a TokenStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a UserStore, tokens: &'a TokenStore) -> Self {
        Self { users, tokens }
    }

    /// Register a new diner and issue a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid and
    /// `AuthError::EmailTaken` if it is already registered.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, email, password_hash, vec![RoleGrant::Diner])
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                StoreError::NotFound(_) => AuthError::UnknownUser,
            })?;

        let token = self.issue(&user);
        tracing::info!(user = %user.id, "registered new diner");

        Ok((user, token))
    }

    /// Login with email and password, issuing a fresh token.
    ///
    /// Both an unknown email and a wrong password surface as not-found at the
    /// HTTP boundary; the distinct variants exist for auditing only.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownUser` if no user matches the email
    /// (case-insensitive) and `AuthError::InvalidCredential` if the password
    /// does not verify.
    pub fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .ok_or(AuthError::UnknownUser)?;

        verify_password(password, &user.password_hash)?;

        let token = self.issue(&user);
        tracing::info!(user = %user.id, "login");

        Ok((user, token))
    }

    /// Issue a new session token bound to `user`.
    ///
    /// Has no effect on the user's other tokens.
    pub fn issue(&self, user: &User) -> String {
        let token = generate_token();
        self.tokens.insert(&token, user.id);
        token
    }

    /// Resolve a bearer token to its user, re-reading current role grants.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if the token is unknown, revoked,
    /// or bound to a user that no longer exists.
    pub fn verify(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self
            .tokens
            .resolve(token)
            .ok_or(AuthError::Unauthenticated)?;

        self.users.get(user_id).ok_or(AuthError::Unauthenticated)
    }

    /// Revoke exactly the presented token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if the token is unknown or already
    /// revoked - logging out a dead session is an authentication error, not a
    /// no-op success.
    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        if self.tokens.revoke(token) {
            Ok(())
        } else {
            Err(AuthError::Unauthenticated)
        }
    }
}

/// Generate an opaque session token.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredential)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredential)
}
