//! Authorization engine.
//!
//! A pure decision function evaluated per request, with no side effects.
//! Precedence:
//!   1. The global admin grant allows every action.
//!   2. Self-service actions are allowed only for the acting user - ownership
//!      is by identity, not by payload.
//!   3. Franchise-scoped actions require a franchisee grant scoped to that
//!      franchise's id.
//!   4. Everything else is denied; menu mutation in particular has no
//!      franchisee carve-out.
//!
//! The one soft path is [`Action::ViewUserFranchises`]: callers that are
//! denied get an empty result set instead of an error, so that read does not
//! leak whether the target exists.

use pronto_core::{FranchiseId, UserId};

use crate::error::AppError;
use crate::models::User;

/// An action a subject wants to perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Update a user record.
    UpdateUser {
        /// The user being updated.
        target: UserId,
    },
    /// Create a franchise.
    CreateFranchise,
    /// Delete a franchise and its stores.
    DeleteFranchise {
        /// The franchise being deleted.
        franchise: FranchiseId,
    },
    /// Create a store under a franchise.
    CreateStore {
        /// The owning franchise.
        franchise: FranchiseId,
    },
    /// Delete a store from a franchise.
    DeleteStore {
        /// The owning franchise.
        franchise: FranchiseId,
    },
    /// List the franchises a user administers.
    ViewUserFranchises {
        /// The user whose franchises are requested.
        target: UserId,
    },
    /// Add an item to the public menu.
    UpdateMenu,
}

impl Action {
    /// The message surfaced with a `Forbidden` response for this action.
    const fn denied_message(self) -> &'static str {
        match self {
            Self::UpdateUser { .. } => "unauthorized",
            Self::CreateFranchise => "unable to create a franchise",
            Self::DeleteFranchise { .. } => "unable to delete a franchise",
            Self::CreateStore { .. } => "unable to create a store",
            Self::DeleteStore { .. } => "unable to delete a store",
            Self::ViewUserFranchises { .. } => "unable to list franchises",
            Self::UpdateMenu => "unable to add menu item",
        }
    }
}

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The subject may perform the action.
    Allow,
    /// The subject may not perform the action.
    Deny,
}

/// Decide whether `user` may perform `action`.
#[must_use]
pub fn authorize(user: &User, action: Action) -> Decision {
    if user.is_admin() {
        return Decision::Allow;
    }

    let allowed = match action {
        Action::UpdateUser { target } | Action::ViewUserFranchises { target } => user.id == target,
        Action::DeleteFranchise { franchise }
        | Action::CreateStore { franchise }
        | Action::DeleteStore { franchise } => user.has_franchise_grant(franchise),
        Action::CreateFranchise | Action::UpdateMenu => false,
    };

    if allowed { Decision::Allow } else { Decision::Deny }
}

/// Check `action` and convert a denial into a logged `Forbidden` error.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the decision is [`Decision::Deny`].
pub fn ensure(user: &User, action: Action) -> Result<(), AppError> {
    match authorize(user, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::warn!(subject = %user.id, action = ?action, "access denied");
            Err(AppError::Forbidden(action.denied_message().to_owned()))
        }
    }
}
