//! Franchise route handlers.
//!
//! Listing is public. Creation is admin-only; franchise-scoped operations
//! (stores, deletion) are allowed for admins and for franchisees holding a
//! grant scoped to that franchise. Existence is checked before privilege, so
//! operations against a deleted franchise fail with 404 rather than 403.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use pronto_core::{FranchiseId, RoleGrant, StoreId, UserId};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Franchise, FranchiseAdmin, Store};
use crate::services::authz::{self, Action, Decision};
use crate::state::AppState;

/// Franchise creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateFranchiseRequest {
    pub name: Option<String>,
    pub admins: Option<Vec<AdminRef>>,
}

/// A franchise admin reference, resolved by email at creation time.
#[derive(Debug, Deserialize)]
pub struct AdminRef {
    pub email: String,
}

/// Store creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub name: Option<String>,
}

/// Handle `GET /api/franchise` - list all franchises. Public.
pub async fn list(State(state): State<AppState>) -> Json<Value> {
    let franchises = state.franchises().list();
    Json(json!({ "franchises": franchises }))
}

/// Handle `POST /api/franchise` - create a franchise. Admin only.
///
/// Each admin email must resolve to an existing user; an unresolvable email
/// fails the whole request rather than being silently skipped. Every resolved
/// admin receives a franchisee grant scoped to the new franchise.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateFranchiseRequest>,
) -> Result<Json<Franchise>> {
    authz::ensure(&user, Action::CreateFranchise)?;

    let name = body.name.unwrap_or_default();
    let admin_refs = body.admins.unwrap_or_default();
    if name.is_empty() || admin_refs.is_empty() {
        return Err(AppError::Validation(
            "name and a non-empty admins list are required".to_owned(),
        ));
    }

    let mut admins = Vec::with_capacity(admin_refs.len());
    for admin_ref in &admin_refs {
        let admin = state.users().get_by_email(&admin_ref.email).ok_or_else(|| {
            AppError::NotFound(format!(
                "unknown user for franchise admin {}",
                admin_ref.email
            ))
        })?;
        admins.push(FranchiseAdmin {
            id: admin.id,
            name: admin.name.clone(),
            email: admin.email.clone(),
        });
    }

    let franchise = state.franchises().create(&name, admins)?;

    for admin in &franchise.admins {
        state.users().grant_role(
            admin.id,
            RoleGrant::Franchisee {
                object_id: franchise.id,
            },
        )?;
    }

    tracing::info!(subject = %user.id, franchise = %franchise.id, "franchise created");

    Ok(Json(franchise))
}

/// Handle `GET /api/franchise/{id}` - the franchises a user administers.
///
/// Only the user themselves or an admin sees the real list; any other caller
/// receives an empty array rather than an error, so this read does not leak
/// whether the target user or their franchises exist.
pub async fn user_franchises(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Json<Vec<Franchise>> {
    let target = UserId::new(id);

    let franchises = match authz::authorize(&user, Action::ViewUserFranchises { target }) {
        Decision::Allow => state.franchises().list_for_user(target),
        Decision::Deny => {
            tracing::debug!(subject = %user.id, target = %target, "franchise list masked");
            Vec::new()
        }
    };

    Json(franchises)
}

/// Handle `DELETE /api/franchise/{id}` - delete a franchise and its stores.
///
/// The cascade is atomic from the caller's perspective, and the matching
/// franchisee grants are revoked so a recycled id cannot be reached through
/// stale roles.
pub async fn delete_franchise(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let franchise_id = FranchiseId::new(id);

    if state.franchises().get(franchise_id).is_none() {
        return Err(AppError::NotFound("unknown franchise".to_owned()));
    }
    authz::ensure(&user, Action::DeleteFranchise { franchise: franchise_id })?;

    state.franchises().delete(franchise_id)?;
    state.users().revoke_franchise_grants(franchise_id);

    tracing::info!(subject = %user.id, franchise = %franchise_id, "franchise deleted");

    Ok(Json(json!({ "message": "franchise deleted" })))
}

/// Handle `POST /api/franchise/{id}/store` - create a store.
pub async fn create_store(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<CreateStoreRequest>,
) -> Result<Json<Store>> {
    let franchise_id = FranchiseId::new(id);

    if state.franchises().get(franchise_id).is_none() {
        return Err(AppError::NotFound("unknown franchise".to_owned()));
    }
    authz::ensure(&user, Action::CreateStore { franchise: franchise_id })?;

    let name = body.name.unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_owned()));
    }

    let store = state.franchises().create_store(franchise_id, &name)?;

    tracing::info!(subject = %user.id, franchise = %franchise_id, store = %store.id, "store created");

    Ok(Json(store))
}

/// Handle `DELETE /api/franchise/{id}/store/{store_id}` - delete a store.
pub async fn delete_store(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, store_id)): Path<(i32, i32)>,
) -> Result<Json<Value>> {
    let franchise_id = FranchiseId::new(id);

    if state.franchises().get(franchise_id).is_none() {
        return Err(AppError::NotFound("unknown franchise".to_owned()));
    }
    authz::ensure(&user, Action::DeleteStore { franchise: franchise_id })?;

    state
        .franchises()
        .delete_store(franchise_id, StoreId::new(store_id))?;

    tracing::info!(subject = %user.id, franchise = %franchise_id, store = store_id, "store deleted");

    Ok(Json(json!({ "message": "store deleted" })))
}
