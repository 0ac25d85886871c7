//! Domain primitive types.

pub mod email;
pub mod id;
pub mod role;

pub use email::{Email, EmailError};
pub use id::{FranchiseId, MenuItemId, OrderId, StoreId, UserId};
pub use role::{Role, RoleGrant};
