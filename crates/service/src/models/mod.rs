//! Domain model types.
//!
//! These types represent validated domain objects separate from the request
//! and response DTOs defined by the route handlers.

pub mod franchise;
pub mod menu;
pub mod order;
pub mod user;

pub use franchise::{Franchise, FranchiseAdmin, Store};
pub use menu::MenuItem;
pub use order::{Fulfillment, Order, OrderItem};
pub use user::{User, UserView};
