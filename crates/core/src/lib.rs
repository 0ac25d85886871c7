//! Pronto Core - Shared types library.
//!
//! This crate provides common types used across the Pronto Pizza components:
//! - `service` - The ordering backend (auth, franchises, menu, orders)
//! - `integration-tests` - End-to-end tests against the HTTP surface
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and role grants

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
