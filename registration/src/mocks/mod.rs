//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider traits
//! for use in unit and integration tests.

pub mod directory;
pub mod mail;
pub mod role;
pub mod store;

pub use directory::MockUserDirectory;
pub use mail::MockMailProvider;
pub use role::MockRoleService;
pub use store::{MockCheckinStore, MockMailListStore, MockRsvpStore};
