//! Storage implementations for registration records.
//!
//! - **PostgreSQL** (`postgres` feature) - RSVPs, check-ins, mailing lists
//!
//! In-memory stores for tests live in [`crate::mocks`].

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-exports
#[cfg(feature = "postgres")]
pub use postgres::{PostgresCheckinStore, PostgresMailListStore, PostgresRsvpStore};
