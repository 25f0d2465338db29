//! # Event Registration
//!
//! Attendance and outreach for an event registration backend.
//!
//! ## Features
//!
//! - **RSVP-gated check-in**: only attending users check in, unless staff
//!   override the requirement
//! - **Role escalation**: an overridden check-in grants the attendee role
//! - **Mailing lists**: named sets of users with idempotent membership edits
//! - **Personalized fan-out**: one provider transmission per order, with
//!   per-recipient substitutions
//!
//! ## Architecture
//!
//! Workflows are generic over provider traits ([`providers`]). Production
//! wiring uses `PostgreSQL` stores, HTTP peers, and SparkPost; tests use the
//! in-memory [`mocks`].
//!
//! ```text
//! CheckinWorkflow ──► RsvpStore, CheckinStore, RoleService
//! MailDispatcher  ──► MailListStore, UserDirectory, MailProvider
//! ```
//!
//! ## Example: Staff Override
//!
//! ```rust
//! use event_registration::mocks::{MockCheckinStore, MockRoleService, MockRsvpStore};
//! use event_registration::{CheckinWorkflow, UserCheckin, UserId, UserRsvp};
//!
//! # async fn example() -> event_registration::Result<()> {
//! let rsvps = MockRsvpStore::with_rsvps([UserRsvp::new(UserId::new("u1"), false)]);
//! let roles = MockRoleService::new();
//! let workflow = CheckinWorkflow::new(rsvps, MockCheckinStore::new(), roles.clone());
//!
//! let checkin = UserCheckin::checked_in(UserId::new("u1")).with_override(true);
//! workflow.check_in(checkin).await?;
//!
//! assert_eq!(roles.granted(), vec![UserId::new("u1")]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod checkin;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod models;
pub mod providers;
pub mod rsvp;
pub mod stores;

// Mock implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use checkin::CheckinWorkflow;
pub use config::RegistrationConfig;
pub use dispatch::MailDispatcher;
pub use error::{ErrorKind, RegistrationError, Result};
pub use models::{
    ListId, MailInfo, MailList, MailOrder, MailOrderList, MailStatus, Recipient, UserCheckin,
    UserId, UserInfo, UserRsvp,
};
pub use rsvp::RsvpService;
