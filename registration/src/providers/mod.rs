//! Registration providers.
//!
//! This module defines traits for every external dependency of the
//! check-in and mail workflows. The workflows depend on these traits and
//! receive concrete implementations at construction time.
//!
//! # Architecture
//!
//! ```text
//! CheckinWorkflow ──► RsvpStore        MailDispatcher ──► MailListStore
//!                 ├─► CheckinStore                    ├─► UserDirectory
//!                 └─► RoleService                     └─► MailProvider
//! ```
//!
//! This enables:
//! - **Testing**: Use mocks (in-memory, deterministic)
//! - **Production**: Use real services (PostgreSQL, the auth and user
//!   services, SparkPost)

pub mod directory;
pub mod http_directory;
pub mod http_role;
pub mod mail;
pub mod role;
pub mod sparkpost;
pub mod store;

// Re-export provider traits
pub use directory::UserDirectory;
pub use http_directory::HttpUserDirectory;
pub use http_role::HttpRoleService;
pub use mail::MailProvider;
pub use role::{ATTENDEE_ROLE, RoleService};
pub use sparkpost::SparkPostProvider;
pub use store::{
    CHECKIN_STAT_FIELDS, CheckinStore, MailListStore, MembershipUpdate, RSVP_STAT_FIELDS,
    RsvpStore, Stats,
};
