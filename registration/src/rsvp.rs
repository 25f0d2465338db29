//! RSVP service.

use crate::error::{RegistrationError, Result};
use crate::models::{UserId, UserRsvp};
use crate::providers::{RsvpStore, Stats};
use tracing::info;

/// RSVP service.
///
/// Thin layer over an [`RsvpStore`] that enforces one RSVP per user.
#[derive(Clone)]
pub struct RsvpService<R: RsvpStore> {
    rsvps: R,
}

impl<R: RsvpStore> RsvpService<R> {
    /// Create a new RSVP service.
    #[must_use]
    pub const fn new(rsvps: R) -> Self {
        Self { rsvps }
    }

    /// Get the RSVP filed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::NotFound` if none was filed, or
    /// `RegistrationError::LookupFailed` if the store fails.
    pub async fn get_rsvp(&self, user_id: &UserId) -> Result<UserRsvp> {
        self.rsvps.find(user_id).await
    }

    /// File the RSVP for `user_id`.
    ///
    /// The record id is forced to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The user already filed one → `RegistrationError::AlreadyExists`
    /// - The lookup fails → `RegistrationError::LookupFailed`
    /// - The insert fails → `RegistrationError::StoreWriteFailed`
    #[tracing::instrument(skip(self, rsvp), fields(is_attending = rsvp.is_attending))]
    pub async fn create_rsvp(&self, user_id: &UserId, rsvp: UserRsvp) -> Result<UserRsvp> {
        match self.rsvps.find(user_id).await {
            Ok(_) => return Err(RegistrationError::already_exists("rsvp", user_id.as_str())),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into_lookup_failure()),
        }

        let rsvp = UserRsvp {
            id: user_id.clone(),
            ..rsvp
        };
        self.rsvps.insert(&rsvp).await?;

        info!("RSVP created");
        Ok(rsvp)
    }

    /// Replace the RSVP filed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::NotFound` if none was filed, or
    /// `RegistrationError::StoreWriteFailed` if the store fails.
    #[tracing::instrument(skip(self, rsvp), fields(is_attending = rsvp.is_attending))]
    pub async fn update_rsvp(&self, user_id: &UserId, rsvp: UserRsvp) -> Result<UserRsvp> {
        let rsvp = UserRsvp {
            id: user_id.clone(),
            ..rsvp
        };
        self.rsvps.replace(&rsvp).await?;

        info!("RSVP updated");
        Ok(rsvp)
    }

    /// RSVP counts by attendance.
    ///
    /// # Errors
    ///
    /// Returns error if the store query fails.
    pub async fn stats(&self) -> Result<Stats> {
        self.rsvps.stats().await
    }
}
