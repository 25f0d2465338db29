//! RSVP-gated check-in.
//!
//! A user may check in if their RSVP says they are attending, or if staff
//! override the requirement. An overridden check-in also escalates the user
//! to the attendee role.
//!
//! ```text
//! check_in ──► can_check_in ──► RsvpStore::find
//!          └─► record_checkin ──► CheckinStore::{find, insert | replace}
//!                             └─► apply_stored
//!
//! update_checkin ──► CheckinStore::replace
//!                └─► apply_stored
//!
//! apply_stored ──► CheckinStore::find   (read-after-write)
//!              └─► RoleService::grant_attendee_role   (override only)
//! ```
//!
//! Nothing here is transactional across the two stores and the role service.
//! If the role grant fails, the check-in stays written and the operation is
//! reported as `RoleGrantFailed`.

use crate::error::{RegistrationError, Result};
use crate::metrics::{CHECKIN_RECORDED, CHECKIN_REJECTED, ROLE_GRANT_FAILED};
use crate::models::{UserCheckin, UserId};
use crate::providers::{CheckinStore, RoleService, RsvpStore, Stats};
use tracing::{debug, info, warn};

/// Check-in workflow.
///
/// # Type Parameters
///
/// - `R`: RSVP store
/// - `C`: Check-in store
/// - `G`: Role service
#[derive(Clone)]
pub struct CheckinWorkflow<R, C, G>
where
    R: RsvpStore,
    C: CheckinStore,
    G: RoleService,
{
    rsvps: R,
    checkins: C,
    roles: G,
}

impl<R, C, G> CheckinWorkflow<R, C, G>
where
    R: RsvpStore,
    C: CheckinStore,
    G: RoleService,
{
    /// Create a new check-in workflow.
    #[must_use]
    pub const fn new(rsvps: R, checkins: C, roles: G) -> Self {
        Self {
            rsvps,
            checkins,
            roles,
        }
    }

    /// Decide whether `user_id` may check in.
    ///
    /// `true` when the RSVP says attending, or when `override_requested`.
    /// The RSVP is read either way.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The user has no RSVP → `RegistrationError::NotFound`
    /// - The RSVP lookup fails → `RegistrationError::LookupFailed`
    #[tracing::instrument(skip(self))]
    pub async fn can_check_in(&self, user_id: &UserId, override_requested: bool) -> Result<bool> {
        let rsvp = self
            .rsvps
            .find(user_id)
            .await
            .map_err(RegistrationError::into_lookup_failure)?;

        let allowed = rsvp.is_attending || override_requested;
        debug!(is_attending = rsvp.is_attending, allowed, "Check-in eligibility");
        Ok(allowed)
    }

    /// Write `checkin` for `user_id` and apply its side effects.
    ///
    /// Callers must have confirmed eligibility; use [`Self::check_in`] for
    /// the gated path. The record id is forced to `user_id`. An existing
    /// record is replaced, otherwise one is inserted. The stored record is
    /// then read back, and if it carries a staff override the attendee role
    /// is granted.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A store read fails → `RegistrationError::LookupFailed`
    /// - A store write fails → `RegistrationError::StoreWriteFailed`
    /// - The role grant fails → `RegistrationError::RoleGrantFailed`
    ///   (the check-in remains written)
    #[tracing::instrument(skip(self, checkin), fields(staff_override = checkin.staff_override))]
    pub async fn record_checkin(&self, user_id: &UserId, checkin: UserCheckin) -> Result<UserCheckin> {
        let checkin = UserCheckin {
            id: user_id.clone(),
            ..checkin
        };

        match self.checkins.find(user_id).await {
            Ok(_) => self.checkins.replace(&checkin).await?,
            Err(e) if e.is_not_found() => self.checkins.insert(&checkin).await?,
            Err(e) => return Err(e.into_lookup_failure()),
        }

        self.apply_stored(user_id).await
    }

    /// Check a user in if they are eligible.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The user is not attending and no override was given →
    ///   `RegistrationError::IneligibleCheckin` (nothing is written)
    /// - Any error from [`Self::can_check_in`] or [`Self::record_checkin`]
    pub async fn check_in(&self, checkin: UserCheckin) -> Result<UserCheckin> {
        let user_id = checkin.id.clone();

        if !self.can_check_in(&user_id, checkin.staff_override).await? {
            metrics::counter!(CHECKIN_REJECTED).increment(1);
            info!(user_id = %user_id, "Check-in refused: not RSVPed as attending");
            return Err(RegistrationError::IneligibleCheckin {
                user_id: user_id.to_string(),
            });
        }

        self.record_checkin(&user_id, checkin).await
    }

    /// Replace an existing check-in.
    ///
    /// Staff edits are not RSVP-gated. The record id is forced to
    /// `user_id`, and the stored record goes through the same override
    /// handling as [`Self::record_checkin`].
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The user has no check-in → `RegistrationError::NotFound`
    /// - A store read or write fails
    /// - The role grant fails → `RegistrationError::RoleGrantFailed`
    #[tracing::instrument(skip(self, checkin), fields(staff_override = checkin.staff_override))]
    pub async fn update_checkin(&self, user_id: &UserId, checkin: UserCheckin) -> Result<UserCheckin> {
        let checkin = UserCheckin {
            id: user_id.clone(),
            ..checkin
        };

        self.checkins.replace(&checkin).await?;
        self.apply_stored(user_id).await
    }

    /// Re-read the stored check-in and grant the attendee role if it
    /// carries a staff override.
    async fn apply_stored(&self, user_id: &UserId) -> Result<UserCheckin> {
        // The stored form is authoritative for the override decision.
        let stored = self
            .checkins
            .find(user_id)
            .await
            .map_err(RegistrationError::into_lookup_failure)?;

        metrics::counter!(
            CHECKIN_RECORDED,
            "override" => if stored.staff_override { "true" } else { "false" }
        )
        .increment(1);

        if stored.staff_override {
            self.roles
                .grant_attendee_role(user_id)
                .await
                .map_err(|e| {
                    metrics::counter!(ROLE_GRANT_FAILED).increment(1);
                    warn!(error = %e, "Check-in written but attendee role was not granted");
                    match e {
                        RegistrationError::RoleGrantFailed { .. } => e,
                        other => RegistrationError::RoleGrantFailed {
                            user_id: user_id.to_string(),
                            reason: other.to_string(),
                        },
                    }
                })?;
            info!("Attendee role granted through staff override");
        }

        info!(has_checked_in = stored.has_checked_in, "Check-in recorded");
        Ok(stored)
    }

    /// Get a user's check-in.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::NotFound` if the user has not checked in,
    /// or `RegistrationError::LookupFailed` if the store fails.
    pub async fn get_checkin(&self, user_id: &UserId) -> Result<UserCheckin> {
        self.checkins.find(user_id).await
    }

    /// Ids of every checked-in user.
    ///
    /// # Errors
    ///
    /// Returns error if the store query fails.
    pub async fn checked_in_users(&self) -> Result<Vec<UserId>> {
        self.checkins.checked_in_users().await
    }

    /// Check-in counts by override, check-in, and swag state.
    ///
    /// # Errors
    ///
    /// Returns error if the store query fails.
    pub async fn stats(&self) -> Result<Stats> {
        self.checkins.stats().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::{MockCheckinStore, MockRoleService, MockRsvpStore};
    use crate::models::UserRsvp;

    fn workflow(
        rsvps: &[(&str, bool)],
    ) -> (
        CheckinWorkflow<MockRsvpStore, MockCheckinStore, MockRoleService>,
        MockCheckinStore,
        MockRoleService,
    ) {
        let rsvps = MockRsvpStore::with_rsvps(
            rsvps
                .iter()
                .map(|(id, attending)| UserRsvp::new(UserId::new(*id), *attending)),
        );
        let checkins = MockCheckinStore::new();
        let roles = MockRoleService::new();
        (
            CheckinWorkflow::new(rsvps, checkins.clone(), roles.clone()),
            checkins,
            roles,
        )
    }

    #[tokio::test]
    async fn test_missing_rsvp_is_not_found() {
        let (workflow, _, _) = workflow(&[]);

        let err = workflow.can_check_in(&UserId::new("nobody"), true).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_broken_rsvp_store_is_lookup_failure() {
        let rsvps = MockRsvpStore::with_rsvps([UserRsvp::new(UserId::new("u1"), true)]);
        rsvps.fail_reads();
        let workflow = CheckinWorkflow::new(rsvps, MockCheckinStore::new(), MockRoleService::new());

        let err = workflow.can_check_in(&UserId::new("u1"), false).await.unwrap_err();

        assert!(matches!(err, RegistrationError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn test_re_check_in_replaces_record() {
        let (workflow, checkins, _) = workflow(&[("u1", true)]);
        let user = UserId::new("u1");

        workflow.check_in(UserCheckin::checked_in(user.clone())).await.unwrap();
        let updated = workflow
            .check_in(UserCheckin {
                has_picked_up_swag: true,
                ..UserCheckin::checked_in(user.clone())
            })
            .await
            .unwrap();

        assert!(updated.has_picked_up_swag);
        assert_eq!(checkins.len(), 1);
    }

    #[tokio::test]
    async fn test_record_forces_user_id() {
        let (workflow, _, _) = workflow(&[]);

        let stored = workflow
            .record_checkin(&UserId::new("u1"), UserCheckin::checked_in(UserId::new("other")))
            .await
            .unwrap();

        assert_eq!(stored.id, UserId::new("u1"));
    }

    #[tokio::test]
    async fn test_write_failure_skips_role_grant() {
        let (workflow, checkins, roles) = workflow(&[("u1", false)]);
        checkins.fail_writes();

        let err = workflow
            .check_in(UserCheckin::checked_in(UserId::new("u1")).with_override(true))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::StoreWriteFailed(_)));
        assert!(roles.granted().is_empty());
    }
}
