//! Store traits for RSVPs, check-ins, and mailing lists.
//!
//! Each operation is individually atomic; nothing here spans operations.
//! Lookups return `RegistrationError::NotFound` when the record is absent so
//! callers can tell "not filed yet" apart from a broken store.

use crate::error::{RegistrationError, Result};
use crate::models::{ListId, MailList, UserCheckin, UserId, UserRsvp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

/// RSVP store.
pub trait RsvpStore: Send + Sync {
    /// Get the RSVP filed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - RSVP not found → `RegistrationError::NotFound`
    /// - Store query fails → `RegistrationError::LookupFailed`
    fn find(&self, user_id: &UserId) -> impl Future<Output = Result<UserRsvp>> + Send;

    /// Insert a new RSVP.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - An RSVP with the same id exists → `RegistrationError::AlreadyExists`
    /// - Store write fails → `RegistrationError::StoreWriteFailed`
    fn insert(&self, rsvp: &UserRsvp) -> impl Future<Output = Result<()>> + Send;

    /// Replace the RSVP with the same id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - RSVP not found → `RegistrationError::NotFound`
    /// - Store write fails → `RegistrationError::StoreWriteFailed`
    fn replace(&self, rsvp: &UserRsvp) -> impl Future<Output = Result<()>> + Send;

    /// Count RSVPs by [`RSVP_STAT_FIELDS`].
    ///
    /// # Errors
    ///
    /// Returns error if the store query fails.
    fn stats(&self) -> impl Future<Output = Result<Stats>> + Send;
}

/// Check-in store.
pub trait CheckinStore: Send + Sync {
    /// Get the check-in of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Check-in not found → `RegistrationError::NotFound`
    /// - Store query fails → `RegistrationError::LookupFailed`
    fn find(&self, user_id: &UserId) -> impl Future<Output = Result<UserCheckin>> + Send;

    /// Insert a new check-in.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A check-in with the same id exists → `RegistrationError::AlreadyExists`
    /// - Store write fails → `RegistrationError::StoreWriteFailed`
    fn insert(&self, checkin: &UserCheckin) -> impl Future<Output = Result<()>> + Send;

    /// Replace the check-in with the same id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Check-in not found → `RegistrationError::NotFound`
    /// - Store write fails → `RegistrationError::StoreWriteFailed`
    fn replace(&self, checkin: &UserCheckin) -> impl Future<Output = Result<()>> + Send;

    /// Ids of every user with `hasCheckedIn` set, sorted.
    ///
    /// # Errors
    ///
    /// Returns error if the store query fails.
    fn checked_in_users(&self) -> impl Future<Output = Result<Vec<UserId>>> + Send;

    /// Count check-ins by [`CHECKIN_STAT_FIELDS`].
    ///
    /// # Errors
    ///
    /// Returns error if the store query fails.
    fn stats(&self) -> impl Future<Output = Result<Stats>> + Send;
}

/// Mailing list store.
///
/// Lists are never replaced wholesale; membership changes go through
/// [`MembershipUpdate`].
pub trait MailListStore: Send + Sync {
    /// Get a list by id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - List not found → `RegistrationError::NotFound`
    /// - Store query fails → `RegistrationError::LookupFailed`
    fn find(&self, list_id: &ListId) -> impl Future<Output = Result<MailList>> + Send;

    /// Insert a new list.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A list with the same id exists → `RegistrationError::AlreadyExists`
    /// - Store write fails → `RegistrationError::StoreWriteFailed`
    fn insert(&self, list: &MailList) -> impl Future<Output = Result<()>> + Send;

    /// Apply a membership change.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - List not found → `RegistrationError::NotFound`
    /// - Store write fails → `RegistrationError::StoreWriteFailed`
    fn update(
        &self,
        list_id: &ListId,
        update: &MembershipUpdate,
    ) -> impl Future<Output = Result<()>> + Send;
}

// ═══════════════════════════════════════════════════════════════════════
// Typed Mutations
// ═══════════════════════════════════════════════════════════════════════

/// Set mutation applied to a list's membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipUpdate {
    /// Set union: add each id not already present.
    Add(BTreeSet<UserId>),
    /// Set difference: remove each id that is present.
    Remove(BTreeSet<UserId>),
}

impl MembershipUpdate {
    /// Add each of `ids`.
    pub fn add(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self::Add(ids.into_iter().collect())
    }

    /// Remove each of `ids`.
    pub fn remove(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self::Remove(ids.into_iter().collect())
    }

    /// Ids named by the update.
    #[must_use]
    pub const fn ids(&self) -> &BTreeSet<UserId> {
        match self {
            Self::Add(ids) | Self::Remove(ids) => ids,
        }
    }

    /// Apply the update to an in-memory member set.
    pub fn apply(&self, members: &mut BTreeSet<UserId>) {
        match self {
            Self::Add(ids) => members.extend(ids.iter().cloned()),
            Self::Remove(ids) => members.retain(|id| !ids.contains(id)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Stats
// ═══════════════════════════════════════════════════════════════════════

/// Fields counted by [`RsvpStore::stats`].
pub const RSVP_STAT_FIELDS: &[&str] = &["isAttending"];

/// Fields counted by [`CheckinStore::stats`].
pub const CHECKIN_STAT_FIELDS: &[&str] = &["override", "hasCheckedIn", "hasPickedUpSwag"];

/// Record counts per field value: `field → value → count`.
///
/// Values are keyed by their JSON text (`"true"`, `"false"`, `"\"vegan\""`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(pub BTreeMap<String, BTreeMap<String, u64>>);

impl Stats {
    /// Count `fields` over serializable records.
    ///
    /// Records missing a field are not counted for it.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::LookupFailed` if a record cannot be
    /// serialized.
    pub fn tally<'a, T, I>(records: I, fields: &[&str]) -> Result<Self>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut stats = Self::default();
        for field in fields {
            stats.0.entry((*field).to_string()).or_default();
        }

        for record in records {
            let value = serde_json::to_value(record)
                .map_err(|e| RegistrationError::LookupFailed(format!("Failed to encode record: {e}")))?;

            for field in fields {
                if let Some(v) = value.get(*field) {
                    stats.record(field, &v.to_string(), 1);
                }
            }
        }

        Ok(stats)
    }

    /// Add `count` to `field = value`.
    pub fn record(&mut self, field: &str, value: &str, count: u64) {
        *self
            .0
            .entry(field.to_string())
            .or_default()
            .entry(value.to_string())
            .or_default() += count;
    }

    /// Number of records with `field = value`.
    #[must_use]
    pub fn count(&self, field: &str, value: &str) -> u64 {
        self.0
            .get(field)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::btree_set;
    use proptest::prelude::*;

    fn user_ids() -> impl Strategy<Value = BTreeSet<UserId>> {
        btree_set("[a-e]", 0..5).prop_map(|raw| raw.into_iter().map(UserId).collect())
    }

    proptest! {
        #[test]
        fn prop_add_then_remove_leaves_no_trace(members in user_ids(), ids in user_ids()) {
            let mut after = members.clone();
            MembershipUpdate::add(ids.clone()).apply(&mut after);
            MembershipUpdate::remove(ids.clone()).apply(&mut after);

            let expected: BTreeSet<_> = members.difference(&ids).cloned().collect();
            prop_assert_eq!(after, expected);
        }

        #[test]
        fn prop_updates_are_idempotent(members in user_ids(), ids in user_ids(), add in any::<bool>()) {
            let update = if add {
                MembershipUpdate::add(ids)
            } else {
                MembershipUpdate::remove(ids)
            };

            let mut once = members.clone();
            update.apply(&mut once);
            let mut twice = once.clone();
            update.apply(&mut twice);

            prop_assert_eq!(once, twice);
        }
    }

    fn ids(raw: &[&str]) -> BTreeSet<UserId> {
        raw.iter().copied().map(UserId::from).collect()
    }

    #[test]
    fn test_add_is_union() {
        let mut members = ids(&["a"]);
        MembershipUpdate::add(ids(&["a", "b"])).apply(&mut members);
        assert_eq!(members, ids(&["a", "b"]));
    }

    #[test]
    fn test_remove_is_difference() {
        let mut members = ids(&["a", "b"]);
        MembershipUpdate::remove(ids(&["a", "z"])).apply(&mut members);
        assert_eq!(members, ids(&["b"]));
    }

    #[test]
    fn test_tally_counts_bool_fields() {
        let rsvps = vec![
            UserRsvp::new(UserId::new("a"), true),
            UserRsvp::new(UserId::new("b"), true),
            UserRsvp::new(UserId::new("c"), false),
        ];

        let stats = Stats::tally(&rsvps, RSVP_STAT_FIELDS);

        assert_eq!(stats.as_ref().map(|s| s.count("isAttending", "true")), Ok(2));
        assert_eq!(stats.as_ref().map(|s| s.count("isAttending", "false")), Ok(1));
    }

    #[test]
    fn test_tally_lists_fields_with_no_records() {
        let none: Vec<UserCheckin> = Vec::new();
        let stats = Stats::tally(&none, CHECKIN_STAT_FIELDS).unwrap_or_default();

        assert_eq!(stats.0.len(), CHECKIN_STAT_FIELDS.len());
        assert_eq!(stats.count("override", "true"), 0);
    }
}
