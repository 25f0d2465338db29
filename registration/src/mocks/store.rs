//! In-memory stores for testing.

use crate::error::{RegistrationError, Result};
use crate::models::{ListId, MailList, UserCheckin, UserId, UserRsvp};
use crate::providers::{
    CHECKIN_STAT_FIELDS, CheckinStore, MailListStore, MembershipUpdate, RSVP_STAT_FIELDS,
    RsvpStore, Stats,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

fn poisoned() -> RegistrationError {
    RegistrationError::LookupFailed("store lock poisoned".to_string())
}

/// Mock RSVP store.
///
/// Uses in-memory storage for testing.
#[derive(Debug, Clone, Default)]
pub struct MockRsvpStore {
    rsvps: Arc<Mutex<HashMap<UserId, UserRsvp>>>,
    fail_reads: Arc<AtomicBool>,
}

impl MockRsvpStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `rsvps`.
    #[must_use]
    pub fn with_rsvps(rsvps: impl IntoIterator<Item = UserRsvp>) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.rsvps.lock() {
            guard.extend(rsvps.into_iter().map(|rsvp| (rsvp.id.clone(), rsvp)));
        }
        store
    }

    /// Make every subsequent read fail with `LookupFailed`.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }
}

impl RsvpStore for MockRsvpStore {
    fn find(&self, user_id: &UserId) -> impl Future<Output = Result<UserRsvp>> + Send {
        let rsvps = Arc::clone(&self.rsvps);
        let fail = self.fail_reads.load(Ordering::SeqCst);
        let user_id = user_id.clone();

        async move {
            if fail {
                return Err(RegistrationError::LookupFailed("connection reset".to_string()));
            }

            rsvps
                .lock()
                .map_err(|_| poisoned())?
                .get(&user_id)
                .cloned()
                .ok_or_else(|| RegistrationError::not_found("rsvp", user_id.as_str()))
        }
    }

    fn insert(&self, rsvp: &UserRsvp) -> impl Future<Output = Result<()>> + Send {
        let rsvps = Arc::clone(&self.rsvps);
        let rsvp = rsvp.clone();

        async move {
            let mut guard = rsvps.lock().map_err(|_| poisoned())?;
            if guard.contains_key(&rsvp.id) {
                return Err(RegistrationError::already_exists("rsvp", rsvp.id.as_str()));
            }
            guard.insert(rsvp.id.clone(), rsvp);
            Ok(())
        }
    }

    fn replace(&self, rsvp: &UserRsvp) -> impl Future<Output = Result<()>> + Send {
        let rsvps = Arc::clone(&self.rsvps);
        let rsvp = rsvp.clone();

        async move {
            let mut guard = rsvps.lock().map_err(|_| poisoned())?;
            match guard.get_mut(&rsvp.id) {
                Some(existing) => {
                    *existing = rsvp;
                    Ok(())
                }
                None => Err(RegistrationError::not_found("rsvp", rsvp.id.as_str())),
            }
        }
    }

    fn stats(&self) -> impl Future<Output = Result<Stats>> + Send {
        let rsvps = Arc::clone(&self.rsvps);

        async move {
            let guard = rsvps.lock().map_err(|_| poisoned())?;
            Stats::tally(guard.values(), RSVP_STAT_FIELDS)
        }
    }
}

/// Mock check-in store.
///
/// Uses in-memory storage for testing.
#[derive(Debug, Clone, Default)]
pub struct MockCheckinStore {
    checkins: Arc<Mutex<HashMap<UserId, UserCheckin>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockCheckinStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `StoreWriteFailed`.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Number of stored check-ins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkins.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self, checkin: &UserCheckin, must_exist: bool) -> impl Future<Output = Result<()>> + Send {
        let checkins = Arc::clone(&self.checkins);
        let fail = self.fail_writes.load(Ordering::SeqCst);
        let checkin = checkin.clone();

        async move {
            if fail {
                return Err(RegistrationError::StoreWriteFailed("disk full".to_string()));
            }

            let mut guard = checkins
                .lock()
                .map_err(|_| RegistrationError::StoreWriteFailed("store lock poisoned".to_string()))?;

            match (guard.contains_key(&checkin.id), must_exist) {
                (true, false) => Err(RegistrationError::already_exists("checkin", checkin.id.as_str())),
                (false, true) => Err(RegistrationError::not_found("checkin", checkin.id.as_str())),
                _ => {
                    guard.insert(checkin.id.clone(), checkin);
                    Ok(())
                }
            }
        }
    }
}

impl CheckinStore for MockCheckinStore {
    fn find(&self, user_id: &UserId) -> impl Future<Output = Result<UserCheckin>> + Send {
        let checkins = Arc::clone(&self.checkins);
        let user_id = user_id.clone();

        async move {
            checkins
                .lock()
                .map_err(|_| poisoned())?
                .get(&user_id)
                .cloned()
                .ok_or_else(|| RegistrationError::not_found("checkin", user_id.as_str()))
        }
    }

    fn insert(&self, checkin: &UserCheckin) -> impl Future<Output = Result<()>> + Send {
        self.write(checkin, false)
    }

    fn replace(&self, checkin: &UserCheckin) -> impl Future<Output = Result<()>> + Send {
        self.write(checkin, true)
    }

    fn checked_in_users(&self) -> impl Future<Output = Result<Vec<UserId>>> + Send {
        let checkins = Arc::clone(&self.checkins);

        async move {
            let guard = checkins.lock().map_err(|_| poisoned())?;
            let mut ids: Vec<UserId> = guard
                .values()
                .filter(|checkin| checkin.has_checked_in)
                .map(|checkin| checkin.id.clone())
                .collect();
            ids.sort();
            Ok(ids)
        }
    }

    fn stats(&self) -> impl Future<Output = Result<Stats>> + Send {
        let checkins = Arc::clone(&self.checkins);

        async move {
            let guard = checkins.lock().map_err(|_| poisoned())?;
            Stats::tally(guard.values(), CHECKIN_STAT_FIELDS)
        }
    }
}

/// Mock mailing list store.
///
/// Uses in-memory storage for testing.
#[derive(Debug, Clone, Default)]
pub struct MockMailListStore {
    lists: Arc<Mutex<HashMap<ListId, MailList>>>,
}

impl MockMailListStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MailListStore for MockMailListStore {
    fn find(&self, list_id: &ListId) -> impl Future<Output = Result<MailList>> + Send {
        let lists = Arc::clone(&self.lists);
        let list_id = list_id.clone();

        async move {
            lists
                .lock()
                .map_err(|_| poisoned())?
                .get(&list_id)
                .cloned()
                .ok_or_else(|| RegistrationError::not_found("mail list", list_id.as_str()))
        }
    }

    fn insert(&self, list: &MailList) -> impl Future<Output = Result<()>> + Send {
        let lists = Arc::clone(&self.lists);
        let list = list.clone();

        async move {
            let mut guard = lists.lock().map_err(|_| poisoned())?;
            if guard.contains_key(&list.id) {
                return Err(RegistrationError::already_exists("mail list", list.id.as_str()));
            }
            guard.insert(list.id.clone(), list);
            Ok(())
        }
    }

    fn update(
        &self,
        list_id: &ListId,
        update: &MembershipUpdate,
    ) -> impl Future<Output = Result<()>> + Send {
        let lists = Arc::clone(&self.lists);
        let list_id = list_id.clone();
        let update = update.clone();

        async move {
            let mut guard = lists.lock().map_err(|_| poisoned())?;
            let list = guard
                .get_mut(&list_id)
                .ok_or_else(|| RegistrationError::not_found("mail list", list_id.as_str()))?;
            update.apply(&mut list.user_ids);
            Ok(())
        }
    }
}
