//! Mock user directory for testing.

use crate::error::{RegistrationError, Result};
use crate::models::{UserId, UserInfo};
use crate::providers::UserDirectory;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock user directory.
///
/// Unknown ids resolve to `NotFound`; ids marked with
/// [`MockUserDirectory::fail_for`] resolve to `LookupFailed`.
#[derive(Debug, Clone, Default)]
pub struct MockUserDirectory {
    users: Arc<Mutex<HashMap<UserId, UserInfo>>>,
    broken: Arc<Mutex<Vec<UserId>>>,
}

impl MockUserDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user; its email is `{id}@example.com`.
    #[must_use]
    pub fn with_user(self, id: &str, username: &str) -> Self {
        if let Ok(mut users) = self.users.lock() {
            users.insert(
                UserId::new(id),
                UserInfo {
                    id: UserId::new(id),
                    username: username.to_string(),
                    email: format!("{id}@example.com"),
                },
            );
        }
        self
    }

    /// Make lookups of `id` fail as if the user service were down.
    #[must_use]
    pub fn fail_for(self, id: &str) -> Self {
        if let Ok(mut broken) = self.broken.lock() {
            broken.push(UserId::new(id));
        }
        self
    }
}

impl UserDirectory for MockUserDirectory {
    fn user_info(&self, user_id: &UserId) -> impl Future<Output = Result<UserInfo>> + Send {
        let users = Arc::clone(&self.users);
        let broken = Arc::clone(&self.broken);
        let user_id = user_id.clone();

        async move {
            let is_broken = broken
                .lock()
                .map_err(|_| RegistrationError::LookupFailed("mock lock poisoned".to_string()))?
                .contains(&user_id);
            if is_broken {
                return Err(RegistrationError::LookupFailed("user service returned 500".to_string()));
            }

            users
                .lock()
                .map_err(|_| RegistrationError::LookupFailed("mock lock poisoned".to_string()))?
                .get(&user_id)
                .cloned()
                .ok_or_else(|| RegistrationError::not_found("user", user_id.as_str()))
        }
    }
}
