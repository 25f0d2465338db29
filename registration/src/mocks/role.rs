//! Mock role service for testing.

use crate::error::{RegistrationError, Result};
use crate::models::UserId;
use crate::providers::RoleService;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock role service.
///
/// Records every grant so tests can assert on escalation side effects.
#[derive(Debug, Clone)]
pub struct MockRoleService {
    /// Whether to simulate success or failure.
    pub should_succeed: bool,
    granted: Arc<Mutex<Vec<UserId>>>,
}

impl MockRoleService {
    /// Create a mock role service that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            should_succeed: true,
            granted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock role service that rejects every grant.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_succeed: false,
            ..Self::new()
        }
    }

    /// Users granted the attendee role, in call order.
    ///
    /// Failed attempts are recorded too.
    #[must_use]
    pub fn granted(&self) -> Vec<UserId> {
        self.granted.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Default for MockRoleService {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleService for MockRoleService {
    fn grant_attendee_role(&self, user_id: &UserId) -> impl Future<Output = Result<()>> + Send {
        let granted = Arc::clone(&self.granted);
        let should_succeed = self.should_succeed;
        let user_id = user_id.clone();

        async move {
            granted
                .lock()
                .map_err(|_| RegistrationError::RoleGrantFailed {
                    user_id: user_id.to_string(),
                    reason: "mock lock poisoned".to_string(),
                })?
                .push(user_id.clone());

            if should_succeed {
                Ok(())
            } else {
                Err(RegistrationError::RoleGrantFailed {
                    user_id: user_id.to_string(),
                    reason: "auth service unavailable".to_string(),
                })
            }
        }
    }
}
