//! Mock mail provider for testing.

use crate::error::{RegistrationError, Result};
use crate::models::{MailInfo, MailStatus};
use crate::providers::MailProvider;
use serde_json::json;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock mail provider.
///
/// Simulates transmissions without sending email and records every payload.
#[derive(Debug, Clone)]
pub struct MockMailProvider {
    /// Status returned on success. `None` simulates a `500` from the provider.
    pub response: Option<MailStatus>,
    sent: Arc<Mutex<Vec<MailInfo>>>,
}

impl MockMailProvider {
    /// Create a mock provider that accepts every recipient.
    #[must_use]
    pub fn new() -> Self {
        Self {
            response: Some(MailStatus(json!({
                "results": {
                    "total_rejected_recipients": 0,
                    "id": "11668787484950529",
                }
            }))),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider that rejects every transmission.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            response: None,
            ..Self::new()
        }
    }

    /// Transmissions received, in call order.
    #[must_use]
    pub fn sent(&self) -> Vec<MailInfo> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for MockMailProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MailProvider for MockMailProvider {
    fn send(&self, mail_info: &MailInfo) -> impl Future<Output = Result<MailStatus>> + Send {
        let sent = Arc::clone(&self.sent);
        let response = self.response.clone();
        let mail_info = mail_info.clone();

        async move {
            sent.lock()
                .map_err(|_| RegistrationError::DispatchFailed {
                    status: None,
                    reason: "mock lock poisoned".to_string(),
                })?
                .push(mail_info);

            response.ok_or_else(|| RegistrationError::DispatchFailed {
                status: Some(500),
                reason: "Internal Server Error".to_string(),
            })
        }
    }
}
