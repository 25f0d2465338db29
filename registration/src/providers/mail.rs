//! Mail provider trait.

use crate::error::Result;
use crate::models::{MailInfo, MailStatus};
use std::future::Future;

/// Mail provider.
///
/// This trait abstracts over transactional email services that render a
/// stored template once per recipient (SparkPost, and compatible APIs).
pub trait MailProvider: Send + Sync {
    /// Submit one transmission.
    ///
    /// Exactly one request is made; failures are not retried.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails → `RegistrationError::DispatchFailed`
    /// - Provider answers with a non-OK status → `RegistrationError::DispatchFailed`
    /// - Response body is not JSON → `RegistrationError::InvalidProviderResponse`
    fn send(&self, mail_info: &MailInfo) -> impl Future<Output = Result<MailStatus>> + Send;
}
