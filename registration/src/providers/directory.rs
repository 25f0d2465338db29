//! User directory trait.

use crate::error::Result;
use crate::models::{UserId, UserInfo};
use std::future::Future;

/// User directory.
///
/// Resolves user ids to the email address and display name used for mail.
pub trait UserDirectory: Send + Sync {
    /// Look up a user.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - User not found → `RegistrationError::NotFound`
    /// - Network request fails → `RegistrationError::LookupFailed`
    fn user_info(&self, user_id: &UserId) -> impl Future<Output = Result<UserInfo>> + Send;
}
