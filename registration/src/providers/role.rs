//! Role service trait.

use crate::error::Result;
use crate::models::UserId;
use std::future::Future;

/// Role assigned to users admitted through a staff override.
pub const ATTENDEE_ROLE: &str = "Attendee";

/// Role service.
///
/// This trait abstracts over the identity service that owns user roles.
pub trait RoleService: Send + Sync {
    /// Grant the attendee role to `user_id`.
    ///
    /// Granting a role the user already holds is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::RoleGrantFailed` if:
    /// - Network request fails
    /// - The role service rejects the request
    fn grant_attendee_role(&self, user_id: &UserId) -> impl Future<Output = Result<()>> + Send;
}
