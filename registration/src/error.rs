//! Error types for check-in, RSVP, and mail dispatch operations.

use thiserror::Error;

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Error taxonomy for the registration workflows.
///
/// Every failure carries enough context for a calling layer (an HTTP
/// controller, a CLI) to map it to a transport response without inspecting
/// message text. Use [`RegistrationError::kind`] for that mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    // ═══════════════════════════════════════════════════════════
    // Store Errors
    // ═══════════════════════════════════════════════════════════

    /// Record absent.
    ///
    /// Sometimes an expected outcome (e.g. "RSVP not yet filed"), so it is
    /// kept apart from every other store failure.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of record that was looked up
        resource: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A record with this id already exists.
    #[error("{resource} with id {id} already exists")]
    AlreadyExists {
        /// Kind of record that was being created
        resource: &'static str,
        /// Identifier of the existing record
        id: String,
    },

    /// A read failed for a reason other than "not found".
    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    /// A write failed.
    #[error("Store write failed: {0}")]
    StoreWriteFailed(String),

    // ═══════════════════════════════════════════════════════════
    // Check-in Errors
    // ═══════════════════════════════════════════════════════════

    /// The user has not RSVPed as attending and no staff override was given.
    #[error("Attendee {user_id} must be RSVPed to check-in (or have a staff override)")]
    IneligibleCheckin {
        /// User that was refused
        user_id: String,
    },

    /// The check-in was written but the attendee role could not be granted.
    ///
    /// The check-in record stays persisted; retry the grant independently.
    #[error("Failed to grant attendee role to {user_id}: {reason}")]
    RoleGrantFailed {
        /// User whose role escalation failed
        user_id: String,
        /// Failure reported by the role service
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Mail Errors
    // ═══════════════════════════════════════════════════════════

    /// Mailing list absent.
    #[error("Mailing list {list_id} not found")]
    ListNotFound {
        /// Identifier of the missing list
        list_id: String,
    },

    /// A recipient could not be resolved; the whole batch was abandoned.
    #[error("Failed to resolve user {user_id}: {reason}")]
    UserResolutionFailed {
        /// First user that failed to resolve
        user_id: String,
        /// Failure reported by the user directory
        reason: String,
    },

    /// The mail provider rejected the transmission or was unreachable.
    #[error("Failed to send mail (status {status:?}): {reason}")]
    DispatchFailed {
        /// HTTP status returned by the provider, if a response arrived
        status: Option<u16>,
        /// Response body or transport error
        reason: String,
    },

    /// The provider accepted the transmission but its body was not JSON.
    #[error("Invalid provider response: {0}")]
    InvalidProviderResponse(String),

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable discriminant of a [`RegistrationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`RegistrationError::NotFound`].
    NotFound,
    /// See [`RegistrationError::AlreadyExists`].
    AlreadyExists,
    /// See [`RegistrationError::LookupFailed`].
    LookupFailed,
    /// See [`RegistrationError::StoreWriteFailed`].
    StoreWriteFailed,
    /// See [`RegistrationError::IneligibleCheckin`].
    IneligibleCheckin,
    /// See [`RegistrationError::RoleGrantFailed`].
    RoleGrantFailed,
    /// See [`RegistrationError::ListNotFound`].
    ListNotFound,
    /// See [`RegistrationError::UserResolutionFailed`].
    UserResolutionFailed,
    /// See [`RegistrationError::DispatchFailed`].
    DispatchFailed,
    /// See [`RegistrationError::InvalidProviderResponse`].
    InvalidProviderResponse,
    /// See [`RegistrationError::Config`].
    Config,
}

impl RegistrationError {
    /// Shorthand for [`RegistrationError::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Shorthand for [`RegistrationError::AlreadyExists`].
    #[must_use]
    pub fn already_exists(resource: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource,
            id: id.into(),
        }
    }

    /// Returns the discriminant of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::LookupFailed(_) => ErrorKind::LookupFailed,
            Self::StoreWriteFailed(_) => ErrorKind::StoreWriteFailed,
            Self::IneligibleCheckin { .. } => ErrorKind::IneligibleCheckin,
            Self::RoleGrantFailed { .. } => ErrorKind::RoleGrantFailed,
            Self::ListNotFound { .. } => ErrorKind::ListNotFound,
            Self::UserResolutionFailed { .. } => ErrorKind::UserResolutionFailed,
            Self::DispatchFailed { .. } => ErrorKind::DispatchFailed,
            Self::InvalidProviderResponse(_) => ErrorKind::InvalidProviderResponse,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns `true` if the record was simply absent.
    ///
    /// # Examples
    ///
    /// ```
    /// # use event_registration::RegistrationError;
    /// assert!(RegistrationError::not_found("rsvp", "u1").is_not_found());
    /// assert!(!RegistrationError::LookupFailed("timeout".into()).is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the caller, not the system, is at fault.
    ///
    /// A boundary typically maps these to 4xx responses.
    ///
    /// # Examples
    ///
    /// ```
    /// # use event_registration::RegistrationError;
    /// let refused = RegistrationError::IneligibleCheckin { user_id: "u1".into() };
    /// assert!(refused.is_client_error());
    /// assert!(!RegistrationError::StoreWriteFailed("disk full".into()).is_client_error());
    /// ```
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::AlreadyExists { .. }
                | Self::IneligibleCheckin { .. }
                | Self::ListNotFound { .. }
        )
    }

    /// Reclassifies a read failure.
    ///
    /// `NotFound` and `LookupFailed` are kept; anything else becomes
    /// `LookupFailed` carrying the original message.
    #[must_use]
    pub fn into_lookup_failure(self) -> Self {
        match self {
            Self::NotFound { .. } | Self::LookupFailed(_) => self,
            other => Self::LookupFailed(other.to_string()),
        }
    }
}
