//! Registration data types.
//!
//! Records owned by the stores (RSVPs, check-ins, mailing lists) and the
//! transient values that flow through mail dispatch. Field names on the
//! wire follow the registration API's JSON (`isAttending`, `userIds`, ...).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// External user identifier.
///
/// Shared by RSVPs, check-ins, and mailing-list membership. Identifiers
/// are always supplied by callers, never generated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a user id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Mailing list identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub String);

impl ListId {
    /// Create a list id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Store Records
// ═══════════════════════════════════════════════════════════════════════

/// A user's RSVP.
///
/// Only `is_attending` matters to check-in; the remaining answers are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRsvp {
    /// User the RSVP belongs to.
    pub id: UserId,

    /// Whether the user intends to attend.
    pub is_attending: bool,

    /// Other RSVP answers (dietary restrictions, shirt size, ...).
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl UserRsvp {
    /// Create an RSVP with no extra answers.
    #[must_use]
    pub fn new(id: UserId, is_attending: bool) -> Self {
        Self {
            id,
            is_attending,
            details: Map::new(),
        }
    }
}

/// A user's check-in record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCheckin {
    /// User the check-in belongs to.
    pub id: UserId,

    /// Staff override: bypasses the RSVP requirement and grants the
    /// attendee role.
    #[serde(rename = "override", default)]
    pub staff_override: bool,

    /// Whether the user has physically checked in.
    #[serde(default)]
    pub has_checked_in: bool,

    /// Whether the user has collected their swag.
    #[serde(default)]
    pub has_picked_up_swag: bool,
}

impl UserCheckin {
    /// Create a checked-in record without override.
    #[must_use]
    pub fn checked_in(id: UserId) -> Self {
        Self {
            id,
            has_checked_in: true,
            ..Self::default()
        }
    }

    /// Set the staff override flag.
    #[must_use]
    pub const fn with_override(mut self, staff_override: bool) -> Self {
        self.staff_override = staff_override;
        self
    }
}

/// Named set of users targeted by bulk mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailList {
    /// List identifier.
    pub id: ListId,

    /// Members. Duplicates collapse; order carries no meaning.
    #[serde(default)]
    pub user_ids: BTreeSet<UserId>,
}

impl MailList {
    /// Create a list with an initial member set.
    #[must_use]
    pub fn new(id: ListId, user_ids: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            id,
            user_ids: user_ids.into_iter().collect(),
        }
    }
}

/// Directory entry for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User identifier.
    pub id: UserId,

    /// Display name.
    pub username: String,

    /// Email address.
    pub email: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Mail Requests
// ═══════════════════════════════════════════════════════════════════════

/// Request to mail an explicit sequence of users.
///
/// Order is preserved: recipient `i` of the built transmission corresponds
/// to `ids[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailOrder {
    /// Recipients, in order.
    pub ids: Vec<UserId>,

    /// Provider template id.
    pub template: String,
}

/// Request to mail every member of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailOrderList {
    /// List whose members receive the mail.
    pub list_id: ListId,

    /// Provider template id.
    pub template: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Provider Wire Types
// ═══════════════════════════════════════════════════════════════════════

/// Transmission payload sent to the mail provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailInfo {
    /// Template selection.
    pub content: Content,

    /// Personalized recipients.
    pub recipients: Vec<Recipient>,
}

/// Transmission content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Stored template to render.
    pub template_id: String,
}

/// One personalized recipient of a transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Where to deliver.
    pub address: Address,

    /// Template variables for this recipient.
    #[serde(rename = "substitution_data")]
    pub substitutions: Substitutions,
}

impl Recipient {
    /// Build the recipient for a resolved user.
    #[must_use]
    pub fn for_user(user: &UserInfo) -> Self {
        Self {
            address: Address {
                email: user.email.clone(),
                name: user.username.clone(),
            },
            substitutions: Substitutions::for_user(user),
        }
    }
}

/// Recipient address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Email address.
    pub email: String,

    /// Display name.
    pub name: String,
}

/// Template variables, keyed by variable name.
///
/// `name` is always present. Templates only reference the keys they know,
/// so adding keys never breaks an existing template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Substitutions(pub BTreeMap<String, String>);

impl Substitutions {
    /// Variable bound to the recipient's display name.
    pub const NAME: &'static str = "name";

    /// Substitutions derived from a directory entry.
    #[must_use]
    pub fn for_user(user: &UserInfo) -> Self {
        let mut substitutions = Self::default();
        substitutions.insert(Self::NAME, user.username.clone());
        substitutions
    }

    /// Bind a variable, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Provider response to a transmission.
///
/// Returned to the caller exactly as decoded; its structure is the
/// provider's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MailStatus(pub Value);
