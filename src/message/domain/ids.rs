//! Identifier newtypes for messages, their owners, and the servers they were
//! posted to.
//!
//! Wrapping the raw values keeps a user identifier from being passed where a
//! message identifier is expected and centralises parsing of untrusted input.

use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use uuid::{ContextV7, Timestamp, Uuid};

use crate::message::error::ValidationError;

/// Process-wide counter keeping identifiers minted within one millisecond in
/// creation order.
static ID_CONTEXT: Mutex<ContextV7> = Mutex::new(ContextV7::new());

/// Unique, time-ordered identifier for a stored message.
///
/// Identifiers are minted by the repository when a message is saved. They are
/// `UUIDv7` values sharing one monotonic counter, so their natural ordering
/// follows creation order even within a single millisecond or under a frozen
/// clock.
///
/// # Examples
///
/// ```
/// use message_service::message::domain::MessageId;
/// use mockable::DefaultClock;
///
/// let id = MessageId::generate(&DefaultClock);
/// assert_eq!(id.as_ref().get_version_num(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Mints a new identifier stamped with the clock's current time.
    ///
    /// A clock reading before the Unix epoch cannot be encoded in a `UUIDv7`
    /// and is stamped as the epoch itself. Such identifiers still sort after
    /// every identifier minted earlier in the process.
    #[must_use]
    pub fn generate(clock: &impl Clock) -> Self {
        let now = clock.utc();
        let (seconds, nanos) = unix_parts(now.timestamp(), now.timestamp_subsec_nanos());
        let timestamp = Timestamp::from_unix(&ID_CONTEXT, seconds, nanos);
        Self(Uuid::new_v7(timestamp))
    }

    /// Creates a message identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

/// Splits a signed Unix time into the unsigned parts a `UUIDv7` encodes,
/// clamping pre-epoch readings to the epoch.
pub(crate) fn unix_parts(seconds: i64, nanos: u32) -> (u64, u32) {
    u64::try_from(seconds).map_or((0, 0), |secs| (secs, nanos))
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidMessageId(value.to_owned()))
    }
}

impl AsRef<Uuid> for MessageId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user owning a message.
///
/// Users are managed by another service; this service only requires that the
/// identifier is a well-formed UUID.
///
/// # Examples
///
/// ```
/// use message_service::message::domain::UserId;
///
/// let user: UserId = "123e4567-e89b-12d3-a456-426614174000".parse().expect("valid uuid");
/// assert_eq!(user.to_string(), "123e4567-e89b-12d3-a456-426614174000");
/// assert!("not-a-uuid".parse::<UserId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a user identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidUserId(value.to_owned()))
    }
}

impl AsRef<Uuid> for UserId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the server (channel) a message was posted to.
///
/// Server identifiers are opaque strings owned by another service; the only
/// requirement is that they are not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerId(String);

impl ServerId {
    /// Creates a server identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyServerId`] when the value is empty or
    /// whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyServerId);
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServerId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServerId> for String {
    fn from(value: ServerId) -> Self {
        value.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
