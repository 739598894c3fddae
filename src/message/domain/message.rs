//! The stored message aggregate and its unsaved counterpart.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MessageId, ServerId, UserId};
use crate::message::error::ValidationError;

/// Free-text message body.
///
/// Bodies must contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageBody(String);

impl MessageBody {
    /// Creates a message body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyBody`] when the text is blank.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = text.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(Self(raw))
    }

    /// Returns the body text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageBody {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageBody> for String {
    fn from(value: MessageBody) -> Self {
        value.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated message that has not been persisted yet.
///
/// It carries no identifier: the repository mints one on save, so callers
/// cannot choose or forge message identifiers.
///
/// # Examples
///
/// ```
/// use message_service::message::domain::{MessageBody, NewMessage, ServerId};
///
/// let draft = NewMessage::new(
///     "123e4567-e89b-12d3-a456-426614174000".parse().expect("valid user id"),
///     ServerId::new("general").expect("valid server id"),
///     MessageBody::new("hello").expect("valid body"),
/// );
/// assert_eq!(draft.body().as_str(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    user_id: UserId,
    server_id: ServerId,
    body: MessageBody,
}

impl NewMessage {
    /// Creates an unsaved message from validated parts.
    #[must_use]
    pub const fn new(user_id: UserId, server_id: ServerId, body: MessageBody) -> Self {
        Self {
            user_id,
            server_id,
            body,
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the server the message was posted to.
    #[must_use]
    pub const fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    /// Returns the message body.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Binds the draft to a repository-assigned identifier.
    #[must_use]
    pub fn with_id(&self, id: MessageId) -> Message {
        Message {
            id,
            user_id: self.user_id,
            server_id: self.server_id.clone(),
            body: self.body.clone(),
        }
    }
}

/// A persisted message.
///
/// Messages are immutable once stored. Serialises as
/// `{"id", "user_id", "server_id", "message"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    user_id: UserId,
    server_id: ServerId,
    #[serde(rename = "message")]
    body: MessageBody,
}

impl Message {
    /// Reconstructs a message loaded from storage.
    #[must_use]
    pub const fn from_persisted(
        id: MessageId,
        user_id: UserId,
        server_id: ServerId,
        body: MessageBody,
    ) -> Self {
        Self {
            id,
            user_id,
            server_id,
            body,
        }
    }

    /// Returns the repository-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the server the message was posted to.
    #[must_use]
    pub const fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    /// Returns the message body.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns `true` when the message carries the same content as `draft`.
    #[must_use]
    pub fn matches(&self, draft: &NewMessage) -> bool {
        self.user_id == draft.user_id
            && self.server_id == draft.server_id
            && self.body == draft.body
    }
}
