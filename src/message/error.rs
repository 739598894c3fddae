//! Error types for message validation and persistence.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use super::domain::{MessageId, UserId};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while validating caller-supplied message fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent from the request.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The user identifier is not a UUID.
    #[error("invalid user id '{0}', expected a UUID")]
    InvalidUserId(String),

    /// The message identifier is not a UUID.
    #[error("invalid message id '{0}', expected a UUID")]
    InvalidMessageId(String),

    /// The server identifier is empty or whitespace-only.
    #[error("server_id must not be empty")]
    EmptyServerId,

    /// The message body is empty or whitespace-only.
    #[error("message must not be empty")]
    EmptyBody,
}

/// Errors that can occur during message persistence.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// No stored message has the requested identifier.
    #[error("message not found: {0}")]
    NotFound(MessageId),

    /// A read or write against the store failed.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),

    /// The store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// A bulk delete stopped after removing only part of the user's messages.
    ///
    /// Bulk deletes are not transactional. Repeating the delete removes the
    /// remainder.
    #[error("deleted {deleted} of {total} messages for user {user_id} before failing: {cause}")]
    PartialDelete {
        /// The user whose messages were being purged.
        user_id: UserId,
        /// Messages removed before the failure.
        deleted: usize,
        /// Messages selected for deletion.
        total: usize,
        /// The failure that interrupted the purge.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl RepositoryError {
    /// Wraps a persistence-layer error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Returns `true` when the error reports an absent message.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
