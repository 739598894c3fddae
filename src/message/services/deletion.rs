//! Consumption of user-deletion events.
//!
//! Each event names a user whose messages must be purged. Events arrive
//! already acknowledged, so a failed purge is logged and the event is lost.

use std::str::{self, FromStr};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::message::{
    domain::UserId,
    error::{RepositoryError, ValidationError},
    ports::{deletion_source::DeletionSource, repository::MessageRepository},
};

/// Prefix of the plain-text event emitted by the user service.
const PLAIN_TEXT_PREFIX: &str = "Deletion request for user:";

/// Errors raised while decoding a deletion event body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeletionEventError {
    /// The body is not valid UTF-8.
    #[error("event body is not valid UTF-8")]
    NotUtf8,

    /// The body does not carry a user identifier in any known format.
    #[error("event body does not name a user: {0:?}")]
    Unrecognised(String),

    /// The body names a user, but the identifier is not a UUID.
    #[error(transparent)]
    InvalidUserId(#[from] ValidationError),
}

#[derive(Deserialize)]
struct DeletionPayload {
    id: String,
}

/// A request to purge every message owned by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionEvent {
    user_id: UserId,
}

impl DeletionEvent {
    /// Creates an event for `user_id`.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Decodes an event body.
    ///
    /// Accepted forms are a JSON object `{"id": "<uuid>"}`, the plain-text
    /// notice `Deletion request for user: <uuid>`, or a bare UUID.
    ///
    /// # Errors
    ///
    /// Returns [`DeletionEventError`] when the body is not UTF-8, matches no
    /// known form, or names an identifier that is not a UUID.
    ///
    /// # Examples
    ///
    /// ```
    /// use message_service::message::services::DeletionEvent;
    ///
    /// let json = DeletionEvent::parse(br#"{"id": "123e4567-e89b-12d3-a456-426614174000"}"#);
    /// let text = DeletionEvent::parse(b"Deletion request for user: 123e4567-e89b-12d3-a456-426614174000");
    /// assert_eq!(json, text);
    /// ```
    pub fn parse(body: &[u8]) -> Result<Self, DeletionEventError> {
        let text = str::from_utf8(body)
            .map_err(|_| DeletionEventError::NotUtf8)?
            .trim();

        if text.starts_with('{') {
            let payload: DeletionPayload = serde_json::from_str(text)
                .map_err(|_| DeletionEventError::Unrecognised(text.to_owned()))?;
            return Ok(Self::new(UserId::from_str(&payload.id)?));
        }

        let candidate = text
            .strip_prefix(PLAIN_TEXT_PREFIX)
            .map_or(text, str::trim_start);
        if candidate.is_empty() {
            return Err(DeletionEventError::Unrecognised(text.to_owned()));
        }
        Ok(Self::new(UserId::from_str(candidate)?))
    }

    /// Returns the user whose messages must be purged.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Result of handling a single delivery.
#[derive(Debug, Clone)]
pub enum DeletionOutcome {
    /// The user's messages were purged.
    Purged {
        /// The purged user.
        user_id: UserId,
        /// Number of messages removed.
        deleted: usize,
    },
    /// The body could not be decoded and was dropped.
    Rejected(DeletionEventError),
    /// The repository failed to purge the user's messages.
    Failed {
        /// The user whose purge failed.
        user_id: UserId,
        /// The repository failure.
        error: RepositoryError,
    },
}

/// Counters describing a finished consumer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerSummary {
    /// Deliveries received, including rejected ones.
    pub received: usize,
    /// Events whose purge succeeded.
    pub purged: usize,
    /// Deliveries dropped as undecodable.
    pub rejected: usize,
    /// Events whose purge failed.
    pub failed: usize,
}

impl ConsumerSummary {
    fn record(&mut self, outcome: &DeletionOutcome) {
        self.received = self.received.saturating_add(1);
        let counter = match outcome {
            DeletionOutcome::Purged { .. } => &mut self.purged,
            DeletionOutcome::Rejected(_) => &mut self.rejected,
            DeletionOutcome::Failed { .. } => &mut self.failed,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Drains a [`DeletionSource`], purging each named user's messages.
///
/// Events are handled strictly one at a time in arrival order.
#[derive(Clone)]
pub struct DeletionConsumer<R>
where
    R: MessageRepository,
{
    repository: Arc<R>,
}

impl<R> DeletionConsumer<R>
where
    R: MessageRepository,
{
    /// Creates a consumer purging from `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Handles one delivery body.
    pub async fn handle(&self, body: &[u8]) -> DeletionOutcome {
        info!(body = %String::from_utf8_lossy(body), "received deletion event");
        let event = match DeletionEvent::parse(body) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "dropping undecodable deletion event");
                return DeletionOutcome::Rejected(err);
            }
        };

        let user_id = event.user_id();
        match self.repository.delete_all_by_user_id(user_id).await {
            Ok(deleted) => {
                info!(%user_id, deleted, "purged messages for deleted user");
                DeletionOutcome::Purged { user_id, deleted }
            }
            Err(err) => {
                error!(%user_id, error = %err, "failed to purge messages for deleted user");
                DeletionOutcome::Failed {
                    user_id,
                    error: err,
                }
            }
        }
    }

    /// Consumes deliveries until the source ends.
    ///
    /// A delivery error means the subscription is broken; it ends the run
    /// like an exhausted source. Neither is retried.
    pub async fn run<S>(&self, source: &mut S) -> ConsumerSummary
    where
        S: DeletionSource + ?Sized,
    {
        let mut summary = ConsumerSummary::default();
        while let Some(delivery) = source.next_delivery().await {
            match delivery {
                Ok(body) => {
                    let outcome = self.handle(&body).await;
                    summary.record(&outcome);
                }
                Err(err) => {
                    error!(error = %err, "deletion subscription failed");
                    break;
                }
            }
        }
        warn!(
            received = summary.received,
            purged = summary.purged,
            "deletion subscription ended"
        );
        summary
    }
}
