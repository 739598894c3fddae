//! In-memory implementation of the `MessageRepository` port.
//!
//! Backs the service in integration mode and the unit tests, without any
//! database dependency. Not suitable for production use.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::message::{
    domain::{Message, MessageId, NewMessage, UserId},
    error::RepositoryError,
    ports::repository::{MessageRepository, RepositoryResult},
};

/// In-memory implementation of [`MessageRepository`].
///
/// Messages are kept in insertion order in a single sequence guarded by a
/// [`Mutex`], so concurrent callers never lose writes. Saves append; the bulk
/// delete rebuilds the sequence without the purged user's entries.
///
/// # Example
///
/// ```
/// use message_service::message::adapters::memory::InMemoryMessageRepository;
///
/// let repo = InMemoryMessageRepository::new();
/// assert!(repo.is_empty());
/// ```
pub struct InMemoryMessageRepository<C: Clock + Send + Sync = DefaultClock> {
    messages: Arc<Mutex<Vec<Message>>>,
    clock: Arc<C>,
}

impl InMemoryMessageRepository {
    /// Creates an empty repository using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share storage and clock, so `C` itself need not be `Clone`.
impl<C: Clock + Send + Sync> Clone for InMemoryMessageRepository<C> {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock + Send + Sync> fmt::Debug for InMemoryMessageRepository<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryMessageRepository")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<C: Clock + Send + Sync> InMemoryMessageRepository<C> {
    /// Creates an empty repository that stamps identifiers with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            clock,
        }
    }

    /// Returns the number of stored messages.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty repository. For error-propagating access, use
    /// the repository trait methods instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Vec<Message>>> {
        self.messages
            .lock()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> MessageRepository for InMemoryMessageRepository<C> {
    async fn save(&self, message: &NewMessage) -> RepositoryResult<Message> {
        let stored = message.with_id(MessageId::generate(self.clock.as_ref()));
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Message> {
        self.lock()?
            .iter()
            .find(|m| m.id() == id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn find_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<Vec<Message>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|m| m.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn delete_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<usize> {
        let mut guard = self.lock()?;
        let before = guard.len();
        let retained: Vec<Message> = guard
            .iter()
            .filter(|m| m.user_id() != user_id)
            .cloned()
            .collect();
        *guard = retained;
        Ok(before.saturating_sub(guard.len()))
    }
}
