//! Selection between the durable and in-memory repositories.

use std::fmt;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use super::{memory::InMemoryMessageRepository, postgres::PostgresMessageRepository};
use crate::message::{
    domain::{Message, MessageId, NewMessage, UserId},
    ports::repository::{MessageRepository, RepositoryResult},
};

/// The repository backend chosen at startup.
///
/// The set of backends is closed: callers hold a `MessageStore` and never
/// branch on the configured mode themselves.
pub enum MessageStore<C: Clock + Send + Sync = DefaultClock> {
    /// `PostgreSQL`-backed persistence.
    Durable(PostgresMessageRepository<C>),
    /// Process-local storage used in integration mode.
    InMemory(InMemoryMessageRepository<C>),
}

impl<C: Clock + Send + Sync> Clone for MessageStore<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Durable(repo) => Self::Durable(repo.clone()),
            Self::InMemory(repo) => Self::InMemory(repo.clone()),
        }
    }
}

impl<C: Clock + Send + Sync> fmt::Debug for MessageStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable(repo) => f.debug_tuple("Durable").field(repo).finish(),
            Self::InMemory(repo) => f.debug_tuple("InMemory").field(repo).finish(),
        }
    }
}

impl<C: Clock + Send + Sync> MessageStore<C> {
    /// Returns a short name for the active backend, for logging.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Durable(_) => "postgres",
            Self::InMemory(_) => "in-memory",
        }
    }
}

impl<C: Clock + Send + Sync> From<PostgresMessageRepository<C>> for MessageStore<C> {
    fn from(repository: PostgresMessageRepository<C>) -> Self {
        Self::Durable(repository)
    }
}

impl<C: Clock + Send + Sync> From<InMemoryMessageRepository<C>> for MessageStore<C> {
    fn from(repository: InMemoryMessageRepository<C>) -> Self {
        Self::InMemory(repository)
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> MessageRepository for MessageStore<C> {
    async fn save(&self, message: &NewMessage) -> RepositoryResult<Message> {
        match self {
            Self::Durable(repo) => repo.save(message).await,
            Self::InMemory(repo) => repo.save(message).await,
        }
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Message> {
        match self {
            Self::Durable(repo) => repo.find_by_id(id).await,
            Self::InMemory(repo) => repo.find_by_id(id).await,
        }
    }

    async fn find_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<Vec<Message>> {
        match self {
            Self::Durable(repo) => repo.find_all_by_user_id(user_id).await,
            Self::InMemory(repo) => repo.find_all_by_user_id(user_id).await,
        }
    }

    async fn delete_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<usize> {
        match self {
            Self::Durable(repo) => repo.delete_all_by_user_id(user_id).await,
            Self::InMemory(repo) => repo.delete_all_by_user_id(user_id).await,
        }
    }
}
