//! Repository port for message persistence.
//!
//! Defines the abstract interface for storing and retrieving messages,
//! allowing different persistence implementations (`PostgreSQL`, in-memory, etc.).

use crate::message::{
    domain::{Message, MessageId, NewMessage, UserId},
    error::RepositoryError,
};
use async_trait::async_trait;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Port for message persistence operations.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Message IDs are minted by the repository and unique across the system
/// - Messages are immutable after storage (no update operations)
/// - Absence is reported as [`RepositoryError::NotFound`], never as a generic
///   failure or an empty success
/// - Concurrent access is handled safely
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Stores a new message under a freshly minted identifier and returns the
    /// stored copy.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write cannot be completed.
    async fn save(&self, message: &NewMessage) -> RepositoryResult<Message>;

    /// Retrieves a message by its ID.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no message has the identifier,
    /// or another `RepositoryError` if the query fails.
    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Message>;

    /// Retrieves every message owned by the user, in no particular order.
    ///
    /// Returns an empty vector if the user owns no messages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn find_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<Vec<Message>>;

    /// Deletes every message owned by the user and returns how many were
    /// removed.
    ///
    /// The purge runs in two phases: the user's message identifiers are
    /// collected, then each message is deleted individually. It is not
    /// atomic. A failure part-way through leaves the remaining messages in
    /// place; calling the method again finishes the purge.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::PartialDelete`] if some deletes succeeded
    /// before a failure, or another `RepositoryError` if the lookup fails.
    async fn delete_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<usize>;
}
