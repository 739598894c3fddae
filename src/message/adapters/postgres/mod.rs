//! `PostgreSQL` implementation of the `MessageRepository` port using Diesel ORM.
//!
//! Messages live in a single table keyed by identifier. Lookups and purges by
//! user filter on an unindexed column, which is acceptable only at small
//! scale.

mod blocking_helpers;
mod models;
mod pool;
mod schema;

use async_trait::async_trait;
use diesel::prelude::*;
use mockable::{Clock, DefaultClock};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::message::{
    domain::{Message, MessageBody, MessageId, NewMessage, ServerId, UserId},
    error::RepositoryError,
    ports::repository::{MessageRepository, RepositoryResult},
};
use blocking_helpers::{get_conn, run_blocking};
use models::{MessageRow, NewMessageRow};
use schema::messages;

pub use blocking_helpers::PgPool;
pub use pool::{CREATE_MESSAGES_SQL, build_pool, ensure_schema};

/// `PostgreSQL` implementation of [`MessageRepository`].
///
/// Uses Diesel ORM with connection pooling via r2d2. Thread-safe for
/// concurrent access. All database operations are offloaded to a blocking
/// thread pool via [`tokio::task::spawn_blocking`] to avoid blocking
/// the async runtime.
///
/// # Example
///
/// ```ignore
/// use message_service::message::adapters::postgres::{PostgresMessageRepository, build_pool};
///
/// let pool = build_pool("postgres://localhost/postgres", "messages").expect("pool");
/// let repo = PostgresMessageRepository::new(pool);
/// ```
pub struct PostgresMessageRepository<C: Clock + Send + Sync = DefaultClock> {
    pool: PgPool,
    clock: Arc<C>,
}

impl PostgresMessageRepository {
    /// Creates a new repository with the given connection pool and the
    /// system clock.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Connects to `url`, provisions the schema inside `keyspace`, and
    /// returns a ready repository.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the pool cannot be built or the schema
    /// cannot be created.
    pub async fn connect(url: &str, keyspace: &str) -> RepositoryResult<Self> {
        let owned_url = url.to_owned();
        let owned_keyspace = keyspace.to_owned();
        let pool = run_blocking(move || {
            let pool = build_pool(&owned_url, &owned_keyspace)?;
            ensure_schema(&pool, &owned_keyspace)?;
            Ok(pool)
        })
        .await?;
        Ok(Self::new(pool))
    }
}

impl<C: Clock + Send + Sync> Clone for PostgresMessageRepository<C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock + Send + Sync> fmt::Debug for PostgresMessageRepository<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.pool.state();
        f.debug_struct("PostgresMessageRepository")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish_non_exhaustive()
    }
}

impl<C: Clock + Send + Sync> PostgresMessageRepository<C> {
    /// Creates a repository that stamps identifiers with `clock`.
    #[must_use]
    pub const fn with_clock(pool: PgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_message(row: MessageRow) -> RepositoryResult<Message> {
    let MessageRow {
        id,
        user_id,
        server_id,
        message,
    } = row;
    let server = ServerId::new(server_id).map_err(RepositoryError::persistence)?;
    let body = MessageBody::new(message).map_err(RepositoryError::persistence)?;
    Ok(Message::from_persisted(
        MessageId::from_uuid(id),
        UserId::from_uuid(user_id),
        server,
        body,
    ))
}

#[async_trait]
impl<C: Clock + Send + Sync> MessageRepository for PostgresMessageRepository<C> {
    async fn save(&self, message: &NewMessage) -> RepositoryResult<Message> {
        let pool = self.pool.clone();
        let stored = message.with_id(MessageId::generate(self.clock.as_ref()));
        let row_source = stored.clone();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let row = NewMessageRow {
                id: row_source.id().into_inner(),
                user_id: row_source.user_id().into_inner(),
                server_id: row_source.server_id().as_str(),
                message: row_source.body().as_str(),
            };
            diesel::insert_into(messages::table)
                .values(&row)
                .execute(&mut conn)
                .map_err(RepositoryError::persistence)?;
            Ok(())
        })
        .await?;

        Ok(stored)
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Message> {
        let pool = self.pool.clone();
        let uuid = id.into_inner();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;

            messages::table
                .filter(messages::id.eq(uuid))
                .select(MessageRow::as_select())
                .first::<MessageRow>(&mut conn)
                .optional()
                .map_err(RepositoryError::persistence)?
                .ok_or(RepositoryError::NotFound(id))
                .and_then(row_to_message)
        })
        .await
    }

    async fn find_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<Vec<Message>> {
        let pool = self.pool.clone();
        let uuid = user_id.into_inner();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;

            let rows = messages::table
                .filter(messages::user_id.eq(uuid))
                .select(MessageRow::as_select())
                .load::<MessageRow>(&mut conn)
                .map_err(RepositoryError::persistence)?;

            rows.into_iter().map(row_to_message).collect()
        })
        .await
    }

    async fn delete_all_by_user_id(&self, user_id: UserId) -> RepositoryResult<usize> {
        let pool = self.pool.clone();
        let uuid = user_id.into_inner();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;

            let ids: Vec<Uuid> = messages::table
                .filter(messages::user_id.eq(uuid))
                .select(messages::id)
                .load(&mut conn)
                .map_err(RepositoryError::persistence)?;

            let total = ids.len();
            for (deleted, id) in ids.into_iter().enumerate() {
                diesel::delete(messages::table.filter(messages::id.eq(id)))
                    .execute(&mut conn)
                    .map_err(|err| RepositoryError::PartialDelete {
                        user_id,
                        deleted,
                        total,
                        cause: Arc::new(err),
                    })?;
            }
            Ok(total)
        })
        .await
    }
}
