//! Connection pool construction and schema provisioning.
//!
//! Every pooled connection has its `search_path` pinned to the configured
//! keyspace, so the unqualified `messages` table always resolves inside it.

use std::time::Duration;

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};

use super::blocking_helpers::PgPool;
use crate::message::{error::RepositoryError, ports::repository::RepositoryResult};

/// SQL creating the message table.
pub const CREATE_MESSAGES_SQL: &str =
    include_str!("../../../../migrations/2024-05-01-000000_create_messages/up.sql");

const MAX_POOL_SIZE: u32 = 8;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct KeyspaceCustomizer {
    keyspace: String,
}

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for KeyspaceCustomizer {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET search_path TO {}", self.keyspace))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds a pool against `url` whose connections operate inside `keyspace`.
///
/// The keyspace is interpolated into SQL and must already be validated as a
/// plain identifier.
///
/// # Errors
///
/// Returns [`RepositoryError::Connection`] if no connection can be
/// established within the pool's connection timeout.
pub fn build_pool(url: &str, keyspace: &str) -> RepositoryResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(url);
    Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .connection_timeout(CONNECTION_TIMEOUT)
        .connection_customizer(Box::new(KeyspaceCustomizer {
            keyspace: keyspace.to_owned(),
        }))
        .build(manager)
        .map_err(|e| RepositoryError::connection(e.to_string()))
}

/// Creates the keyspace schema and the message table when absent.
///
/// # Errors
///
/// Returns `RepositoryError` if a connection cannot be obtained or the DDL
/// fails.
pub fn ensure_schema(pool: &PgPool, keyspace: &str) -> RepositoryResult<()> {
    let mut conn = pool
        .get()
        .map_err(|e| RepositoryError::connection(e.to_string()))?;
    conn.batch_execute(&format!("CREATE SCHEMA IF NOT EXISTS {keyspace}"))
        .map_err(RepositoryError::persistence)?;
    conn.batch_execute(CREATE_MESSAGES_SQL)
        .map_err(RepositoryError::persistence)?;
    Ok(())
}
