//! Opening the configured message store.

use tracing::info;

use super::error::BootstrapError;
use super::retry::{AttemptError, Delay, FixedBackoff, STORAGE_RETRY_INTERVAL};
use crate::config::{Config, ServiceMode};
use crate::message::adapters::{
    backend::MessageStore, memory::InMemoryMessageRepository,
    postgres::PostgresMessageRepository,
};

/// Returns the message store selected by `config`.
///
/// Integration mode yields an empty in-memory store at once. Otherwise the
/// durable store is connected through a [`FixedBackoff`] loop that waits
/// [`STORAGE_RETRY_INTERVAL`] between attempts and never gives up; a
/// connection counts as established once the schema exists.
///
/// # Errors
///
/// Returns [`BootstrapError::Fatal`] only if an attempt reports a
/// non-retryable failure. Storage failures are all treated as transient.
pub async fn open_store<D: Delay>(config: &Config, delay: D) -> Result<MessageStore, BootstrapError> {
    if config.mode == ServiceMode::Integration {
        info!("integration mode, using in-memory message store");
        return Ok(MessageStore::from(InMemoryMessageRepository::new()));
    }

    let url = config.database.connection_url();
    let keyspace = config.database.keyspace.as_str();
    let mut backoff = FixedBackoff::new("storage", STORAGE_RETRY_INTERVAL, delay);
    let repository = backoff
        .connect(|| {
            let attempt_url = url.clone();
            async move {
                PostgresMessageRepository::connect(&attempt_url, keyspace)
                    .await
                    .map_err(|err| AttemptError::transient(err.to_string()))
            }
        })
        .await?;
    info!(keyspace, "connected to message store");
    Ok(MessageStore::from(repository))
}
