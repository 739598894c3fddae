//! Connecting to the message broker and subscribing to deletion events.

use lapin::{Connection, ConnectionProperties};
use tracing::info;

use super::error::BootstrapError;
use super::retry::{AttemptError, Delay, FixedBackoff, QUEUE_RETRY_INTERVAL};
use crate::message::adapters::amqp::AmqpDeletionSource;

/// Dials the broker at `uri`, waiting [`QUEUE_RETRY_INTERVAL`] between
/// failed attempts and never giving up.
///
/// # Errors
///
/// Returns [`BootstrapError::Fatal`] only if an attempt reports a
/// non-retryable failure. Dial failures are all treated as transient.
pub async fn connect_queue<D: Delay>(uri: &str, delay: D) -> Result<Connection, BootstrapError> {
    let mut backoff = FixedBackoff::new("message queue", QUEUE_RETRY_INTERVAL, delay);
    let connection = backoff
        .connect(|| async move {
            Connection::connect(uri, ConnectionProperties::default())
                .await
                .map_err(|err| AttemptError::transient(err.to_string()))
        })
        .await?;
    info!("connected to message queue");
    Ok(connection)
}

/// Subscribes to `queue` over an established `connection`.
///
/// # Errors
///
/// Returns [`BootstrapError::Fatal`] if the channel cannot be opened, the
/// queue cannot be declared, or the consumer cannot be registered. These
/// are not retried.
pub async fn subscribe_deletions(
    connection: Connection,
    queue: &str,
) -> Result<AmqpDeletionSource, BootstrapError> {
    let source = AmqpDeletionSource::subscribe(connection, queue)
        .await
        .map_err(|err| BootstrapError::Fatal {
            target: "message queue",
            reason: format!("cannot consume from '{queue}': {err}"),
        })?;
    info!(queue, "subscribed to deletion events");
    Ok(source)
}
