//! `RabbitMQ` subscription to user-deletion events.

use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::{
    Channel, Connection, Consumer,
    options::{BasicConsumeOptions, QueueDeclareOptions},
    types::FieldTable,
};

use crate::message::ports::deletion_source::{DeletionSource, DeliveryError};

/// Name of the queue carrying user-deletion events.
pub const DELETE_USER_QUEUE: &str = "delete-user";

/// A live `RabbitMQ` consumer on the deletion queue.
///
/// Owns the connection and channel for as long as the subscription runs.
/// Deliveries are auto-acknowledged by the broker.
pub struct AmqpDeletionSource {
    consumer: Consumer,
    _channel: Channel,
    _connection: Connection,
}

impl AmqpDeletionSource {
    /// Opens a channel on `connection`, declares `queue`, and starts
    /// consuming from it.
    ///
    /// The queue is declared non-durable, non-exclusive, and kept when
    /// unused; the consumer auto-acknowledges every delivery.
    ///
    /// # Errors
    ///
    /// Returns the broker error if the channel cannot be opened, the queue
    /// cannot be declared, or the consumer cannot be registered.
    pub async fn subscribe(connection: Connection, queue: &str) -> Result<Self, lapin::Error> {
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: false,
                    exclusive: false,
                    auto_delete: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        let consumer = channel
            .basic_consume(
                queue,
                "",
                BasicConsumeOptions {
                    no_ack: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(Self {
            consumer,
            _channel: channel,
            _connection: connection,
        })
    }
}

#[async_trait]
impl DeletionSource for AmqpDeletionSource {
    async fn next_delivery(&mut self) -> Option<Result<Vec<u8>, DeliveryError>> {
        self.consumer.next().await.map(|delivery| {
            delivery
                .map(|d| d.data)
                .map_err(|err| DeliveryError(err.to_string()))
        })
    }
}
