//! Port for the inbound stream of user-deletion events.

use async_trait::async_trait;
use thiserror::Error;

/// A subscription yielding raw deletion event bodies.
///
/// Deliveries are considered acknowledged as soon as they are handed out, so
/// a body that fails processing is never redelivered.
#[async_trait]
pub trait DeletionSource: Send {
    /// Waits for the next delivery.
    ///
    /// Returns `None` once the subscription has ended, for example because
    /// the broker connection was lost.
    async fn next_delivery(&mut self) -> Option<Result<Vec<u8>, DeliveryError>>;
}

/// Failure reported by the subscription while receiving a delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);
