//! Shared world state for user-deletion BDD scenarios.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use message_service::message::{
    adapters::memory::InMemoryMessageRepository,
    domain::UserId,
    ports::deletion_source::{DeletionSource, DeliveryError},
    services::{ConsumerSummary, DeletionConsumer},
};
use rstest::fixture;
use uuid::Uuid;

/// Deletion queue stand-in that yields queued bodies, then ends.
#[derive(Debug, Default)]
pub struct QueuedDeliveries {
    bodies: VecDeque<Vec<u8>>,
}

impl QueuedDeliveries {
    /// Appends a delivery body.
    pub fn push(&mut self, body: Vec<u8>) {
        self.bodies.push_back(body);
    }
}

#[async_trait]
impl DeletionSource for QueuedDeliveries {
    async fn next_delivery(&mut self) -> Option<Result<Vec<u8>, DeliveryError>> {
        self.bodies.pop_front().map(Ok)
    }
}

/// Scenario world for user-deletion behaviour tests.
pub struct UserDeletionWorld {
    /// Repository shared by the scenario and the consumer.
    pub repository: Arc<InMemoryMessageRepository>,
    /// Consumer under test.
    pub consumer: DeletionConsumer<InMemoryMessageRepository>,
    /// Deliveries waiting to be drained.
    pub queue: QueuedDeliveries,
    /// Scenario user names mapped to their identifiers.
    pub users: HashMap<String, UserId>,
    /// Result of the last drain.
    pub summary: Option<ConsumerSummary>,
}

impl UserDeletionWorld {
    /// Creates a world with an empty repository and queue.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryMessageRepository::new());
        Self {
            consumer: DeletionConsumer::new(Arc::clone(&repository)),
            repository,
            queue: QueuedDeliveries::default(),
            users: HashMap::new(),
            summary: None,
        }
    }

    /// Returns the identifier for scenario user `name`, minting one on first
    /// use.
    pub fn user(&mut self, name: &str) -> UserId {
        *self
            .users
            .entry(name.to_owned())
            .or_insert_with(|| UserId::from_uuid(Uuid::new_v4()))
    }
}

impl Default for UserDeletionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> UserDeletionWorld {
    UserDeletionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
