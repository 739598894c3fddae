//! Port trait definitions for the message subsystem.
//!
//! Ports define the abstract interfaces that the domain requires from
//! infrastructure. Adapters implement these ports to connect the domain
//! to databases, message brokers, and other infrastructure.

pub mod deletion_source;
pub mod repository;

pub use deletion_source::{DeletionSource, DeliveryError};
pub use repository::{MessageRepository, RepositoryResult};
