//! Message persistence and user-deletion handling.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Message`], [`domain::NewMessage`], identifiers)
//! - **Ports**: Abstract trait interfaces ([`ports::repository::MessageRepository`],
//!   [`ports::deletion_source::DeletionSource`])
//! - **Adapters**: Concrete implementations ([`adapters::memory::InMemoryMessageRepository`],
//!   [`adapters::postgres::PostgresMessageRepository`], [`adapters::amqp::AmqpDeletionSource`])
//! - **Services**: The [`services::DeletionConsumer`] loop
//!
//! # Example
//!
//! ```
//! use message_service::message::adapters::memory::InMemoryMessageRepository;
//! use message_service::message::domain::{MessageBody, NewMessage, ServerId};
//! use message_service::message::ports::repository::MessageRepository;
//!
//! # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
//! let repo = InMemoryMessageRepository::new();
//! let draft = NewMessage::new(
//!     "123e4567-e89b-12d3-a456-426614174000".parse().expect("valid user id"),
//!     ServerId::new("general").expect("valid server id"),
//!     MessageBody::new("Hello!").expect("valid body"),
//! );
//! let stored = repo.save(&draft).await.expect("save succeeds");
//! assert_eq!(repo.find_by_id(stored.id()).await.expect("message exists"), stored);
//! # });
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
