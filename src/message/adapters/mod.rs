//! Adapters for the message module.
//!
//! This module provides concrete implementations of the message ports,
//! following hexagonal architecture principles. Adapters handle all
//! infrastructure concerns while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryMessageRepository`]: mutex-guarded in-memory storage
//!   for integration mode and tests
//! - [`postgres::PostgresMessageRepository`]: durable `PostgreSQL`
//!   persistence using Diesel ORM
//! - [`backend::MessageStore`]: the configured choice between the two
//! - [`amqp::AmqpDeletionSource`]: user-deletion events consumed from `RabbitMQ`

pub mod amqp;
pub mod backend;
pub mod memory;
pub mod postgres;
