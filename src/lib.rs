//! Message service: persistence of chat messages with user-deletion purging.
//!
//! The service accepts messages over an HTTP API, stores them in `PostgreSQL`
//! (or in memory for integration testing), and drains a `RabbitMQ` queue of
//! user-deletion events, purging every message owned by each deleted user.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure message types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and event delivery
//! - **Adapters**: Concrete implementations of ports (database, broker)
//!
//! # Modules
//!
//! - [`message`]: Domain, repository port and adapters, deletion consumer
//! - [`bootstrap`]: Fixed-backoff connection loops and readiness probing
//! - [`api`]: HTTP routes and the response envelope
//! - [`config`]: Environment-driven configuration
//! - [`telemetry`]: Logging subscriber setup
//! - [`app`]: Startup orchestration

pub mod api;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod message;
pub mod telemetry;
