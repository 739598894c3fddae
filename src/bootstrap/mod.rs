//! Startup sequencing of the service's external dependencies.
//!
//! Storage and the message queue are each reached through a
//! [`retry::FixedBackoff`] loop that retries transient failures forever. The
//! readiness probe gates the deletion consumer on the API answering its own
//! liveness route.

pub mod error;
pub mod queue;
pub mod readiness;
pub mod retry;
pub mod storage;

pub use error::BootstrapError;
pub use queue::{connect_queue, subscribe_deletions};
pub use readiness::{ReadinessProbe, wait_until_ready};
pub use retry::{AttemptError, ConnectionState, Delay, FixedBackoff, TokioDelay};
pub use storage::open_store;
