//! Startup failures that abort the service.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the service from starting or keep it from running.
///
/// Transient connectivity failures never surface here; they are retried by
/// the connection loops.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A connection loop hit a failure that retrying cannot fix.
    #[error("{target} failed permanently: {reason}")]
    Fatal {
        /// The dependency being connected.
        target: &'static str,
        /// Why the attempt cannot succeed.
        reason: String,
    },

    /// The API listener could not be bound.
    #[error("failed to bind API listener on {address}: {source}")]
    Bind {
        /// The requested listen address.
        address: String,
        /// The underlying socket error.
        source: io::Error,
    },

    /// The API server stopped with an I/O error.
    #[error("API server failed: {0}")]
    Server(#[source] io::Error),

    /// The logging subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Telemetry(String),
}
