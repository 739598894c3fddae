//! Installation of the global `tracing` subscriber.
//!
//! Library code only emits events; the binary calls [`init_tracing`] once at
//! startup.

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::bootstrap::BootstrapError;

const DEFAULT_FILTER: &str = "info";

/// Installs a formatted stdout subscriber filtered by `RUST_LOG`, falling
/// back to `info` when the variable is unset or invalid.
///
/// Load any `.env` file before calling this, or its `RUST_LOG` is ignored.
///
/// # Errors
///
/// Returns [`BootstrapError::Telemetry`] if a global subscriber is already
/// installed.
pub fn init_tracing() -> Result<(), BootstrapError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| BootstrapError::Telemetry(err.to_string()))
}
