//! Runs the message service.
//!
//! Configuration comes from the environment, optionally seeded from a
//! `.env` file in the working directory. See [`message_service::config`] for
//! the recognised variables.

use message_service::{app, bootstrap::BootstrapError, config::Config, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), BootstrapError> {
    let dotenv = dotenvy::dotenv();
    telemetry::init_tracing()?;
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = Config::from_env()?;
    info!(
        bind = %config.api.bind_address(),
        mode = ?config.mode,
        provider = ?config.database.provider,
        "starting message service"
    );

    app::run(config).await.inspect_err(|err| {
        error!(error = %err, "message service stopped");
    })
}
