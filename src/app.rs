//! Startup orchestration.
//!
//! Storage is opened first, so the API never serves without a repository.
//! The deletion consumer starts only after the API answers its own liveness
//! route.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::routes::{bind, router, serve};
use crate::bootstrap::{
    BootstrapError, ReadinessProbe, TokioDelay, connect_queue, open_store, subscribe_deletions,
    wait_until_ready,
};
use crate::config::Config;
use crate::message::adapters::amqp::DELETE_USER_QUEUE;
use crate::message::services::DeletionConsumer;

/// Runs the service until the API server stops.
///
/// The sequence is: open the store, start serving the API in the
/// background, wait for the API to answer, connect to the broker, then
/// drain deletion events in the background. A consumer that loses its
/// subscription is not restarted; the API keeps serving.
///
/// # Errors
///
/// Returns [`BootstrapError`] if the listener cannot be bound, a connection
/// loop fails permanently, the subscription cannot be set up, or the API
/// server stops.
pub async fn run(config: Config) -> Result<(), BootstrapError> {
    let store = open_store(&config, TokioDelay).await?;
    info!(backend = store.backend_name(), "message store ready");
    let repository = Arc::new(store);

    let listener = bind(&config.api.bind_address()).await?;
    let server = tokio::spawn(serve(listener, router(Arc::clone(&repository))));

    let probe = ReadinessProbe::new(&config.api.probe_base_url())?;
    wait_until_ready(&probe, TokioDelay).await?;

    let connection = connect_queue(&config.queue.uri, TokioDelay).await?;
    let mut source = subscribe_deletions(connection, DELETE_USER_QUEUE).await?;
    let consumer = DeletionConsumer::new(repository);
    tokio::spawn(async move {
        let summary = consumer.run(&mut source).await;
        warn!(?summary, "deletion consumer stopped, events are no longer processed");
    });
    info!("waiting for deletion events");

    server.await.map_err(|err| BootstrapError::Fatal {
        target: "api server",
        reason: err.to_string(),
    })?
}
