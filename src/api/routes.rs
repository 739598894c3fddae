//! Route table for the message API.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{delete_user_messages, get_message, list_user_messages, ping, save_message};
use crate::bootstrap::BootstrapError;
use crate::message::ports::repository::MessageRepository;

/// Prefix shared by every message route.
pub const API_PREFIX: &str = "/api/v1/message";

/// Path of the liveness route.
pub const PING_PATH: &str = "/api/v1/message/ping";

const MESSAGE_PATH: &str = "/api/v1/message/{id}";
const USER_MESSAGES_PATH: &str = "/api/v1/message/user/{id}";

/// Builds the message API over `repository`.
pub fn router<R>(repository: Arc<R>) -> Router
where
    R: MessageRepository + 'static,
{
    Router::new()
        .route(PING_PATH, get(ping))
        .route(API_PREFIX, post(save_message::<R>))
        .route(MESSAGE_PATH, get(get_message::<R>))
        .route(
            USER_MESSAGES_PATH,
            get(list_user_messages::<R>).delete(delete_user_messages::<R>),
        )
        .with_state(repository)
        .layer(TraceLayer::new_for_http())
}

/// Binds `address` and returns the listener, ready for [`serve`].
///
/// # Errors
///
/// Returns [`BootstrapError::Bind`] if the address cannot be bound.
pub async fn bind(address: &str) -> Result<TcpListener, BootstrapError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| BootstrapError::Bind {
            address: address.to_owned(),
            source,
        })
}

/// Serves `app` on `listener` until the server fails.
///
/// # Errors
///
/// Returns [`BootstrapError::Server`] if the server stops with an I/O error.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), BootstrapError> {
    if let Ok(address) = listener.local_addr() {
        info!(%address, "API server listening");
    }
    axum::serve(listener, app)
        .await
        .map_err(BootstrapError::Server)
}
