//! Request handlers for the message routes.
//!
//! Handlers translate between the wire format and the repository port;
//! every response, success or failure, is an [`ApiResponse`] envelope.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::envelope::{ApiResponse, Reply};
use crate::message::{
    domain::{Message, MessageBody, MessageId, NewMessage, ServerId, UserId},
    error::ValidationError,
    ports::repository::MessageRepository,
};

/// Body of a save request.
///
/// All fields are optional at the wire level so that absence is reported
/// as a validation error rather than a deserialisation failure. A
/// client-supplied `id` is accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveMessageRequest {
    /// Owning user, as a UUID.
    pub user_id: Option<String>,
    /// Target server.
    pub server_id: Option<String>,
    /// Message text.
    pub message: Option<String>,
}

impl SaveMessageRequest {
    /// Validates the request into an unsaved message.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a field is missing, blank, or the
    /// user identifier is not a UUID.
    pub fn into_new_message(self) -> Result<NewMessage, ValidationError> {
        let user_id: UserId = self
            .user_id
            .ok_or(ValidationError::MissingField("user_id"))?
            .parse()?;
        let server_id = ServerId::new(
            self.server_id
                .ok_or(ValidationError::MissingField("server_id"))?,
        )?;
        let body = MessageBody::new(self.message.ok_or(ValidationError::MissingField("message"))?)?;
        Ok(NewMessage::new(user_id, server_id, body))
    }
}

/// `GET /ping`
pub async fn ping() -> Reply<()> {
    Reply::new(ApiResponse::success(StatusCode::OK, "pong!", None))
}

/// `POST /`
pub async fn save_message<R>(
    State(repository): State<Arc<R>>,
    payload: Result<Json<SaveMessageRequest>, JsonRejection>,
) -> Reply<Message>
where
    R: MessageRepository + 'static,
{
    let validated = match payload {
        Ok(Json(request)) => request.into_new_message().map_err(|err| err.to_string()),
        Err(rejection) => Err(rejection.body_text()),
    };
    let draft = match validated {
        Ok(draft) => draft,
        Err(reason) => {
            warn!(%reason, "rejected message");
            return Reply::new(ApiResponse::failure(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON data: {reason}"),
            ));
        }
    };

    match repository.save(&draft).await {
        Ok(stored) => {
            info!(id = %stored.id(), user_id = %stored.user_id(), "saved message");
            Reply::new(ApiResponse::success(
                StatusCode::CREATED,
                format!("Successfully sent message: {}", stored.id()),
                Some(stored),
            ))
        }
        Err(err) => {
            warn!(error = %err, "failed to save message");
            Reply::new(ApiResponse::failure(
                StatusCode::BAD_REQUEST,
                format!("Not able to send message: {err}"),
            ))
        }
    }
}

/// `GET /{id}`
pub async fn get_message<R>(
    State(repository): State<Arc<R>>,
    Path(id): Path<String>,
) -> Reply<Message>
where
    R: MessageRepository + 'static,
{
    let lookup = match id.parse::<MessageId>() {
        Ok(message_id) => repository
            .find_by_id(message_id)
            .await
            .map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };
    match lookup {
        Ok(message) => Reply::new(ApiResponse::success(
            StatusCode::OK,
            format!("Successfully retrieved message with id: {}", message.id()),
            Some(message),
        )),
        Err(reason) => Reply::new(ApiResponse::failure(
            StatusCode::NOT_FOUND,
            format!("No such message found with id {id}: {reason}"),
        )),
    }
}

/// `GET /user/{id}`
pub async fn list_user_messages<R>(
    State(repository): State<Arc<R>>,
    Path(id): Path<String>,
) -> Reply<Vec<Message>>
where
    R: MessageRepository + 'static,
{
    let lookup = match id.parse::<UserId>() {
        Ok(user_id) => repository
            .find_all_by_user_id(user_id)
            .await
            .map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };
    match lookup {
        Ok(messages) if messages.is_empty() => Reply::with_status(
            StatusCode::OK,
            ApiResponse::failure(
                StatusCode::NOT_FOUND,
                format!("No messages found with user id: {id}"),
            ),
        ),
        Ok(messages) => Reply::new(ApiResponse::success(
            StatusCode::OK,
            format!("Successfully retrieved messages with user id: {id}"),
            Some(messages),
        )),
        Err(reason) => Reply::new(ApiResponse::failure(
            StatusCode::NOT_FOUND,
            format!("No such messages found with user id {id}: {reason}"),
        )),
    }
}

/// `DELETE /user/{id}`
///
/// The payload is the number of messages removed.
pub async fn delete_user_messages<R>(
    State(repository): State<Arc<R>>,
    Path(id): Path<String>,
) -> Reply<usize>
where
    R: MessageRepository + 'static,
{
    let purge = match id.parse::<UserId>() {
        Ok(user_id) => repository
            .delete_all_by_user_id(user_id)
            .await
            .map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };
    match purge {
        Ok(deleted) => {
            info!(user_id = %id, deleted, "deleted user messages");
            Reply::new(ApiResponse::success(
                StatusCode::OK,
                format!("Successfully deleted messages with user id: {id}"),
                Some(deleted),
            ))
        }
        Err(reason) => {
            warn!(user_id = %id, %reason, "failed to delete user messages");
            Reply::new(ApiResponse::failure(
                StatusCode::NOT_FOUND,
                format!("No such messages found with user id {id}: {reason}"),
            ))
        }
    }
}
