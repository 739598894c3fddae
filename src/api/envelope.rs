//! The uniform response body returned by every route.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Response envelope carrying a human-readable message, a status code, a
/// success flag and an optional payload.
///
/// `http_status` normally mirrors the transport status. The one exception is
/// an empty user listing, which is delivered with HTTP 200 but reports 404
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Human-readable outcome.
    pub message: String,
    /// Status code reported in the body.
    pub http_status: u16,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Operation payload, `null` when absent.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful envelope with `status` and `data`.
    #[must_use]
    pub fn success(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            message: message.into(),
            http_status: status.as_u16(),
            success: true,
            data,
        }
    }

    /// Creates a failed envelope with `status` and no payload.
    #[must_use]
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http_status: status.as_u16(),
            success: false,
            data: None,
        }
    }
}

/// An envelope paired with the transport status it is sent with.
#[derive(Debug)]
pub struct Reply<T> {
    status: StatusCode,
    body: ApiResponse<T>,
}

impl<T> Reply<T> {
    /// Sends `body` with its own status.
    #[must_use]
    pub fn new(body: ApiResponse<T>) -> Self {
        let status =
            StatusCode::from_u16(body.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self { status, body }
    }

    /// Sends `body` with a transport status that differs from the one in the
    /// body.
    #[must_use]
    pub const fn with_status(status: StatusCode, body: ApiResponse<T>) -> Self {
        Self { status, body }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
