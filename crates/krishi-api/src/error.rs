//! Error types for the command API.
//!
//! [`ApiError`] converts into an HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Game
//! failures map to status codes by their [`ErrorKind`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use krishi_core::{ErrorKind, GameError};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A game command was rejected.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Game(err) => match err.kind() {
                ErrorKind::UnknownEntity => StatusCode::NOT_FOUND,
                ErrorKind::InvalidState | ErrorKind::NotReady => StatusCode::CONFLICT,
                ErrorKind::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
                ErrorKind::PersistenceFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        warn!(status = status.as_u16(), error = %message, "command rejected");

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
