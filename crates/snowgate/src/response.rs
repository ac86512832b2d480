//! HTTP status mapping for axum handlers.

use crate::{Error, Unauthorized};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl Error {
    /// Status code a handler should answer with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidBooleanLiteral { .. }
            | Self::InvalidSnowflake { .. }
            | Self::TimestampOutOfRange { .. } => StatusCode::BAD_REQUEST,
            #[allow(unreachable_patterns)]
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if status.is_server_error() {
            // Hashing and join failures are internal details.
            #[cfg(feature = "tracing")]
            tracing::error!(error = %self, "internal error");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };
        (status, body).into_response()
    }
}
