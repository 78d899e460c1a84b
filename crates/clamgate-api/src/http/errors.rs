//! Transport-level error mapping.
//!
//! The trigger transport only needs a coarse signal: `400` means "never
//! redeliver this payload", `500` means "redeliver later". The body is a
//! short reason string for operators reading delivery logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use clamgate_pipeline::{DecodeError, PipelineError};

/// Structured API error carrying the transport status and a short reason.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    reason: String,
}

impl ApiError {
    /// Terminal decode failure; the transport must drop the event.
    #[must_use]
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            reason: reason.into(),
        }
    }

    /// Retryable pipeline failure; the transport should redeliver.
    #[must_use]
    pub fn internal(reason: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            reason: reason.into(),
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        Self::bad_request(format!("Bad Request: {err}"))
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self::internal(format!("pipeline failure: {}", err.kind()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.reason).into_response()
    }
}
