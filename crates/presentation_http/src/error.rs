//! API error handling
//!
//! Provider failures become degraded 503 responses with a fixed,
//! learner-facing message. Details are only included when
//! `server.expose_internal_errors` is enabled.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message for failed audio flows
pub const AUDIO_UNAVAILABLE_MESSAGE: &str = "Could not process audio";

/// Message for any other failed provider call
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Configure whether internal error details should be exposed in responses.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

/// Check if internal error details should be exposed
fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A provider failed; `message` is what the learner sees
    #[error("{message}: {details}")]
    ServiceUnavailable {
        message: &'static str,
        details: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Convert an error from an audio flow
    ///
    /// Degraded provider failures report "Could not process audio".
    pub fn audio(err: ApplicationError) -> Self {
        match Self::from(err) {
            Self::ServiceUnavailable { details, .. } => Self::ServiceUnavailable {
                message: AUDIO_UNAVAILABLE_MESSAGE,
                details,
            },
            other => other,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            Self::ServiceUnavailable { message, details } => {
                tracing::warn!(error = %details, "Returning degraded response");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    message.to_string(),
                    should_expose_details().then_some(details),
                )
            },
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    should_expose_details().then_some(msg),
                )
            },
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_degraded() {
            return Self::ServiceUnavailable {
                message: SERVICE_UNAVAILABLE_MESSAGE,
                details: err.to_string(),
            };
        }
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}
