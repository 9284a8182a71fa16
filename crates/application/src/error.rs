//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (rejected request values)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A capability provider failed (model unavailable, invalid audio, inference error)
    #[error("Model failure: {0}")]
    ModelFailure(String),

    /// A provider call exceeded the configured port timeout
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Create a model failure error
    pub fn model_failure(message: impl Into<String>) -> Self {
        Self::ModelFailure(message.into())
    }

    /// Whether the caller should receive a degraded response instead of an internal fault
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::ModelFailure(_) | Self::Timeout { .. })
    }
}
