//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
///
/// The phonetic core itself is total; these errors only describe
/// rejected request values at the boundary of the domain.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required text field was empty
    #[error("{field} must not be empty")]
    EmptyField { field: String },

    /// A value was outside its allowed range
    #[error("{field} out of range: {value}")]
    OutOfRange { field: String, value: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an empty field error
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    /// Create an out of range error
    pub fn out_of_range(field: impl Into<String>, value: impl ToString) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
        }
    }
}
