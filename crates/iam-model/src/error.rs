//! Model decoding errors.

use thiserror::Error;

/// Errors raised while decoding or validating model payloads.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The payload is not valid JSON for the target type.
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A required field is missing or empty.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present but has an unusable value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field path.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ModelError {
    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for model decoding.
pub type ModelResult<T> = Result<T, ModelError>;
