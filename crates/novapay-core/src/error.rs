use crate::validation::FieldErrors;
use thiserror::Error;

/// NovaPay core errors.
#[derive(Debug, Error)]
pub enum NovaPayError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("No active session")]
    NotAuthenticated,

    #[error("Remote operation '{operation}' failed: {message}")]
    Remote { operation: String, message: String },

    #[error("Remote operation '{0}' was cancelled before completing")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NovaPayError {
    pub fn stage_violation(expected: &str, actual: &str) -> Self {
        Self::InvalidTransition(format!(
            "stage order violation: expected '{}', got '{}'",
            expected, actual
        ))
    }

    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Field-level errors carried by a validation failure, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
