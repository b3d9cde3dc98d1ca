use novapay_core::NovaPayError;
use thiserror::Error;

/// Errors surfaced by the interactive shell.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown field '{field}' for {form}")]
    UnknownField { form: &'static str, field: String },

    #[error("Command not available on this screen: {0}")]
    Unavailable(&'static str),

    #[error(transparent)]
    Core(#[from] NovaPayError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// Whether the shell loop can continue after reporting this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
