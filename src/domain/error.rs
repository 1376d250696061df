use std::io;

use thiserror::Error;

/// Library-wide error type for cfx-resolve operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure on the local filesystem.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Resolution configuration is missing, malformed, or holds an unsupported value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error.
    #[error("Configuration error: TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// External process failed to start, exited abnormally, timed out, or was cancelled.
    #[error("Command '{command}' failed: {details}")]
    CommandFailure { command: String, details: String, cancelled: bool },

    /// Listing output did not match the expected schema.
    #[error("Malformed repository listing: {0}")]
    MalformedResponse(String),

    /// No candidate survived extension/pattern filtering.
    #[error("No .cfg/.cfx artifact found in repository matching pattern '{pattern}'")]
    NotFound { pattern: String },

    /// Export delegation failed.
    #[error("Export of '{url}' failed: {details}")]
    ExportFailure { url: String, details: String },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Config(message.into())
    }

    pub fn command_failure(command: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::CommandFailure { command: command.into(), details: details.into(), cancelled: false }
    }

    /// A command aborted through the run's cancel token.
    pub fn cancelled(command: impl Into<String>) -> Self {
        AppError::CommandFailure {
            command: command.into(),
            details: CANCELLED_DETAILS.to_string(),
            cancelled: true,
        }
    }

    /// Whether the failure may be transient and worth a bounded retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::CommandFailure { cancelled: false, .. })
    }

    /// Whether the failure was caused by a cancelled run.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::CommandFailure { cancelled: true, .. })
    }

    /// Provide an `io::ErrorKind`-like view for callers that classify failures.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Config(_) | AppError::TomlParse(_) | AppError::MalformedResponse(_) => {
                io::ErrorKind::InvalidInput
            }
            AppError::NotFound { .. } => io::ErrorKind::NotFound,
            AppError::CommandFailure { cancelled: true, .. } => io::ErrorKind::Interrupted,
            AppError::CommandFailure { .. } | AppError::ExportFailure { .. } => {
                io::ErrorKind::Other
            }
        }
    }
}

/// Details attached to a `CommandFailure` raised by cancellation.
const CANCELLED_DETAILS: &str = "cancelled";
