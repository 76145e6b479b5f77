//! CLI error types.

use meetcue_core::TracingError;
use meetcue_reminder::ReminderError;
use meetcue_source::SourceError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a `meetcue` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The meeting source failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The reminder runtime refused to start.
    #[error(transparent)]
    Reminder(#[from] ReminderError),

    /// Logging could not be set up.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
