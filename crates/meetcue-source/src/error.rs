//! Error types for meeting sources.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors a meeting source can report.
///
/// Every variant means the same thing to the reminder scheduler: the fetch
/// failed and the current cycle must be skipped.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the backing file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload was not a calendar events document.
    #[error("failed to parse events: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source is temporarily unable to answer.
    #[error("source unavailable: {message}")]
    Unavailable { message: String },
}

impl SourceError {
    /// Creates an IO error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
