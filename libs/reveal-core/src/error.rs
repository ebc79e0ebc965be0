//! Error types for reveal-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TimerError.
pub type Result<T> = std::result::Result<T, TimerError>;

/// Errors that can occur while timing cards.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("timer file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed timer document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid delay {input:?}: expected a non-negative number of seconds")]
    InvalidDelay { input: String },

    #[error("elapsed time requested before the clock was started")]
    ClockNotStarted,

    #[error("no card is currently under review")]
    NoCurrentCard,
}

impl TimerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
