//! Error types for the flapq crate

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Action;

/// Main error type for the flapq crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Nothing is persisted at the requested path.
    ///
    /// Recoverable for Q-tables: agent construction falls back to an empty
    /// table.
    #[error("nothing persisted at {path:?}")]
    StorageNotFound { path: PathBuf },

    /// A persisted Q-table or network exists but cannot be read or decoded.
    #[error("persisted data at {path:?} is unreadable: {message}")]
    StorageCorrupt { path: PathBuf, message: String },

    #[error("action {action} is not part of the configured action set")]
    InvalidAction { action: Action },

    #[error("action index {index} is out of range for {action_count} actions")]
    InvalidActionIndex { index: usize, action_count: usize },

    #[error("stored action set {stored} does not match configured action set {configured}")]
    ActionSetMismatch { stored: String, configured: String },

    #[error("stored discretizer boundaries differ from the configured discretizer")]
    DiscretizerMismatch,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("network inference failed: {message}")]
    Network { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
