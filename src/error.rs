//! Error types for palantir-chat.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for palantir-chat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in palantir-chat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A chat file exists but is not a valid document.
    #[error("Corrupted chat file {}: {source}", path.display())]
    Corruption {
        /// File that failed to decode.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// No chat with the given id.
    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Argument that cannot be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Whether this error means the backing data could not be decoded.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corruption { .. })
    }
}
