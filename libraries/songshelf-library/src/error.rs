/// Error types for the playlist store and asset directories
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Error, Debug)]
pub enum LibraryError {
    /// The store file exists but does not hold a JSON array of playlists
    #[error("Playlist store at {path} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl LibraryError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptStore {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
