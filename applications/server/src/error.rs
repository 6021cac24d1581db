/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use songshelf_fetch::FetchError;
use songshelf_library::LibraryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Download or extraction failure; the message is shown to the client
    #[error("Download error: {0}")]
    Download(String),

    /// Playlist import failure; the message is shown to the client
    #[error("Import error: {0}")]
    Import(String),

    #[error("Playlist store is corrupt: {0}")]
    CorruptStore(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LibraryError> for ServerError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound { entity, .. } => {
                ServerError::NotFound(format!("{} not found", entity))
            }
            LibraryError::InvalidInput(msg) => ServerError::BadRequest(msg),
            LibraryError::CorruptStore { .. } => ServerError::CorruptStore(err.to_string()),
            LibraryError::Io(e) => ServerError::Io(e),
            LibraryError::Serialization(e) => ServerError::Internal(e.to_string()),
        }
    }
}

impl From<FetchError> for ServerError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::UpstreamStatus(_) => ServerError::BadRequest("Failed to download".to_string()),
            other => ServerError::Download(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Download(msg) => {
                tracing::error!("Download error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ServerError::Import(msg) => {
                tracing::error!("Import error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ServerError::CorruptStore(ref msg) => {
                tracing::error!("Corrupt store: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Playlist store is corrupt".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_errors_map_to_status() {
        let not_found: ServerError = LibraryError::not_found("Playlist", "x").into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid: ServerError = LibraryError::invalid_input("bad name").into();
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fetch_errors_map_to_status() {
        let upstream: ServerError = FetchError::UpstreamStatus(503).into();
        assert_eq!(upstream.into_response().status(), StatusCode::BAD_REQUEST);

        let tool: ServerError = FetchError::Extractor("boom".to_string()).into();
        assert_eq!(
            tool.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
