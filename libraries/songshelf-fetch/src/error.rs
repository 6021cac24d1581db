//! Error types for downloads and extraction.

use songshelf_library::LibraryError;
use thiserror::Error;

/// Errors that can occur while fetching audio or subtitles.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Upstream answered with something other than 200 OK
    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    /// The download did not produce what was expected
    #[error("Download failed: {0}")]
    Download(String),

    /// The external extraction tool could not be run or reported failure
    #[error("Extractor failed: {0}")]
    Extractor(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Asset directory or store failure
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// IO error while writing downloaded data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
