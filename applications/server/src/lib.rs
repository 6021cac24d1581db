//! Songshelf Server Library
//!
//! Playlist manager and song downloader behind a small HTTP API.
//!
//! This library exposes the router and its components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod multipart;
pub mod router;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use state::AppState;
