//! Songshelf Library
//!
//! Persistence layer for Songshelf: the JSON-backed playlist store and the
//! flat asset directories holding cover images, audio and lyrics.
//!
//! # Architecture
//!
//! - `store`: whole-document read-modify-write over `playlists.json`
//! - `assets`: filename-keyed blob storage in three directories
//! - `sanitize`: turns user-supplied titles into safe filenames
//!
//! # Example
//!
//! ```no_run
//! use songshelf_library::{PlaylistStore, sanitize_filename};
//!
//! # async fn run() -> songshelf_library::Result<()> {
//! let store = PlaylistStore::new("playlists.json");
//! let playlist = store.create("Road Trip", "cover.png").await?;
//! assert!(playlist.songs.is_empty());
//! assert_eq!(sanitize_filename("My Song"), "My_Song");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod assets;
pub mod error;
pub mod sanitize;
pub mod store;
pub mod types;

pub use assets::{AssetDirs, AssetKind, AssetStore, SUBTITLE_EXTENSION};
pub use error::{LibraryError, Result};
pub use sanitize::sanitize_filename;
pub use store::PlaylistStore;
pub use types::{Playlist, PlaylistUpdate, Song};
