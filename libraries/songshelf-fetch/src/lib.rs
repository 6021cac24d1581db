//! Songshelf Fetch
//!
//! Everything that pulls audio into the library from the outside world.
//!
//! # Features
//!
//! - **Direct downloads**: stream any URL into the songs directory
//! - **Search**: resolve free text or a video URL into watch-page candidates
//! - **Extraction**: audio + best-effort subtitles through yt-dlp
//! - **Reconciliation**: find where the subtitle file actually landed and
//!   move it into the lyrics directory
//!
//! # Example
//!
//! ```ignore
//! use songshelf_fetch::{OnlineDownloader, YtDlpExtractor, YtDlpSettings};
//! use songshelf_library::{AssetDirs, AssetStore};
//! use std::sync::Arc;
//!
//! let assets = AssetStore::new(AssetDirs::under("."));
//! let extractor = Arc::new(YtDlpExtractor::new(YtDlpSettings::default()));
//! let downloader = OnlineDownloader::new(extractor, assets);
//!
//! let song = downloader.download("https://www.youtube.com/watch?v=abc", "My Song").await?;
//! println!("{} -> {:?}", song.url, song.lyrics_url);
//! ```

mod direct;
mod error;
mod extractor;
mod online;
mod reconcile;
mod ytdlp;

pub use direct::DirectFetcher;
pub use error::{FetchError, Result};
pub use extractor::{
    is_direct_video_url, watch_url, ExtractRequest, Extraction, ExtractionReport, MediaExtractor,
    RequestedSubtitle, SearchResult,
};
pub use online::{stored_base_name, DownloadedSong, OnlineDownloader, DEFAULT_TITLE};
pub use reconcile::reconcile_subtitles;
pub use ytdlp::{YtDlpExtractor, YtDlpSettings};
