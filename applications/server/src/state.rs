/// Shared application state
use crate::{config::ServerConfig, error::Result};
use songshelf_fetch::{DirectFetcher, MediaExtractor, OnlineDownloader};
use songshelf_library::{AssetStore, PlaylistStore};
use std::{path::PathBuf, sync::Arc};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub playlists: Arc<PlaylistStore>,
    pub assets: Arc<AssetStore>,
    pub fetcher: Arc<DirectFetcher>,
    pub downloader: Arc<OnlineDownloader>,
    pub extractor: Arc<dyn MediaExtractor>,
    pub search_count: usize,
    pub web_dir: PathBuf,
}

impl AppState {
    /// Wire every component from `config`; no directories are touched
    pub fn new(config: &ServerConfig, extractor: Arc<dyn MediaExtractor>) -> Result<Self> {
        let assets = AssetStore::new(config.storage.asset_dirs());
        let fetcher = DirectFetcher::new(assets.clone())?;
        let downloader = OnlineDownloader::new(Arc::clone(&extractor), assets.clone());

        Ok(Self {
            playlists: Arc::new(PlaylistStore::new(config.storage.playlists_file.clone())),
            assets: Arc::new(assets),
            fetcher: Arc::new(fetcher),
            downloader: Arc::new(downloader),
            extractor,
            search_count: config.extractor.search_count,
            web_dir: config.storage.web_dir.clone(),
        })
    }
}
