//! Download-from-search flow: extract, reconcile subtitles, verify, clean up.

use crate::error::{FetchError, Result};
use crate::extractor::{ExtractRequest, MediaExtractor};
use crate::reconcile::reconcile_subtitles;
use serde::Serialize;
use songshelf_library::{sanitize_filename, AssetKind, AssetStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Title used when the client sends none, or one with no usable characters
pub const DEFAULT_TITLE: &str = "downloaded_song";

/// Filename stem for a user-supplied title
pub fn stored_base_name(title: &str) -> String {
    let base = sanitize_filename(title);
    if base.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        base
    }
}

/// A song that is now servable from the asset directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedSong {
    pub url: String,
    pub title: String,
    pub lyrics_url: Option<String>,
}

pub struct OnlineDownloader {
    extractor: Arc<dyn MediaExtractor>,
    assets: AssetStore,
}

impl OnlineDownloader {
    pub fn new(extractor: Arc<dyn MediaExtractor>, assets: AssetStore) -> Self {
        Self { extractor, assets }
    }

    /// Download `url` as `title`, with subtitles when available.
    ///
    /// On any failure the partial audio file and every `<base>.*.vtt` in
    /// both directories are removed before the error is returned.
    pub async fn download(&self, url: &str, title: &str) -> Result<DownloadedSong> {
        let base = stored_base_name(title);

        match self.extract_and_reconcile(url, &base).await {
            Ok((audio_name, lyrics_url)) => {
                let song = DownloadedSong {
                    url: self.assets.url(AssetKind::Song, &audio_name),
                    title: title.to_string(),
                    lyrics_url,
                };
                info!(url = %song.url, lyrics = ?song.lyrics_url, "Online download finished");
                Ok(song)
            }
            Err(e) => {
                error!(url = %url, base = %base, error = %e, "Online download failed");
                self.cleanup(&base).await;
                Err(e)
            }
        }
    }

    async fn extract_and_reconcile(&self, url: &str, base: &str) -> Result<(String, Option<String>)> {
        let request = ExtractRequest {
            url: url.to_string(),
            base_name: base.to_string(),
            songs_dir: self.assets.dir(AssetKind::Song).to_path_buf(),
            lyrics_dir: self.assets.dir(AssetKind::Lyrics).to_path_buf(),
        };

        let extraction = self.extractor.download(&request).await?;
        let lyrics_url = reconcile_subtitles(&extraction.report, base, &self.assets).await?;

        if !extraction.audio_path.is_file() {
            return Err(FetchError::Download(format!(
                "Audio file not found after download: {}",
                extraction.audio_path.display()
            )));
        }

        let audio_name = file_name(&extraction.audio_path)?;
        Ok((audio_name, lyrics_url))
    }

    /// Best-effort removal of everything a failed download may have left
    async fn cleanup(&self, base: &str) {
        let audio_name = format!("{}.{}", base, self.extractor.audio_extension());
        if let Err(e) = self.assets.delete(AssetKind::Song, &audio_name).await {
            debug!(file = %audio_name, error = %e, "Cleanup could not remove audio");
        }

        for kind in [AssetKind::Lyrics, AssetKind::Song] {
            let Ok(names) = self.assets.find_subtitles(kind, base).await else {
                continue;
            };
            for name in names {
                if let Err(e) = self.assets.delete(kind, &name).await {
                    debug!(file = %name, error = %e, "Cleanup could not remove subtitle");
                }
            }
        }
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| FetchError::Download(format!("Invalid audio path: {}", path.display())))
}
