//! Direct URL downloads into the songs directory.

use crate::error::{FetchError, Result};
use crate::online::stored_base_name;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use songshelf_library::{AssetKind, AssetStore};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Streams arbitrary URLs to `<sanitized title>.mp3`.
///
/// The body is written verbatim; no content-type or size checks are made and
/// the `.mp3` extension is used regardless of what the server sends.
#[derive(Debug, Clone)]
pub struct DirectFetcher {
    http: Client,
    assets: AssetStore,
}

impl DirectFetcher {
    /// Create a fetcher with its own HTTP client.
    pub fn new(assets: AssetStore) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("Songshelf/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, assets))
    }

    pub fn with_client(http: Client, assets: AssetStore) -> Self {
        Self { http, assets }
    }

    /// Download `url` and return the stored filename.
    pub async fn fetch(&self, url: &str, title: &str) -> Result<String> {
        let filename = format!("{}.mp3", stored_base_name(title));
        let dest_path = self.assets.path(AssetKind::Song, &filename)?;
        debug!(url = %url, dest = %dest_path.display(), "Downloading");

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        tokio::fs::create_dir_all(self.assets.dir(AssetKind::Song)).await?;
        let mut file = File::create(&dest_path).await?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }

        file.flush().await?;

        info!(
            url = %url,
            dest = %dest_path.display(),
            size = downloaded,
            "Song downloaded"
        );

        Ok(filename)
    }
}
