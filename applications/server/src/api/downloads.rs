/// Download and online search API routes
use crate::{
    error::{Result, ServerError},
    extract::JsonBody,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use songshelf_fetch::{DownloadedSong, SearchResult, DEFAULT_TITLE};
use songshelf_library::AssetKind;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl DownloadRequest {
    fn into_parts(self) -> Result<(String, String)> {
        let url = self
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ServerError::BadRequest("No URL provided".to_string()))?;
        let title = self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        Ok((url, title))
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub count: Option<usize>,
}

/// POST /download
/// Fetch a direct audio URL into the songs directory
pub async fn download(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<DownloadRequest>,
) -> Result<Json<DownloadResponse>> {
    let (url, title) = req.into_parts()?;

    let filename = app_state.fetcher.fetch(&url, &title).await?;

    Ok(Json(DownloadResponse {
        url: app_state.assets.url(AssetKind::Song, &filename),
        title,
    }))
}

/// POST /search_online
/// An empty query is answered with an empty list; extractor failures
/// become a 500 with an empty list rather than an error object.
pub async fn search_online(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<SearchRequest>,
) -> (StatusCode, Json<Vec<SearchResult>>) {
    if req.query.is_empty() {
        return (StatusCode::OK, Json(Vec::new()));
    }

    let count = req.count.unwrap_or(app_state.search_count);

    match app_state.extractor.search(&req.query, count).await {
        Ok(results) => {
            tracing::debug!(query = %req.query, results = results.len(), "Search completed");
            (StatusCode::OK, Json(results))
        }
        Err(e) => {
            tracing::error!(query = %req.query, error = %e, "Search failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::new()))
        }
    }
}

/// POST /download_online
/// Download audio and subtitles through the extractor
pub async fn download_online(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<DownloadRequest>,
) -> Result<Json<DownloadedSong>> {
    let (url, title) = req.into_parts()?;

    let song = app_state.downloader.download(&url, &title).await?;
    Ok(Json(song))
}
