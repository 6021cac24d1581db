/// Static asset serving for images, songs and lyrics
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use songshelf_library::AssetKind;
use std::{io::SeekFrom, path::Path as FsPath};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::io::ReaderStream;

/// GET /playlist_images/:filename
pub async fn playlist_image(
    Path(filename): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    serve_asset(&app_state, AssetKind::PlaylistImage, &filename, &headers).await
}

/// GET /songs/:filename
pub async fn song(
    Path(filename): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    serve_asset(&app_state, AssetKind::Song, &filename, &headers).await
}

/// GET /lyrics/:filename
/// Falls back to the songs directory when the subtitle was never moved
pub async fn lyrics(
    Path(filename): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let Some((_, path)) = app_state.assets.resolve_lyrics(&filename) else {
        return Err(ServerError::NotFound("Lyrics file not found".to_string()));
    };

    serve_file(&path, &headers).await
}

async fn serve_asset(
    app_state: &AppState,
    kind: AssetKind,
    filename: &str,
    headers: &HeaderMap,
) -> Result<Response> {
    let path = app_state
        .assets
        .path(kind, filename)
        .ok()
        .filter(|p| p.is_file())
        .ok_or_else(|| ServerError::NotFound("File not found".to_string()))?;

    serve_file(&path, headers).await
}

/// Stream a file with a guessed content type and single-range support
async fn serve_file(file_path: &FsPath, headers: &HeaderMap) -> Result<Response> {
    let metadata = tokio::fs::metadata(file_path).await?;
    let file_size = metadata.len();

    let mime_type = mime_guess::from_path(file_path)
        .first_or_octet_stream()
        .to_string();

    if let Some(range) = headers.get(header::RANGE) {
        let range_str = range
            .to_str()
            .map_err(|_| ServerError::BadRequest("Invalid Range header".to_string()))?;

        if let Some((start, end)) = parse_range(range_str, file_size) {
            let mut file = File::open(file_path).await?;
            file.seek(SeekFrom::Start(start)).await?;

            let content_length = end - start + 1;
            let body = Body::from_stream(ReaderStream::new(file.take(content_length)));

            return Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, mime_type)
                .header(header::CONTENT_LENGTH, content_length)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, file_size),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)));
        }
    }

    let file = File::open(file_path).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// Parse a single `bytes=start-end` range; an open end runs to the last byte
fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    let range = range.strip_prefix("bytes=")?;
    let (start_str, end_str) = range.split_once('-')?;

    let start: u64 = start_str.parse().ok()?;
    let end: u64 = if end_str.is_empty() {
        file_size.checked_sub(1)?
    } else {
        end_str.parse().ok()?
    };

    (start <= end && end < file_size).then_some((start, end))
}
