/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    extract::JsonBody,
    multipart::FormData,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use songshelf_library::{sanitize_filename, AssetKind, Playlist, PlaylistUpdate, Song};

#[derive(Debug, Deserialize)]
pub struct UpdateSongsRequest {
    #[serde(default)]
    pub songs: Vec<Song>,
}

/// GET /playlists
pub async fn list_playlists(State(app_state): State<AppState>) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.playlists.load().await?;
    Ok(Json(playlists))
}

/// POST /playlists
/// Create a playlist from a multipart form with `name` and `image`
pub async fn create_playlist(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Playlist>> {
    let form = FormData::parse(&headers, body).await?;

    let (Some(name), Some(image)) = (form.text("name"), form.file("image")) else {
        return Err(ServerError::BadRequest(
            "Name and image required".to_string(),
        ));
    };

    let filename = image_filename(&image.filename)?;
    app_state
        .assets
        .store(AssetKind::PlaylistImage, &filename, &image.data)
        .await?;

    // Duplicate names are accepted here; only import skips them
    let playlist = app_state.playlists.create(name, &filename).await?;
    Ok(Json(playlist))
}

/// GET /playlist/:name
pub async fn get_playlist(
    Path(name): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Playlist>> {
    let playlist = app_state.playlists.get(&name).await?;
    Ok(Json(playlist))
}

/// POST /playlist/:name
/// Replace the song list
pub async fn update_songs(
    Path(name): Path<String>,
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<UpdateSongsRequest>,
) -> Result<Json<Playlist>> {
    let playlist = app_state.playlists.replace_songs(&name, req.songs).await?;
    Ok(Json(playlist))
}

/// PUT /playlist/:name
/// Rename and/or replace the cover image; both form fields are optional
pub async fn update_playlist(
    Path(name): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Playlist>> {
    // 404 before touching any files
    app_state.playlists.get(&name).await?;

    let form = FormData::parse(&headers, body).await?;

    let mut update = PlaylistUpdate {
        name: form.text("name").map(str::to_string),
        image: None,
    };

    if let Some(image) = form.file("image") {
        let filename = image_filename(&image.filename)?;
        app_state
            .assets
            .store(AssetKind::PlaylistImage, &filename, &image.data)
            .await?;
        update.image = Some(filename);
    }

    let new_image = update.image.clone();
    let (playlist, previous_image) = app_state.playlists.update(&name, update).await?;

    // A same-named upload already overwrote the old file
    if let Some(previous) = previous_image.filter(|p| Some(p) != new_image.as_ref()) {
        remove_image(&app_state, &previous).await;
    }

    Ok(Json(playlist))
}

/// DELETE /playlist/:name
/// Delete a playlist and its cover image. Song and lyrics files are kept
/// because other playlists may reference them.
pub async fn delete_playlist(
    Path(name): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let removed = app_state.playlists.delete(&name).await?;
    remove_image(&app_state, &removed.image).await;

    Ok(Json(serde_json::json!({ "message": "Playlist deleted successfully" })))
}

fn image_filename(uploaded: &str) -> Result<String> {
    let filename = sanitize_filename(uploaded);
    if filename.is_empty() {
        return Err(ServerError::BadRequest("Invalid image filename".to_string()));
    }
    Ok(filename)
}

async fn remove_image(app_state: &AppState, filename: &str) {
    if filename.is_empty() {
        return;
    }
    if let Err(e) = app_state
        .assets
        .delete(AssetKind::PlaylistImage, filename)
        .await
    {
        tracing::warn!(image = %filename, error = %e, "Could not delete playlist image");
    }
}
