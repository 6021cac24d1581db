/// Playlist export and import
use crate::{
    error::{Result, ServerError},
    multipart::FormData,
    state::AppState,
};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde_json::Value;

const EXPORT_FILENAME: &str = "playlists_export.json";

/// GET /export_playlists
/// The store file, byte for byte, as an attachment
pub async fn export_playlists(State(app_state): State<AppState>) -> Result<Response> {
    let Some(contents) = app_state.playlists.export_raw().await? else {
        return Err(ServerError::NotFound("No playlists to export".to_string()));
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        )
        .body(Body::from(contents))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// POST /import_playlists
/// Merge a JSON array of playlists from the multipart `file` field
pub async fn import_playlists(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let form = FormData::parse(&headers, body).await?;

    let file = form
        .raw_file("file")
        .ok_or_else(|| ServerError::BadRequest("No file part".to_string()))?;

    if file.filename.is_empty() {
        return Err(ServerError::BadRequest("No selected file".to_string()));
    }
    if !file.filename.ends_with(".json") {
        return Err(ServerError::BadRequest(
            "Invalid file type. Please upload a .json file.".to_string(),
        ));
    }

    let parsed: Value = serde_json::from_slice(&file.data)
        .map_err(|_| ServerError::BadRequest("Invalid JSON file".to_string()))?;

    let Value::Array(entries) = parsed else {
        return Err(ServerError::BadRequest(
            "Invalid JSON format: expected a list of playlists".to_string(),
        ));
    };

    let imported = app_state
        .playlists
        .import(entries)
        .await
        .map_err(|e| ServerError::Import(format!("Failed to import playlists: {}", e)))?;

    tracing::info!(file = %file.filename, imported, "Playlists imported");

    Ok(Json(serde_json::json!({
        "message": format!("Successfully imported {} new playlists.", imported)
    })))
}
