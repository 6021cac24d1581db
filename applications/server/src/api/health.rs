/// GET /health
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use songshelf_library::AssetKind;

/// Liveness plus a quick look at the library on disk
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    /// `playlists.json` has been written at least once
    pub store_present: bool,
    /// Image, song and lyrics directories all exist
    pub asset_dirs_ready: bool,
}

pub async fn health(State(app_state): State<AppState>) -> Json<HealthReport> {
    let asset_dirs_ready = [AssetKind::PlaylistImage, AssetKind::Song, AssetKind::Lyrics]
        .into_iter()
        .all(|kind| app_state.assets.dir(kind).is_dir());

    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store_present: app_state.playlists.path().is_file(),
        asset_dirs_ready,
    })
}
