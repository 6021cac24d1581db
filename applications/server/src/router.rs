/// HTTP routing
use crate::{api, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router.
///
/// `max_upload_bytes` bounds every request body, including buffered
/// multipart uploads.
pub fn create_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    let library_routes = Router::new()
        .route(
            "/playlists",
            get(api::playlists::list_playlists).post(api::playlists::create_playlist),
        )
        .route(
            "/playlist/:name",
            get(api::playlists::get_playlist)
                .post(api::playlists::update_songs)
                .put(api::playlists::update_playlist)
                .delete(api::playlists::delete_playlist),
        )
        .route("/export_playlists", get(api::transfer::export_playlists))
        .route("/import_playlists", post(api::transfer::import_playlists));

    let asset_routes = Router::new()
        .route("/playlist_images/:filename", get(api::assets::playlist_image))
        .route("/songs/:filename", get(api::assets::song))
        .route("/lyrics/:filename", get(api::assets::lyrics));

    let download_routes = Router::new()
        .route("/download", post(api::downloads::download))
        .route("/search_online", post(api::downloads::search_online))
        .route("/download_online", post(api::downloads::download_online));

    Router::new()
        .route("/health", get(api::health::health))
        .merge(library_routes)
        .merge(asset_routes)
        .merge(download_routes)
        .fallback(api::web::spa_fallback)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
