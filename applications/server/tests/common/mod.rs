//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use serde_json::Value;
use songshelf_fetch::{
    ExtractRequest, Extraction, ExtractionReport, FetchError, MediaExtractor, SearchResult,
};
use songshelf_server::{config::ServerConfig, create_router, state::AppState};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const BOUNDARY: &str = "songshelf-test-boundary";

/// Extractor double: canned search results, and downloads that write the
/// listed files into the requested directories.
#[derive(Default)]
pub struct StubExtractor {
    pub results: Vec<SearchResult>,
    pub fail_search: bool,
    /// `(in_lyrics_dir, filename)`
    pub files: Vec<(bool, &'static str)>,
    pub report: Value,
}

#[async_trait]
impl MediaExtractor for StubExtractor {
    async fn search(&self, _query: &str, count: usize) -> songshelf_fetch::Result<Vec<SearchResult>> {
        if self.fail_search {
            return Err(FetchError::Extractor("yt-dlp exited with status 1".to_string()));
        }
        Ok(self.results.iter().take(count).cloned().collect())
    }

    async fn download(&self, request: &ExtractRequest) -> songshelf_fetch::Result<Extraction> {
        for (in_lyrics, name) in &self.files {
            let dir = if *in_lyrics {
                &request.lyrics_dir
            } else {
                &request.songs_dir
            };
            tokio::fs::write(dir.join(name), b"data").await?;
        }

        Ok(Extraction {
            audio_path: request.songs_dir.join(format!("{}.mp3", request.base_name)),
            report: ExtractionReport::new(self.report.clone()),
        })
    }

    fn audio_extension(&self) -> &str {
        "mp3"
    }
}

/// Router over a fresh temporary directory
pub async fn create_test_app(extractor: StubExtractor) -> (Router, AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = ServerConfig::rooted_at(temp_dir.path());

    let app_state = AppState::new(&config, Arc::new(extractor)).unwrap();
    app_state.assets.initialize().await.unwrap();

    let app = create_router(app_state.clone(), config.server.max_upload_bytes);
    (app, app_state, temp_dir)
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// `(field, filename, data)`
    File(&'a str, &'a str, &'a [u8]),
}

/// Encode a multipart/form-data body
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(method: &str, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
