//! Direct download tests against a mock HTTP server.

use songshelf_fetch::{DirectFetcher, FetchError};
use songshelf_library::{AssetDirs, AssetKind, AssetStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn fetcher() -> (TempDir, AssetStore, DirectFetcher) {
    let dir = TempDir::new().unwrap();
    let assets = AssetStore::new(AssetDirs::under(dir.path()));
    assets.initialize().await.unwrap();
    let fetcher = DirectFetcher::new(assets.clone()).unwrap();
    (dir, assets, fetcher)
}

#[tokio::test]
async fn test_body_written_verbatim() {
    let mock_server = MockServer::start().await;
    let body: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    Mock::given(method("GET"))
        .and(path("/track.ogg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&mock_server)
        .await;

    let (_dir, assets, fetcher) = fetcher().await;
    let filename = fetcher
        .fetch(&format!("{}/track.ogg", mock_server.uri()), "Night Drive")
        .await
        .unwrap();

    // Always stored as .mp3, whatever the content
    assert_eq!(filename, "Night_Drive.mp3");
    let stored = std::fs::read(assets.path(AssetKind::Song, &filename).unwrap()).unwrap();
    assert_eq!(stored, body);
}

#[tokio::test]
async fn test_existing_file_overwritten() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/song"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
        .mount(&mock_server)
        .await;

    let (_dir, assets, fetcher) = fetcher().await;
    assets.store(AssetKind::Song, "Same.mp3", b"old contents").await.unwrap();

    fetcher
        .fetch(&format!("{}/song", mock_server.uri()), "Same")
        .await
        .unwrap();

    let stored = std::fs::read(assets.path(AssetKind::Song, "Same.mp3").unwrap()).unwrap();
    assert_eq!(stored, b"new");
}

#[tokio::test]
async fn test_non_200_status_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (_dir, assets, fetcher) = fetcher().await;
    let err = fetcher
        .fetch(&format!("{}/missing", mock_server.uri()), "Missing")
        .await
        .unwrap_err();

    match err {
        FetchError::UpstreamStatus(status) => assert_eq!(status, 404),
        other => panic!("Expected UpstreamStatus, got {:?}", other),
    }
    assert!(!assets.exists(AssetKind::Song, "Missing.mp3"));
}

#[tokio::test]
async fn test_other_success_codes_are_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let (_dir, _assets, fetcher) = fetcher().await;
    let err = fetcher.fetch(&mock_server.uri(), "Empty").await.unwrap_err();

    assert!(matches!(err, FetchError::UpstreamStatus(204)));
}

#[tokio::test]
async fn test_unusable_title_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&mock_server)
        .await;

    let (_dir, _assets, fetcher) = fetcher().await;
    let filename = fetcher.fetch(&mock_server.uri(), "???").await.unwrap();

    assert_eq!(filename, "downloaded_song.mp3");
}

#[tokio::test]
async fn test_unreachable_host_is_request_error() {
    let (_dir, _assets, fetcher) = fetcher().await;
    let err = fetcher
        .fetch("http://127.0.0.1:1/nothing", "Nothing")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Request(_)));
}
