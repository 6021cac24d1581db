/// Asset directory tests
/// Tests directory setup, blob storage, lyrics lookup and subtitle relocation
use songshelf_library::{AssetDirs, AssetKind, AssetStore};
use tempfile::TempDir;

fn create_store() -> (TempDir, AssetStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = AssetStore::new(AssetDirs::under(temp_dir.path()));
    (temp_dir, store)
}

/// Test initialization creates all three directories
#[tokio::test]
async fn test_initialize_creates_directories() {
    let (temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    for name in ["playlist_images", "songs", "lyrics"] {
        assert!(temp_dir.path().join(name).is_dir(), "{} should be created", name);
    }

    // Running twice is fine
    store.initialize().await.unwrap();
}

/// Test storing overwrites an existing file of the same name
#[tokio::test]
async fn test_store_overwrites() {
    let (_temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    store.store(AssetKind::Song, "Track.mp3", b"first").await.unwrap();
    let path = store.store(AssetKind::Song, "Track.mp3", b"second").await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"second");
    assert!(store.exists(AssetKind::Song, "Track.mp3"));
    assert!(!store.exists(AssetKind::Lyrics, "Track.mp3"));
}

/// Test deleting reports whether a file was removed
#[tokio::test]
async fn test_delete() {
    let (_temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    store.store(AssetKind::PlaylistImage, "cover.png", b"png").await.unwrap();

    assert!(store.delete(AssetKind::PlaylistImage, "cover.png").await.unwrap());
    assert!(!store.delete(AssetKind::PlaylistImage, "cover.png").await.unwrap());
    assert!(!store.exists(AssetKind::PlaylistImage, "cover.png"));
}

/// Test storing with a path-like filename is rejected
#[tokio::test]
async fn test_store_rejects_nested_filename() {
    let (_temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    let result = store.store(AssetKind::Song, "../escape.mp3", b"x").await;
    assert!(result.is_err());
}

/// Test lyrics are found in the lyrics directory before the songs directory
#[tokio::test]
async fn test_resolve_lyrics_prefers_lyrics_dir() {
    let (_temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    store.store(AssetKind::Song, "A.en.vtt", b"songs copy").await.unwrap();
    assert_eq!(
        store.resolve_lyrics("A.en.vtt").map(|(kind, _)| kind),
        Some(AssetKind::Song)
    );

    store.store(AssetKind::Lyrics, "A.en.vtt", b"lyrics copy").await.unwrap();
    let (kind, path) = store.resolve_lyrics("A.en.vtt").unwrap();
    assert_eq!(kind, AssetKind::Lyrics);
    assert_eq!(std::fs::read(path).unwrap(), b"lyrics copy");

    assert!(store.resolve_lyrics("missing.vtt").is_none());
    assert!(store.resolve_lyrics("../A.en.vtt").is_none());
}

/// Test subtitle search only returns files for the given base title
#[tokio::test]
async fn test_find_subtitles() {
    let (_temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    store.store(AssetKind::Song, "Song.mp3", b"audio").await.unwrap();
    store.store(AssetKind::Song, "Song.en.vtt", b"WEBVTT").await.unwrap();
    store.store(AssetKind::Song, "Song.de.vtt", b"WEBVTT").await.unwrap();
    store.store(AssetKind::Song, "Other.en.vtt", b"WEBVTT").await.unwrap();

    let mut found = store.find_subtitles(AssetKind::Song, "Song").await.unwrap();
    found.sort();
    assert_eq!(found, vec!["Song.de.vtt", "Song.en.vtt"]);

    assert!(store
        .find_subtitles(AssetKind::Lyrics, "Song")
        .await
        .unwrap()
        .is_empty());
}

/// Test subtitle search in a directory that was never created
#[tokio::test]
async fn test_find_subtitles_missing_directory() {
    let (_temp_dir, store) = create_store();
    assert!(store
        .find_subtitles(AssetKind::Lyrics, "Song")
        .await
        .unwrap()
        .is_empty());
}

/// Test relocating moves the file rather than copying it
#[tokio::test]
async fn test_relocate_moves_file() {
    let (_temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    store.store(AssetKind::Song, "Song.en.vtt", b"WEBVTT").await.unwrap();
    let target = store
        .relocate(AssetKind::Song, AssetKind::Lyrics, "Song.en.vtt")
        .await
        .unwrap();

    assert!(target.starts_with(store.dir(AssetKind::Lyrics)));
    assert_eq!(std::fs::read(&target).unwrap(), b"WEBVTT");
    assert!(!store.exists(AssetKind::Song, "Song.en.vtt"));
}

/// Test relocating a file that does not exist fails
#[tokio::test]
async fn test_relocate_missing_file() {
    let (_temp_dir, store) = create_store();
    store.initialize().await.unwrap();

    let result = store
        .relocate(AssetKind::Song, AssetKind::Lyrics, "Nope.en.vtt")
        .await;
    assert!(result.is_err());
}
