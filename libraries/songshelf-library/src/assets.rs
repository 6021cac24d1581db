/// Asset directories - cover images, audio and lyrics files on disk
use crate::error::{LibraryError, Result};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Container format of subtitle/lyrics files
pub const SUBTITLE_EXTENSION: &str = "vtt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    PlaylistImage,
    Song,
    Lyrics,
}

impl AssetKind {
    /// URL prefix the server exposes this directory under
    pub fn url_prefix(&self) -> &'static str {
        match self {
            AssetKind::PlaylistImage => "/playlist_images",
            AssetKind::Song => "/songs",
            AssetKind::Lyrics => "/lyrics",
        }
    }
}

/// Locations of the three asset directories
#[derive(Debug, Clone)]
pub struct AssetDirs {
    pub images: PathBuf,
    pub songs: PathBuf,
    pub lyrics: PathBuf,
}

impl AssetDirs {
    /// Standard layout below `root`
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            images: root.join("playlist_images"),
            songs: root.join("songs"),
            lyrics: root.join("lyrics"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    dirs: AssetDirs,
}

impl AssetStore {
    pub fn new(dirs: AssetDirs) -> Self {
        Self { dirs }
    }

    /// Create every asset directory that does not exist yet
    pub async fn initialize(&self) -> Result<()> {
        for kind in [AssetKind::PlaylistImage, AssetKind::Song, AssetKind::Lyrics] {
            fs::create_dir_all(self.dir(kind)).await?;
        }
        Ok(())
    }

    pub fn dir(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::PlaylistImage => &self.dirs.images,
            AssetKind::Song => &self.dirs.songs,
            AssetKind::Lyrics => &self.dirs.lyrics,
        }
    }

    /// Path of `filename` inside the directory for `kind`.
    ///
    /// Only a single plain path component is accepted, which keeps lookups
    /// inside the asset directory.
    pub fn path(&self, kind: AssetKind, filename: &str) -> Result<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir(kind).join(filename)),
            _ => Err(LibraryError::invalid_input(format!(
                "Invalid asset filename: {:?}",
                filename
            ))),
        }
    }

    pub fn url(&self, kind: AssetKind, filename: &str) -> String {
        format!("{}/{}", kind.url_prefix(), filename)
    }

    pub fn exists(&self, kind: AssetKind, filename: &str) -> bool {
        self.path(kind, filename)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Write `data` to `filename`, replacing any existing file
    pub async fn store(&self, kind: AssetKind, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.path(kind, filename)?;
        fs::create_dir_all(self.dir(kind)).await?;
        fs::write(&path, data).await?;

        debug!(kind = ?kind, path = %path.display(), bytes = data.len(), "Asset stored");
        Ok(path)
    }

    /// Remove `filename`. Returns `false` when there was nothing to delete.
    pub async fn delete(&self, kind: AssetKind, filename: &str) -> Result<bool> {
        let path = self.path(kind, filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(kind = ?kind, path = %path.display(), "Asset deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Locate a lyrics file, preferring the lyrics directory over the songs
    /// directory where the downloader sometimes leaves subtitles behind.
    pub fn resolve_lyrics(&self, filename: &str) -> Option<(AssetKind, PathBuf)> {
        let found = [AssetKind::Lyrics, AssetKind::Song]
            .into_iter()
            .find_map(|kind| {
                let path = self.path(kind, filename).ok()?;
                path.is_file().then_some((kind, path))
            });

        if let Some((AssetKind::Song, path)) = &found {
            warn!(path = %path.display(), "Lyrics file found in the songs directory");
        }
        found
    }

    /// Filenames in `kind`'s directory matching `<base>.*.vtt`, in directory
    /// listing order. A missing directory yields no matches.
    pub async fn find_subtitles(&self, kind: AssetKind, base: &str) -> Result<Vec<String>> {
        let dir = self.dir(kind);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(dir).await?;

        let mut matches = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_subtitle_for(name, base) {
                    matches.push(name.to_string());
                }
            }
        }
        Ok(matches)
    }

    /// Move `filename` between asset directories, falling back to copy and
    /// delete when a plain rename is not possible.
    pub async fn relocate(&self, from: AssetKind, to: AssetKind, filename: &str) -> Result<PathBuf> {
        let source = self.path(from, filename)?;
        let target = self.path(to, filename)?;
        fs::create_dir_all(self.dir(to)).await?;

        if let Err(e) = fs::rename(&source, &target).await {
            debug!(error = %e, "Rename failed, copying instead");
            fs::copy(&source, &target).await?;
            fs::remove_file(&source).await?;
        }

        debug!(from = %source.display(), to = %target.display(), "Asset relocated");
        Ok(target)
    }
}

/// `<base>.*.vtt` in shell-glob terms; hidden files never match
fn is_subtitle_for(name: &str, base: &str) -> bool {
    if name.starts_with('.') {
        return false;
    }
    name.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(SUBTITLE_EXTENSION))
        .is_some_and(|middle| middle.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_pattern() {
        assert!(is_subtitle_for("My_Song.en.vtt", "My_Song"));
        assert!(is_subtitle_for("My_Song.en-US.orig.vtt", "My_Song"));
        assert!(is_subtitle_for("My_Song..vtt", "My_Song"));
        assert!(!is_subtitle_for("My_Song.vtt", "My_Song"));
        assert!(!is_subtitle_for("My_Song.en.srt", "My_Song"));
        assert!(!is_subtitle_for("My_Song_2.en.vtt", "My_Song"));
        assert!(!is_subtitle_for("Other.en.vtt", "My_Song"));
    }

    #[test]
    fn test_path_rejects_traversal() {
        let store = AssetStore::new(AssetDirs::under("/tmp/songshelf"));
        assert!(store.path(AssetKind::Song, "a.mp3").is_ok());
        assert!(store.path(AssetKind::Song, "../a.mp3").is_err());
        assert!(store.path(AssetKind::Song, "sub/a.mp3").is_err());
        assert!(store.path(AssetKind::Song, "..").is_err());
        assert!(store.path(AssetKind::Song, "").is_err());
    }

    #[test]
    fn test_urls() {
        let store = AssetStore::new(AssetDirs::under("/tmp/songshelf"));
        assert_eq!(store.url(AssetKind::Song, "a.mp3"), "/songs/a.mp3");
        assert_eq!(store.url(AssetKind::Lyrics, "a.en.vtt"), "/lyrics/a.en.vtt");
        assert_eq!(
            store.url(AssetKind::PlaylistImage, "c.png"),
            "/playlist_images/c.png"
        );
    }
}
