//! JSON-file playlist store
//!
//! Every mutation loads the whole document, changes it in memory and writes
//! the whole document back. There is no locking: concurrent writers race and
//! the last write wins. Writes are not atomic either, a crash mid-write can
//! leave a truncated file behind which `load` then reports as corrupt.

use crate::{
    error::{LibraryError, Result},
    types::{Playlist, PlaylistUpdate, Song},
};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every playlist. A missing file is an empty library.
    pub async fn load(&self) -> Result<Vec<Playlist>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| LibraryError::corrupt(&self.path, e))
    }

    /// Overwrite the store with `playlists`, pretty-printed with four-space indent
    pub async fn save(&self, playlists: &[Playlist]) -> Result<()> {
        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        playlists.serialize(&mut serializer)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, buf).await?;

        debug!(path = %self.path.display(), count = playlists.len(), "Playlist store saved");
        Ok(())
    }

    /// Append a new, empty playlist.
    ///
    /// Names are not checked for uniqueness here; only `import` skips
    /// duplicates.
    pub async fn create(&self, name: &str, image: &str) -> Result<Playlist> {
        let mut playlists = self.load().await?;
        let playlist = Playlist::new(name, image);
        playlists.push(playlist.clone());
        self.save(&playlists).await?;

        info!(name = %name, image = %image, "Playlist created");
        Ok(playlist)
    }

    pub async fn get(&self, name: &str) -> Result<Playlist> {
        self.load()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| LibraryError::not_found("Playlist", name))
    }

    /// Replace the song list wholesale
    pub async fn replace_songs(&self, name: &str, songs: Vec<Song>) -> Result<Playlist> {
        let mut playlists = self.load().await?;
        let playlist = find_mut(&mut playlists, name)?;
        playlist.songs = songs;
        let updated = playlist.clone();
        self.save(&playlists).await?;

        debug!(name = %name, songs = updated.songs.len(), "Playlist songs replaced");
        Ok(updated)
    }

    /// Rename and/or swap the cover image.
    ///
    /// Returns the updated playlist together with the previous image filename
    /// when the image changed, so the caller can remove the old file.
    pub async fn update(
        &self,
        name: &str,
        update: PlaylistUpdate,
    ) -> Result<(Playlist, Option<String>)> {
        let mut playlists = self.load().await?;
        let playlist = find_mut(&mut playlists, name)?;

        if let Some(new_name) = update.name {
            playlist.name = new_name;
        }
        let previous_image = update
            .image
            .map(|image| std::mem::replace(&mut playlist.image, image));

        let updated = playlist.clone();
        self.save(&playlists).await?;

        info!(name = %name, new_name = %updated.name, "Playlist updated");
        Ok((updated, previous_image))
    }

    /// Remove the first playlist called `name` and return it
    pub async fn delete(&self, name: &str) -> Result<Playlist> {
        let mut playlists = self.load().await?;
        let index = playlists
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| LibraryError::not_found("Playlist", name))?;
        let removed = playlists.remove(index);
        self.save(&playlists).await?;

        info!(name = %name, "Playlist deleted");
        Ok(removed)
    }

    /// Merge `entries` into the store, skipping names that already exist.
    ///
    /// Entries without a string `name`, or that do not describe a playlist,
    /// are skipped. Returns how many playlists were appended.
    pub async fn import(&self, entries: Vec<Value>) -> Result<usize> {
        let mut playlists = self.load().await?;
        let mut imported = 0;

        for entry in entries {
            let Some(name) = entry.get("name").and_then(Value::as_str) else {
                continue;
            };
            if playlists.iter().any(|p| p.name == name) {
                debug!(name = %name, "Skipping imported playlist with existing name");
                continue;
            }

            let name = name.to_string();
            match serde_json::from_value::<Playlist>(entry) {
                Ok(playlist) => {
                    playlists.push(playlist);
                    imported += 1;
                }
                Err(e) => warn!(name = %name, error = %e, "Skipping malformed imported playlist"),
            }
        }

        self.save(&playlists).await?;
        info!(imported, total = playlists.len(), "Playlists imported");
        Ok(imported)
    }

    /// Raw bytes of the store file, or `None` when nothing has been saved yet
    pub async fn export_raw(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn find_mut<'a>(playlists: &'a mut [Playlist], name: &str) -> Result<&'a mut Playlist> {
    playlists
        .iter_mut()
        .find(|p| p.name == name)
        .ok_or_else(|| LibraryError::not_found("Playlist", name))
}
