//! Domain types stored in `playlists.json`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A song entry inside a playlist.
///
/// Songs are whatever the client sends (usually `{title, url, lyrics_url}`)
/// and are never validated or normalized server-side.
pub type Song = Value;

/// A named playlist with a cover image and an ordered list of songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    /// Filename relative to the playlist image directory
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub songs: Vec<Song>,
    /// Unknown fields carried through load/save untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Playlist {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            songs: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Partial update of a playlist's name and/or cover image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
}
