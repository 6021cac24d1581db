/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use songshelf_fetch::YtDlpSettings;
use songshelf_library::AssetDirs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_extractor")]
    pub extractor: ExtractorSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body (image uploads, playlist imports)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Every path is relative to the process working directory unless absolute
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_playlists_file")]
    pub playlists_file: PathBuf,

    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    #[serde(default = "default_songs_dir")]
    pub songs_dir: PathBuf,

    #[serde(default = "default_lyrics_dir")]
    pub lyrics_dir: PathBuf,

    /// Bundled front-end
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorSettings {
    #[serde(default = "default_yt_dlp_path")]
    pub yt_dlp_path: PathBuf,

    #[serde(default)]
    pub ffmpeg_location: Option<PathBuf>,

    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,

    #[serde(default = "default_subtitle_langs")]
    pub subtitle_langs: Vec<String>,

    /// Candidates returned by `/search_online` when the client gives no count
    #[serde(default = "default_search_count")]
    pub search_count: usize,
}

impl StorageSettings {
    pub fn asset_dirs(&self) -> AssetDirs {
        AssetDirs {
            images: self.images_dir.clone(),
            songs: self.songs_dir.clone(),
            lyrics: self.lyrics_dir.clone(),
        }
    }
}

impl ExtractorSettings {
    pub fn yt_dlp(&self) -> YtDlpSettings {
        YtDlpSettings {
            executable: self.yt_dlp_path.clone(),
            ffmpeg_location: self.ffmpeg_location.clone(),
            audio_format: self.audio_format.clone(),
            audio_quality: self.audio_quality.clone(),
            subtitle_langs: self.subtitle_langs.clone(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment.
    ///
    /// `path` overrides the default `config.toml` in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables, e.g. SONGSHELF_STORAGE__SONGS_DIR
        settings = settings.add_source(
            config::Environment::with_prefix("SONGSHELF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config("Port must not be 0".to_string()));
        }

        let storage = &self.storage;
        for (name, path) in [
            ("playlists_file", &storage.playlists_file),
            ("images_dir", &storage.images_dir),
            ("songs_dir", &storage.songs_dir),
            ("lyrics_dir", &storage.lyrics_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ServerError::Config(format!("storage.{} is empty", name)));
            }
        }

        if let Some(ffmpeg) = &self.extractor.ffmpeg_location {
            if !ffmpeg.exists() {
                return Err(ServerError::Config(format!(
                    "FFmpeg not found at {:?}",
                    ffmpeg
                )));
            }
        }

        if self.extractor.search_count == 0 {
            return Err(ServerError::Config(
                "extractor.search_count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        max_upload_bytes: default_max_upload_bytes(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        playlists_file: default_playlists_file(),
        images_dir: default_images_dir(),
        songs_dir: default_songs_dir(),
        lyrics_dir: default_lyrics_dir(),
        web_dir: default_web_dir(),
    }
}

fn default_playlists_file() -> PathBuf {
    PathBuf::from("playlists.json")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("playlist_images")
}

fn default_songs_dir() -> PathBuf {
    PathBuf::from("songs")
}

fn default_lyrics_dir() -> PathBuf {
    PathBuf::from("lyrics")
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_extractor() -> ExtractorSettings {
    ExtractorSettings {
        yt_dlp_path: default_yt_dlp_path(),
        ffmpeg_location: None,
        audio_format: default_audio_format(),
        audio_quality: default_audio_quality(),
        subtitle_langs: default_subtitle_langs(),
        search_count: default_search_count(),
    }
}

fn default_yt_dlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_audio_quality() -> String {
    "192".to_string()
}

fn default_subtitle_langs() -> Vec<String> {
    vec!["en".to_string(), "auto".to_string()]
}

fn default_search_count() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            extractor: default_extractor(),
        }
    }
}

impl ServerConfig {
    /// Configuration with every storage path below `root`
    pub fn rooted_at(root: &Path) -> Self {
        let mut config = Self::default();
        config.storage = StorageSettings {
            playlists_file: root.join(default_playlists_file()),
            images_dir: root.join(default_images_dir()),
            songs_dir: root.join(default_songs_dir()),
            lyrics_dir: root.join(default_lyrics_dir()),
            web_dir: root.join(default_web_dir()),
        };
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_default_layout() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.playlists_file, PathBuf::from("playlists.json"));
        assert_eq!(config.storage.songs_dir, PathBuf::from("songs"));
        assert_eq!(config.extractor.subtitle_langs, vec!["en", "auto"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songshelf.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8081\n\n[storage]\nsongs_dir = \"/srv/music\"\n",
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.storage.songs_dir, PathBuf::from("/srv/music"));
        assert_eq!(config.storage.lyrics_dir, PathBuf::from("lyrics"));
    }

    #[test]
    fn test_validate_rejects_missing_ffmpeg() {
        let mut config = ServerConfig::default();
        config.extractor.ffmpeg_location = Some(PathBuf::from("/definitely/not/here"));
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_rooted_at() {
        let config = ServerConfig::rooted_at(Path::new("/data"));
        assert_eq!(config.storage.images_dir, PathBuf::from("/data/playlist_images"));
        assert_eq!(config.storage.asset_dirs().lyrics, PathBuf::from("/data/lyrics"));
    }
}
