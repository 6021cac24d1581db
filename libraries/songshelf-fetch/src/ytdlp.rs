/// yt-dlp wrapper - search and audio/subtitle extraction
use crate::{
    error::{FetchError, Result},
    extractor::{
        is_direct_video_url, search_results, single_result, ExtractRequest, Extraction,
        ExtractionReport, MediaExtractor, SearchResult,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// How yt-dlp is invoked
#[derive(Debug, Clone)]
pub struct YtDlpSettings {
    pub executable: PathBuf,
    /// Directory holding ffmpeg/ffprobe when they are not on `PATH`
    pub ffmpeg_location: Option<PathBuf>,
    pub audio_format: String,
    /// Audio bitrate in kbps
    pub audio_quality: String,
    /// Subtitle languages in order of preference
    pub subtitle_langs: Vec<String>,
}

impl Default for YtDlpSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("yt-dlp"),
            ffmpeg_location: None,
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            subtitle_langs: vec!["en".to_string(), "auto".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    settings: YtDlpSettings,
}

impl YtDlpExtractor {
    pub fn new(settings: YtDlpSettings) -> Self {
        Self { settings }
    }

    /// Arguments for a metadata-only lookup of `query`
    fn search_args(&self, query: &str, count: usize) -> Vec<OsString> {
        let target = if is_direct_video_url(query) {
            query.to_string()
        } else {
            format!("ytsearch{}:{}", count, query)
        };

        ["--dump-single-json", "--flat-playlist", "--no-playlist", "--no-warnings", "--"]
            .into_iter()
            .map(OsString::from)
            .chain(std::iter::once(OsString::from(target)))
            .collect()
    }

    /// Arguments for downloading audio plus subtitles
    fn download_args(&self, request: &ExtractRequest) -> Vec<OsString> {
        let audio_template = request.songs_dir.join(format!("{}.%(ext)s", request.base_name));
        // yt-dlp inserts the language code before the extension itself
        let subtitle_template = request.lyrics_dir.join(format!("{}.%(ext)s", request.base_name));

        let mut args: Vec<OsString> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            self.settings.audio_format.clone().into(),
            "--audio-quality".into(),
            format!("{}K", self.settings.audio_quality).into(),
            "--write-subs".into(),
            "--sub-format".into(),
            "vtt/best".into(),
            "--sub-langs".into(),
            self.settings.subtitle_langs.join(",").into(),
            "--no-playlist".into(),
            "--no-progress".into(),
            "--no-warnings".into(),
            "--output".into(),
            audio_template.into_os_string(),
            "--output".into(),
        ];

        let mut subtitle_output = OsString::from("subtitle:");
        subtitle_output.push(subtitle_template);
        args.push(subtitle_output);

        if let Some(ffmpeg) = &self.settings.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }

        // Report after the download instead of simulating
        args.push("--dump-single-json".into());
        args.push("--no-simulate".into());
        args.push("--".into());
        args.push(request.url.clone().into());
        args
    }

    async fn run_json(&self, args: Vec<OsString>) -> Result<Value> {
        debug!(executable = %self.settings.executable.display(), ?args, "Running yt-dlp");

        let output = Command::new(&self.settings.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                FetchError::Extractor(format!(
                    "failed to run {}: {}",
                    self.settings.executable.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Extractor(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| FetchError::Extractor(format!("Failed to parse yt-dlp output: {}", e)))
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>> {
        let report = self.run_json(self.search_args(query, count)).await?;

        let results = if is_direct_video_url(query) {
            single_result(&report).into_iter().collect()
        } else {
            search_results(&report)
        };

        debug!(query = %query, results = results.len(), "Search finished");
        Ok(results)
    }

    async fn download(&self, request: &ExtractRequest) -> Result<Extraction> {
        info!(url = %request.url, base = %request.base_name, "Extracting audio");

        let report = self.run_json(self.download_args(request)).await?;

        let audio_path = request.songs_dir.join(format!(
            "{}.{}",
            request.base_name,
            self.audio_extension()
        ));

        Ok(Extraction {
            audio_path,
            report: ExtractionReport::new(report),
        })
    }

    fn audio_extension(&self) -> &str {
        &self.settings.audio_format
    }
}
