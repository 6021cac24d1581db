//! Search/extract adapter seam.
//!
//! The external media tool is an opaque collaborator. Implementations of
//! [`MediaExtractor`] only promise the contract below; where the tool really
//! puts subtitle files is sorted out afterwards by reconciliation.

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// One search candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

/// What to download and where the output should go
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub url: String,
    /// Sanitized title used as the stem of every output file
    pub base_name: String,
    pub songs_dir: PathBuf,
    pub lyrics_dir: PathBuf,
}

/// Result of a completed extraction
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Where the audio file is expected to be once the tool is done
    pub audio_path: PathBuf,
    pub report: ExtractionReport,
}

#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Resolve `query` into at most `count` candidates.
    ///
    /// A direct video URL resolves to at most one entry.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>>;

    /// Download audio and subtitles for `request.url`.
    async fn download(&self, request: &ExtractRequest) -> Result<Extraction>;

    /// Extension of the audio file `download` produces, without the dot
    fn audio_extension(&self) -> &str;
}

/// Raw report from the extraction tool, kept as untyped JSON
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport(pub Value);

/// One entry of the report's `requested_subtitles` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedSubtitle {
    pub lang: String,
    pub ext: Option<String>,
    pub filepath: Option<String>,
}

impl ExtractionReport {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Subtitle tracks the tool says it fetched, in report order
    pub fn requested_subtitles(&self) -> Vec<RequestedSubtitle> {
        let Some(section) = self.0.get("requested_subtitles").and_then(Value::as_object) else {
            return Vec::new();
        };

        section
            .iter()
            .map(|(lang, info)| RequestedSubtitle {
                lang: lang.clone(),
                ext: string_field(info, "ext"),
                filepath: string_field(info, "filepath"),
            })
            .collect()
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Whether `query` is a video URL rather than free search text
pub fn is_direct_video_url(query: &str) -> bool {
    query.contains("youtube.com/watch?v=") || query.contains("youtu.be/")
}

/// Canonical watch-page URL for a video id
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

/// Candidate for a single resolved video; `None` without an id
pub(crate) fn single_result(info: &Value) -> Option<SearchResult> {
    let id = info.get("id").and_then(Value::as_str)?;
    let title = info
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Unknown Title");
    Some(SearchResult {
        title: title.to_string(),
        url: watch_url(id),
    })
}

/// Candidates from a search report; entries lacking an id or title are dropped
pub(crate) fn search_results(report: &Value) -> Vec<SearchResult> {
    report
        .get("entries")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let id = entry.get("id").and_then(Value::as_str)?;
                    let title = entry.get("title").and_then(Value::as_str)?;
                    (!id.is_empty() && !title.is_empty()).then(|| SearchResult {
                        title: title.to_string(),
                        url: watch_url(id),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
