//! Subtitle reconciliation.
//!
//! The extraction tool is asked to write subtitles into the lyrics directory
//! but may leave them next to the audio instead, under a name that is only
//! loosely predictable. This module settles on one servable location.

use crate::error::Result;
use crate::extractor::ExtractionReport;
use songshelf_library::{AssetKind, AssetStore, SUBTITLE_EXTENSION};
use std::path::Path;
use tracing::{debug, info, warn};

/// Resolve the subtitle file for `base` and return its URL, if any.
///
/// Stops at the first hit of:
/// 1. a reported `vtt` subtitle whose basename exists in the lyrics directory
/// 2. `<base>.*.vtt` in the lyrics directory
/// 3. `<base>.*.vtt` in the songs directory, moved into the lyrics directory
///
/// A failed move leaves the file where it is and serves it from there. When
/// several languages match, the first directory entry wins.
pub async fn reconcile_subtitles(
    report: &ExtractionReport,
    base: &str,
    assets: &AssetStore,
) -> Result<Option<String>> {
    for subtitle in report.requested_subtitles() {
        if subtitle.ext.as_deref() != Some(SUBTITLE_EXTENSION) {
            continue;
        }
        let Some(reported) = subtitle.filepath.as_deref() else {
            continue;
        };
        let Some(name) = Path::new(reported).file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if assets.exists(AssetKind::Lyrics, name) {
            debug!(lang = %subtitle.lang, file = %name, "Reported subtitle found");
            return Ok(Some(assets.url(AssetKind::Lyrics, name)));
        }
        debug!(lang = %subtitle.lang, reported = %reported, "Reported subtitle not in lyrics directory");
    }

    if let Some(name) = assets
        .find_subtitles(AssetKind::Lyrics, base)
        .await?
        .into_iter()
        .next()
    {
        debug!(file = %name, "Subtitle found in lyrics directory");
        return Ok(Some(assets.url(AssetKind::Lyrics, &name)));
    }

    let Some(name) = assets
        .find_subtitles(AssetKind::Song, base)
        .await?
        .into_iter()
        .next()
    else {
        debug!(base = %base, "No subtitles found");
        return Ok(None);
    };

    match assets
        .relocate(AssetKind::Song, AssetKind::Lyrics, &name)
        .await
    {
        Ok(_) => {
            info!(file = %name, "Moved subtitle into lyrics directory");
            Ok(Some(assets.url(AssetKind::Lyrics, &name)))
        }
        Err(e) => {
            warn!(file = %name, error = %e, "Could not move subtitle, serving from songs directory");
            Ok(assets
                .exists(AssetKind::Song, &name)
                .then(|| assets.url(AssetKind::Song, &name)))
        }
    }
}
