use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::file_utils::{FileManager, SubtitlePathScheme};
use crate::subtitle_codec::{serialize_srt, SubtitleCue};

// @module: Sentinel subtitle files shown while a job is pending

/// Message shown while a translation job is queued or running. Polling
/// callers re-request the same file until the real translation replaces it.
pub const PENDING_MESSAGE: &str = "Translating subtitles. Please wait 1 minute and try again.";

/// Message shown when every source came up empty
pub const NO_SUBTITLES_MESSAGE: &str = "No subtitles found on any source";

/// Build the single sentinel cue carrying a status message
pub fn placeholder_cue(message: &str) -> SubtitleCue {
    SubtitleCue::new(1, "00:00:01,000", "00:10:50,000", message)
}

/// Write (or overwrite) the placeholder file at the translated-subtitle
/// path for this media item, returning the path written
pub fn write_placeholder(
    paths: &SubtitlePathScheme,
    provider: &str,
    language_code: &str,
    media_id: &str,
    season: Option<u32>,
    episode: Option<u32>,
    message: &str,
) -> Result<PathBuf> {
    let path = paths.translated_path(provider, language_code, media_id, season, episode);
    let content = serialize_srt(&[placeholder_cue(message)]);
    FileManager::write_to_file(&path, &content)?;
    debug!("Placeholder written to {:?}", path);
    Ok(path)
}

/// Check whether a local file still holds the pending message. Missing or
/// unreadable files are not placeholders.
pub fn is_pending_placeholder(path: &std::path::Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => content.contains(PENDING_MESSAGE),
        Err(_) => false,
    }
}
