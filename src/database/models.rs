/*!
 * Data models for database records.
 */

/// One resolved subtitle record, uniquely keyed by
/// `(media_id, content_type, season, episode, language_code)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleRecord {
    pub media_id: String,
    pub content_type: String,
    /// 0 for movies
    pub season: u32,
    /// 0 for movies
    pub episode: u32,
    pub language_code: String,
    /// Path (or URL suffix) of the file serving this record
    pub file_path: String,
}

/// One queue-tracking row for an in-flight translation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    pub media_id: String,
    pub season: u32,
    pub episode: u32,
    /// Number of candidate files downloaded for the job
    pub subtitle_count: u32,
    pub language_code: String,
}
