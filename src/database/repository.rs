/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for the storage collaborator,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{QueueRecord, SubtitleRecord};

/// Season/episode pair normalized for the unique keys: movies store 0/0
fn key_parts(season: Option<u32>, episode: Option<u32>) -> (u32, u32) {
    (season.unwrap_or(0), episode.unwrap_or(0))
}

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    // =========================================================================
    // Resolved subtitle records
    // =========================================================================

    /// File paths already recorded for this media item and language
    pub async fn get_existing(
        &self,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
        language_code: &str,
    ) -> Result<Vec<String>> {
        let media_id = media_id.to_string();
        let language_code = language_code.to_string();
        let (season, episode) = key_parts(season, episode);

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT file_path FROM subtitles
                     WHERE media_id = ?1 AND season = ?2 AND episode = ?3 AND language_code = ?4",
                )?;
                let paths = stmt
                    .query_map(params![media_id, season, episode, language_code], |row| {
                        row.get::<_, String>(0)
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(paths)
            })
            .await
    }

    /// Insert or replace a resolved subtitle record
    pub async fn record_resolved(&self, record: &SubtitleRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO subtitles
                     (media_id, content_type, season, episode, language_code, file_path)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.media_id,
                        record.content_type,
                        record.season,
                        record.episode,
                        record.language_code,
                        record.file_path,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Delete the resolved record for one media item and language
    pub async fn delete_resolved(
        &self,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
        language_code: &str,
    ) -> Result<()> {
        let media_id = media_id.to_string();
        let language_code = language_code.to_string();
        let (season, episode) = key_parts(season, episode);

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "DELETE FROM subtitles
                     WHERE media_id = ?1 AND season = ?2 AND episode = ?3 AND language_code = ?4",
                    params![media_id, season, episode, language_code],
                )?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Series registrations
    // =========================================================================

    /// Whether this media id is already registered
    pub async fn series_exists(&self, media_id: &str) -> Result<bool> {
        let media_id = media_id.to_string();

        self.db
            .execute_async(move |conn| {
                let found: Option<String> = conn
                    .query_row(
                        "SELECT media_id FROM series WHERE media_id = ?1",
                        params![media_id],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(found.is_some())
            })
            .await
    }

    /// Register a media id with its content type
    pub async fn record_series(&self, media_id: &str, content_type: &str) -> Result<()> {
        let media_id = media_id.to_string();
        let content_type = content_type.to_string();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO series (media_id, content_type) VALUES (?1, ?2)",
                    params![media_id, content_type],
                )?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Queue tracking
    // =========================================================================

    /// Insert a queue-tracking row for a job that started processing
    pub async fn queue_insert(&self, record: &QueueRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO translation_queue
                     (media_id, season, episode, subtitle_count, language_code)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        record.media_id,
                        record.season,
                        record.episode,
                        record.subtitle_count,
                        record.language_code,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Remove the queue-tracking row once a job finished
    pub async fn queue_delete(
        &self,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
        language_code: &str,
    ) -> Result<()> {
        let media_id = media_id.to_string();
        let language_code = language_code.to_string();
        let (season, episode) = key_parts(season, episode);

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "DELETE FROM translation_queue
                     WHERE media_id = ?1 AND season = ?2 AND episode = ?3 AND language_code = ?4",
                    params![media_id, season, episode, language_code],
                )?;
                Ok(())
            })
            .await
    }

    /// Whether a queue-tracking row exists for this key
    pub async fn queue_contains(
        &self,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
        language_code: &str,
    ) -> Result<bool> {
        let media_id = media_id.to_string();
        let language_code = language_code.to_string();
        let (season, episode) = key_parts(season, episode);

        self.db
            .execute_async(move |conn| {
                let found: Option<i64> = conn
                    .query_row(
                        "SELECT id FROM translation_queue
                         WHERE media_id = ?1 AND season = ?2 AND episode = ?3 AND language_code = ?4",
                        params![media_id, season, episode, language_code],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(found.is_some())
            })
            .await
    }
}
