/*!
 * Provider implementations for external subtitle and translation services.
 *
 * This module contains client implementations for the third-party services
 * the pipeline depends on:
 * - OpenSubtitles: catalog lookup by media id
 * - Wyzie: general subtitle search
 * - Gestdown: episode-indexed show database
 * - TMDb: imdb id to external show id mapping
 * - Google Translate (free endpoint) and OpenAI-compatible APIs for text
 *   translation
 *
 * Every network client is reached through a trait, so the resolver, the
 * translation engine, and the pipeline can be exercised against mocks.
 */

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::Client;

use crate::errors::ProviderError;

/// Build an HTTP client with the given request timeout. Builder failure
/// falls back to the default client; the lost timeout is logged rather
/// than silently dropped.
pub fn http_client(timeout: Duration) -> Client {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("HTTP client build failed, request timeout disabled: {}", e);
            Client::new()
        }
    }
}

/// Kind of media a subtitle request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    /// Path segment used by catalog endpoints and stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One downloadable subtitle track offered by a source.
///
/// The language code stays in the provider-native form (2 or 3 letters);
/// consumers normalize it through `language_utils` when comparing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCandidate {
    /// Direct download URL
    pub url: String,

    /// Provider-native language code
    pub language_code: String,
}

impl SubtitleCandidate {
    pub fn new(url: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            language_code: language_code.into(),
        }
    }
}

/// Catalog-style source: one lookup returns every track it knows for the
/// media item, across all languages
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List all known subtitle tracks for a media item
    async fn list_subtitles(
        &self,
        content_type: ContentType,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<Vec<SubtitleCandidate>, ProviderError>;
}

/// Search-style source: one query per language, returning the first hit.
/// Passing `None` for the language asks for the first result in any language.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(
        &self,
        media_id: &str,
        language_code: Option<&str>,
    ) -> Result<Option<SubtitleCandidate>, ProviderError>;
}

/// Episode-indexed source, addressed by an external show id rather than
/// the media id itself
#[async_trait]
pub trait EpisodeSource: Send + Sync {
    async fn find_episode(
        &self,
        show_id: &str,
        season: u32,
        episode: u32,
        language_code: &str,
    ) -> Result<Option<SubtitleCandidate>, ProviderError>;
}

/// Maps an imdb id to the external show id the episode source understands.
/// A missing mapping means "source unavailable", not an error.
#[async_trait]
pub trait ShowIdMapper: Send + Sync {
    async fn external_show_id(&self, imdb_id: &str) -> Result<Option<String>, ProviderError>;
}

/// Common trait for text translation providers.
///
/// One call translates one batch; the returned vector is expected to have
/// the same length as the input. The batch translation engine enforces
/// that invariant and retries, so implementations only report what the
/// remote service gave back.
#[async_trait]
pub trait TranslationApi: Send + Sync + Debug {
    /// Short identifier used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// How many texts to put into one call
    fn batch_size(&self) -> usize;

    /// Translate one batch of independent texts into the target language
    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Opaque download function for candidate subtitle files
#[async_trait]
pub trait SubtitleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<bytes::Bytes, ProviderError>;
}

pub mod gestdown;
pub mod google_free;
pub mod openai;
pub mod opensubtitles;
pub mod tmdb;
pub mod wyzie;
