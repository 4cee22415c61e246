use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::errors::ProviderError;
use crate::language_utils;

use super::{EpisodeSource, SubtitleCandidate};

/// Client for the Gestdown episode-indexed subtitle database.
///
/// Lookups are addressed by an external show id (see `ShowIdMapper`), not
/// by imdb id. The API only understands 2-letter language codes, so the
/// request parameter is narrowed and the response code widened back to
/// 3 letters for output consistency.
#[derive(Debug, Clone)]
pub struct GestdownClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the episode database
    base_url: String,
}

/// Episode lookup response wrapper
#[derive(Debug, Deserialize)]
struct EpisodeResponse {
    #[serde(rename = "matchingSubtitles", default)]
    matching_subtitles: Vec<EpisodeEntry>,
}

/// One subtitle entry in an episode lookup response
#[derive(Debug, Deserialize)]
struct EpisodeEntry {
    /// Download path relative to the service base URL
    #[serde(rename = "downloadUri")]
    download_uri: String,
    /// Language of the track as reported by the service
    #[serde(default)]
    language: Option<String>,
}

impl GestdownClient {
    /// Create a new episode database client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: super::http_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EpisodeSource for GestdownClient {
    async fn find_episode(
        &self,
        show_id: &str,
        season: u32,
        episode: u32,
        language_code: &str,
    ) -> Result<Option<SubtitleCandidate>, ProviderError> {
        let narrowed = language_utils::to_2_letter(language_code);
        let base = self.base_url.trim_end_matches('/');
        let url = format!(
            "{}/subtitles/get/{}/{}/{}/{}",
            base, show_id, season, episode, narrowed
        );
        debug!("Fetching episode subtitles: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("episode request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("episode lookup for show {} failed", show_id),
            });
        }

        let body = response
            .json::<EpisodeResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("episode response: {}", e)))?;

        Ok(body.matching_subtitles.into_iter().next().map(|entry| {
            let language = entry
                .language
                .as_deref()
                .map(language_utils::to_3_letter)
                .unwrap_or_else(|| language_utils::to_3_letter(&narrowed));
            // downloadUri comes back relative to the service base
            let url = Url::parse(&self.base_url)
                .and_then(|base_url| base_url.join(&entry.download_uri))
                .map(String::from)
                .unwrap_or_else(|_| format!("{}{}", base, entry.download_uri));
            SubtitleCandidate::new(url, language)
        }))
    }
}
