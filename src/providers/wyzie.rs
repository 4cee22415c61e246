use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::language_utils;

use super::{SearchSource, SubtitleCandidate};

/// Code width the search service expects in its `language` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeWidth {
    Two,
    Three,
}

/// The public service prefers 2-letter codes in requests
impl Default for LanguageCodeWidth {
    fn default() -> Self {
        Self::Two
    }
}

/// Client for the Wyzie subtitle search API.
///
/// The request language parameter is converted to the configured code
/// width; result language codes are widened to 3 letters so downstream
/// path and comparison logic sees a consistent form.
#[derive(Debug, Clone)]
pub struct WyzieClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the search service
    base_url: String,
    /// Width of the language code in requests
    code_width: LanguageCodeWidth,
}

/// One search result entry
#[derive(Debug, Deserialize)]
struct SearchEntry {
    /// Direct download URL
    url: String,
    /// Language code, 2 or 3 letters depending on the track
    language: String,
}

/// The service answers with either a bare array or `{ "data": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    List(Vec<SearchEntry>),
    Wrapped {
        #[serde(default)]
        data: Vec<SearchEntry>,
    },
}

impl SearchResponse {
    fn into_entries(self) -> Vec<SearchEntry> {
        match self {
            Self::List(entries) => entries,
            Self::Wrapped { data } => data,
        }
    }
}

impl WyzieClient {
    /// Create a new search client
    pub fn new(base_url: impl Into<String>, timeout: Duration, code_width: LanguageCodeWidth) -> Self {
        Self {
            client: super::http_client(timeout),
            base_url: base_url.into(),
            code_width,
        }
    }

    fn request_language(&self, code: &str) -> String {
        match self.code_width {
            LanguageCodeWidth::Two => language_utils::to_2_letter(code),
            LanguageCodeWidth::Three => language_utils::to_3_letter(code),
        }
    }
}

#[async_trait]
impl SearchSource for WyzieClient {
    async fn search(
        &self,
        media_id: &str,
        language_code: Option<&str>,
    ) -> Result<Option<SubtitleCandidate>, ProviderError> {
        let mut url = format!(
            "{}/search?id={}&format=srt",
            self.base_url.trim_end_matches('/'),
            media_id
        );
        if let Some(code) = language_code {
            url.push_str(&format!("&language={}", self.request_language(code)));
        }
        debug!("Searching subtitles: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("search for {} failed", media_id),
            });
        }

        let results = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("search response: {}", e)))?
            .into_entries();

        // Result codes come back in either width; widen for consistency
        Ok(results.into_iter().next().map(|entry| {
            let language = language_utils::to_3_letter(&entry.language);
            SubtitleCandidate::new(entry.url, language)
        }))
    }
}
