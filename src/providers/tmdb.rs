use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;

use super::ShowIdMapper;

/// TMDb-backed id mapping: resolves an imdb id to the external show id
/// the episode source is indexed by. A missing mapping is reported as
/// `None`, which callers treat as "episode source unavailable".
#[derive(Debug, Clone)]
pub struct TmdbClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the TMDb API
    base_url: String,
    /// API key for authentication
    api_key: String,
}

/// `find` endpoint response, trimmed to the fields we read
#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    tv_results: Vec<TvResult>,
}

#[derive(Debug, Deserialize)]
struct TvResult {
    id: i64,
}

impl TmdbClient {
    /// Create a new id mapping client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: super::http_client(timeout),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Default public API base URL
    pub fn default_base_url() -> String {
        "https://api.themoviedb.org/3".to_string()
    }
}

#[async_trait]
impl ShowIdMapper for TmdbClient {
    async fn external_show_id(&self, imdb_id: &str) -> Result<Option<String>, ProviderError> {
        if self.api_key.is_empty() {
            return Ok(None);
        }

        let url = format!(
            "{}/find/{}?external_source=imdb_id&api_key={}",
            self.base_url.trim_end_matches('/'),
            imdb_id,
            self.api_key
        );
        debug!("Resolving external show id for {}", imdb_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("id mapping request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(ProviderError::AuthenticationError(
                "id mapping service rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("id mapping for {} failed", imdb_id),
            });
        }

        let body = response
            .json::<FindResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("id mapping response: {}", e)))?;

        Ok(body.tv_results.first().map(|tv| tv.id.to_string()))
    }
}
