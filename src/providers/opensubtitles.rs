use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;

use super::{CatalogSource, ContentType, SubtitleCandidate};

/// Client for the OpenSubtitles v3 catalog.
///
/// One GET per media item returns every known track; series episodes are
/// addressed as `{imdbid}:{season}:{episode}` inside the path.
#[derive(Debug, Clone)]
pub struct OpenSubtitlesClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the catalog service
    base_url: String,
}

/// Catalog response wrapper
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    subtitles: Vec<CatalogEntry>,
}

/// One track in the catalog response
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    /// 2-letter language code as echoed by the catalog
    lang: String,
    /// Direct download URL
    url: String,
}

impl OpenSubtitlesClient {
    /// Create a new catalog client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: super::http_client(timeout),
            base_url: base_url.into(),
        }
    }

    fn endpoint(
        &self,
        content_type: ContentType,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> String {
        let base = self.base_url.trim_end_matches('/');
        match (content_type, season, episode) {
            (ContentType::Series, Some(season), Some(episode)) => format!(
                "{}/subtitles/{}/{}:{}:{}.json",
                base,
                content_type.as_str(),
                media_id,
                season,
                episode
            ),
            _ => format!("{}/subtitles/{}/{}.json", base, content_type.as_str(), media_id),
        }
    }
}

#[async_trait]
impl CatalogSource for OpenSubtitlesClient {
    async fn list_subtitles(
        &self,
        content_type: ContentType,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<Vec<SubtitleCandidate>, ProviderError> {
        let url = self.endpoint(content_type, media_id, season, episode);
        debug!("Fetching subtitle catalog: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("catalog request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("catalog lookup for {} failed", media_id),
            });
        }

        let catalog = response
            .json::<CatalogResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("catalog response: {}", e)))?;

        Ok(catalog
            .subtitles
            .into_iter()
            .map(|entry| SubtitleCandidate::new(entry.url, entry.lang))
            .collect())
    }
}
