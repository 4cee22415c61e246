use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::language_utils;

use super::TranslationApi;

/// Sentinel used to pack a whole batch into one request string. The
/// translated result is split back on the same separator; any drift in
/// the separator shows up as a parity mismatch in the engine.
pub const BATCH_SEPARATOR: &str = " ||| ";

/// Batch size for the free endpoint: joined-string requests degrade
/// beyond this size
pub const BATCH_SIZE: usize = 60;

/// Client for the free Google Translate endpoint.
///
/// The endpoint takes a single text per call, so a batch is concatenated
/// with a sentinel separator, translated once, and split back apart.
#[derive(Debug, Clone)]
pub struct GoogleFreeTranslator {
    /// HTTP client for API requests
    client: Client,
    /// Translation endpoint URL
    endpoint: String,
}

impl GoogleFreeTranslator {
    /// Create a new free-endpoint translator
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: super::http_client(Duration::from_secs(60)),
            endpoint: endpoint.into(),
        }
    }

    /// Concatenate the translated segments of the response body.
    /// The endpoint answers with nested arrays, the first of which holds
    /// `[translated, original, ...]` segment tuples.
    fn extract_translation(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::ParseError("missing segment array".to_string()))?;

        let mut combined = String::new();
        for segment in segments {
            if let Some(text) = segment.get(0).and_then(|v| v.as_str()) {
                combined.push_str(text);
            }
        }
        Ok(combined)
    }
}

#[async_trait]
impl TranslationApi for GoogleFreeTranslator {
    fn name(&self) -> &'static str {
        "googlefree"
    }

    fn batch_size(&self) -> usize {
        BATCH_SIZE
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let combined = texts.join(BATCH_SEPARATOR);
        let target = language_utils::to_2_letter(target_language);
        debug!("Translating {} texts into '{}' via free endpoint", texts.len(), target);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target.as_str()),
                ("dt", "t"),
                ("q", combined.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("translation request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: "free translation endpoint rejected the request".to_string(),
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("translation response: {}", e)))?;

        let translated = Self::extract_translation(&body)?;
        Ok(translated
            .split(BATCH_SEPARATOR)
            .map(|part| part.trim().to_string())
            .collect())
    }
}
