use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::language_utils;

use super::TranslationApi;

/// Batch size for the LLM provider: structured JSON requests keep their
/// shape well past what the sentinel-joined free endpoint tolerates
pub const BATCH_SIZE: usize = 200;

/// Client for OpenAI-compatible chat completion endpoints.
///
/// A batch is serialized as a JSON array of strings inside the prompt and
/// the model is asked to answer with the same-shaped JSON object, which
/// keeps per-text boundaries exact.
#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL of the chat completion API
    base_url: String,
    /// Model name
    model: String,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

/// Chat message
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response format directive, fixed to JSON object output
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat completion response, trimmed to the fields we read
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Shape of both the prompt input and the expected model output
#[derive(Debug, Serialize, Deserialize)]
struct BatchPayload {
    texts: Vec<String>,
}

impl OpenAiTranslator {
    /// Create a new LLM translator client
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: super::http_client(Duration::from_secs(120)),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn build_prompt(texts: &[String], target_language: &str) -> Result<String, ProviderError> {
        let payload = BatchPayload {
            texts: texts.to_vec(),
        };
        let input = serde_json::to_string(&payload)
            .map_err(|e| ProviderError::ParseError(format!("batch serialization: {}", e)))?;

        let target = language_utils::language_name(target_language)
            .unwrap_or_else(|| target_language.to_string());

        Ok(format!(
            "You are a specialized translator. Translate the array of texts provided into \"{}\" \
             while maintaining the size and structure of the input JSON.\n\
             - Return ONLY a valid JSON object with the same structure as the input, where the key \
             \"texts\" contains the array of translated texts.\n\
             - The output array must have exactly the same number of elements as the input array.\n\
             - Each element in the output array must correspond to the same index as the input array.\n\
             - Preserve all line breaks and the original formatting of each text.\n\
             - Ensure the final JSON is valid and retains the complete structure.\n\n\
             Input:\n{}",
            target, input
        ))
    }
}

#[async_trait]
impl TranslationApi for OpenAiTranslator {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn batch_size(&self) -> usize {
        BATCH_SIZE
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let prompt = Self::build_prompt(texts, target_language)?;
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            temperature: 0.3,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(
            "Translating {} texts into '{}' via {} ({})",
            texts.len(),
            target_language,
            url,
            self.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("translation request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::AuthenticationError(
                "translation endpoint rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("translation response: {}", e)))?;

        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| ProviderError::ParseError("response had no choices".to_string()))?;

        let payload: BatchPayload = serde_json::from_str(content)
            .map_err(|e| ProviderError::ParseError(format!("model output was not valid JSON: {}", e)))?;

        Ok(payload.texts)
    }
}
