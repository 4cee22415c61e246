use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};

use crate::errors::TranslationError;
use crate::providers::TranslationApi;

use super::diagnostics::DiagnosticsWriter;

/// Retry behavior for a single batch.
///
/// The backoff grows linearly: attempt N sleeps `N * backoff_base_ms`
/// before the next try. Tests inject a zero base to run without real
/// delays.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts per batch
    pub max_retries: u32,
    /// Base delay multiplied by the attempt number
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

/// Length-preserving batch translation engine.
///
/// Texts are partitioned into consecutive batches of the provider's batch
/// size and translated strictly in order, one call per batch. A response
/// whose cardinality differs from the request is dumped for inspection and
/// retried like any provider failure; exhausting the retry budget fails
/// the whole translation, so callers never persist a half-translated file.
pub struct BatchTranslationEngine {
    /// Provider performing the per-batch calls
    api: Arc<dyn TranslationApi>,
    /// Retry and backoff settings
    policy: RetryPolicy,
    /// Optional mismatch dump writer
    diagnostics: Option<Arc<DiagnosticsWriter>>,
}

impl BatchTranslationEngine {
    /// Create an engine with the default retry policy
    pub fn new(api: Arc<dyn TranslationApi>) -> Self {
        Self::with_policy(api, RetryPolicy::default())
    }

    /// Create an engine with an explicit retry policy
    pub fn with_policy(api: Arc<dyn TranslationApi>, policy: RetryPolicy) -> Self {
        Self {
            api,
            policy,
            diagnostics: None,
        }
    }

    /// Attach a diagnostics writer for parity-mismatch dumps
    pub fn with_diagnostics(mut self, diagnostics: Arc<DiagnosticsWriter>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Translate every text, preserving count and order.
    ///
    /// The output vector always has exactly `texts.len()` entries on
    /// success; batches are both created and consumed sequentially, so
    /// global ordering follows from per-batch ordering.
    pub async fn translate_all(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.api.batch_size().max(1);
        let batch_count = texts.len().div_ceil(batch_size);
        debug!(
            "Translating {} texts into '{}' in {} batches of up to {} ({})",
            texts.len(),
            target_language,
            batch_count,
            batch_size,
            self.api.name()
        );

        let mut translated = Vec::with_capacity(texts.len());
        for (batch_index, batch) in texts.chunks(batch_size).enumerate() {
            let result = self
                .translate_batch_with_retry(batch, target_language, batch_index)
                .await?;
            translated.extend(result);
        }

        Ok(translated)
    }

    /// Translate one batch, retrying parity mismatches and provider errors
    /// uniformly up to the attempt budget
    async fn translate_batch_with_retry(
        &self,
        batch: &[String],
        target_language: &str,
        batch_index: usize,
    ) -> Result<Vec<String>, TranslationError> {
        let mut attempt: u32 = 1;

        loop {
            let outcome = self.api.translate_batch(batch, target_language).await;

            match outcome {
                Ok(result) if result.len() == batch.len() => {
                    debug!("Batch {} translated ({} texts)", batch_index + 1, batch.len());
                    return Ok(result);
                }
                Ok(result) => {
                    warn!(
                        "Batch {} parity mismatch on attempt {}/{}: sent {}, received {}",
                        batch_index + 1,
                        attempt,
                        self.policy.max_retries,
                        batch.len(),
                        result.len()
                    );
                    self.dump_mismatch(attempt, batch, &result);

                    if attempt >= self.policy.max_retries {
                        return Err(TranslationError::ParityMismatch {
                            expected: batch.len(),
                            actual: result.len(),
                        });
                    }
                }
                Err(e) => {
                    error!(
                        "Batch {} failed on attempt {}/{}: {}",
                        batch_index + 1,
                        attempt,
                        self.policy.max_retries,
                        e
                    );

                    if attempt >= self.policy.max_retries {
                        return Err(TranslationError::RetriesExhausted {
                            batch_index,
                            attempts: attempt,
                            last_error: e.to_string(),
                        });
                    }
                }
            }

            let delay = Duration::from_millis(self.policy.backoff_base_ms * u64::from(attempt));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }

    fn dump_mismatch(&self, attempt: u32, texts: &[String], translated: &[String]) {
        if let Some(diagnostics) = &self.diagnostics {
            match diagnostics.record_parity_mismatch(attempt, texts, translated) {
                Ok(path) => debug!("Parity mismatch dump written to {:?}", path),
                Err(e) => warn!("Could not write parity mismatch dump: {}", e),
            }
        }
    }
}
