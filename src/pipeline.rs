use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use uuid::Uuid;

use crate::app_config::TranslationProvider;
use crate::database::models::{QueueRecord, SubtitleRecord};
use crate::database::Repository;
use crate::errors::{PipelineError, ProviderError};
use crate::file_utils::{FileManager, SubtitlePathScheme};
use crate::job_queue::{JobProcessor, QueueJob};
use crate::providers::google_free::GoogleFreeTranslator;
use crate::providers::openai::OpenAiTranslator;
use crate::providers::{ContentType, SubtitleCandidate, SubtitleFetcher, TranslationApi};
use crate::subtitle_codec::{parse_srt, serialize_srt};
use crate::translation::{BatchTranslationEngine, DiagnosticsWriter, RetryPolicy};

// @module: End-to-end execution of one translation job

/// One enqueued translation job.
///
/// Owned exclusively by the job queue from enqueue to completion and
/// never persisted; the queue-tracking table only records that work is in
/// progress, not the job payload itself.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    /// Unique id for log correlation
    pub id: Uuid,
    pub content_type: ContentType,
    pub media_id: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// Candidate subtitle files found by the resolver
    pub candidates: Vec<SubtitleCandidate>,
    /// Language the cues get translated into, also the path segment the
    /// translated file is stored under
    pub target_language: String,
    /// Translation provider selection and credentials
    pub provider: TranslationProvider,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl TranslationJob {
    /// Logical job key for a media target, shared with callers that need
    /// to ask the queue about a job they have not constructed
    pub fn key_for(
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
        target_language: &str,
    ) -> String {
        format!(
            "{}:{}:{}:{}",
            media_id,
            season.unwrap_or(0),
            episode.unwrap_or(0),
            target_language
        )
    }
}

impl QueueJob for TranslationJob {
    fn key(&self) -> String {
        Self::key_for(&self.media_id, self.season, self.episode, &self.target_language)
    }

    fn describe(&self) -> String {
        match (self.season, self.episode) {
            (Some(season), Some(episode)) => format!(
                "{} [{} s{}e{} -> {}]",
                self.id, self.media_id, season, episode, self.target_language
            ),
            _ => format!("{} [{} -> {}]", self.id, self.media_id, self.target_language),
        }
    }
}

/// Builds the translation API client a job asked for
pub trait TranslationApiFactory: Send + Sync + 'static {
    fn build(&self, job: &TranslationJob) -> Arc<dyn TranslationApi>;
}

/// Factory producing the real provider clients
pub struct ProviderApiFactory {
    /// Endpoint of the free translation service
    pub google_free_endpoint: String,
}

impl TranslationApiFactory for ProviderApiFactory {
    fn build(&self, job: &TranslationJob) -> Arc<dyn TranslationApi> {
        match job.provider {
            TranslationProvider::GoogleFree => {
                Arc::new(GoogleFreeTranslator::new(self.google_free_endpoint.clone()))
            }
            TranslationProvider::OpenAi => Arc::new(OpenAiTranslator::new(
                job.api_key.clone(),
                job.base_url.clone(),
                job.model.clone(),
            )),
        }
    }
}

/// Plain HTTP download of candidate subtitle files
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: crate::providers::http_client(timeout),
        }
    }
}

#[async_trait]
impl SubtitleFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<bytes::Bytes, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("download of {} failed", url),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("download body failed: {}", e)))
    }
}

/// Runs the full pipeline for one job: download, parse, translate,
/// serialize, persist, clear the queue marker.
pub struct TranslationPipeline {
    fetcher: Arc<dyn SubtitleFetcher>,
    api_factory: Arc<dyn TranslationApiFactory>,
    repository: Repository,
    paths: SubtitlePathScheme,
    retry_policy: RetryPolicy,
    diagnostics: Arc<DiagnosticsWriter>,
}

impl TranslationPipeline {
    pub fn new(
        fetcher: Arc<dyn SubtitleFetcher>,
        api_factory: Arc<dyn TranslationApiFactory>,
        repository: Repository,
        paths: SubtitlePathScheme,
        diagnostics: Arc<DiagnosticsWriter>,
    ) -> Self {
        Self {
            fetcher,
            api_factory,
            repository,
            paths,
            retry_policy: RetryPolicy::default(),
            diagnostics,
        }
    }

    /// Override the per-batch retry policy (tests inject a zero backoff)
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Download every candidate file, skipping empty or failing ones.
    /// The job only fails when no candidate at all could be downloaded.
    async fn download_candidates(&self, job: &TranslationJob) -> Result<Vec<PathBuf>, PipelineError> {
        let mut filepaths = Vec::new();

        for (i, candidate) in job.candidates.iter().enumerate() {
            debug!("Downloading subtitle candidate: {}", candidate.url);

            let payload = match self.fetcher.fetch(&candidate.url).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Skipping candidate {}: {}", candidate.url, e);
                    continue;
                }
            };

            if payload.is_empty() {
                warn!("Subtitle file from {} was empty, skipping", candidate.url);
                continue;
            }

            let path = self.paths.download_path(
                &job.target_language,
                &job.media_id,
                job.season,
                job.episode,
                i + 1,
            );
            FileManager::write_bytes(&path, &payload)
                .map_err(|e| PipelineError::Persistence(e.to_string()))?;
            debug!("Subtitle downloaded and saved: {:?}", path);
            filepaths.push(path);
        }

        if filepaths.is_empty() && !job.candidates.is_empty() {
            return Err(PipelineError::NoUsableDownload);
        }

        Ok(filepaths)
    }

    /// Translate the cues of the first downloaded file and write the
    /// translated SRT to its deterministic path
    async fn translate_and_persist(
        &self,
        job: &TranslationJob,
        source_path: &PathBuf,
    ) -> Result<PathBuf, PipelineError> {
        let content = FileManager::read_to_string(source_path)
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;

        let cues = parse_srt(&content);
        if cues.is_empty() {
            return Err(PipelineError::EmptySubtitle(source_path.clone()));
        }

        let texts: Vec<String> = cues.iter().map(|cue| cue.text.clone()).collect();

        let api = self.api_factory.build(job);
        let engine = BatchTranslationEngine::with_policy(api, self.retry_policy)
            .with_diagnostics(self.diagnostics.clone());
        let translated = engine.translate_all(&texts, &job.target_language).await?;

        // Same count guaranteed by the engine; timing and numbering are
        // reused verbatim so only the text changes
        let translated_cues: Vec<_> = cues
            .into_iter()
            .zip(translated)
            .map(|(mut cue, text)| {
                cue.text = text;
                cue
            })
            .collect();

        let output_path = self.paths.translated_path(
            &job.provider.to_lowercase_string(),
            &job.target_language,
            &job.media_id,
            job.season,
            job.episode,
        );
        FileManager::write_to_file(&output_path, &serialize_srt(&translated_cues))
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;

        Ok(output_path)
    }
}

#[async_trait]
impl JobProcessor<TranslationJob> for TranslationPipeline {
    async fn process(&self, job: &TranslationJob) -> Result<(), PipelineError> {
        let filepaths = self.download_candidates(job).await?;
        if filepaths.is_empty() {
            debug!("Job {} had no candidates to process", job.id);
            return Ok(());
        }

        self.repository
            .queue_insert(&QueueRecord {
                media_id: job.media_id.clone(),
                season: job.season.unwrap_or(0),
                episode: job.episode.unwrap_or(0),
                subtitle_count: filepaths.len() as u32,
                language_code: job.target_language.clone(),
            })
            .await
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;

        let output_path = self.translate_and_persist(job, &filepaths[0]).await?;

        if job.content_type == ContentType::Series
            && !self
                .repository
                .series_exists(&job.media_id)
                .await
                .map_err(|e| PipelineError::Persistence(e.to_string()))?
        {
            self.repository
                .record_series(&job.media_id, job.content_type.as_str())
                .await
                .map_err(|e| PipelineError::Persistence(e.to_string()))?;
        }

        self.repository
            .queue_delete(
                &job.media_id,
                job.season,
                job.episode,
                &job.target_language,
            )
            .await
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;

        info!("Subtitles translated and saved: {:?}", output_path);
        Ok(())
    }

    async fn on_abandoned(&self, job: &TranslationJob) {
        // The tracking row must not survive the job, or the request
        // handler keeps treating the pending placeholder as live work and
        // never re-resolves this target
        if let Err(e) = self
            .repository
            .queue_delete(
                &job.media_id,
                job.season,
                job.episode,
                &job.target_language,
            )
            .await
        {
            warn!("Could not clear queue row for abandoned job {}: {}", job.id, e);
        }
    }
}

/// Persist a resolved subtitle record for a job target; kept here so the
/// request handler and the pipeline share one shape
pub fn resolved_record(
    job_media_id: &str,
    content_type: ContentType,
    season: Option<u32>,
    episode: Option<u32>,
    language_code: &str,
    file_path: String,
) -> SubtitleRecord {
    SubtitleRecord {
        media_id: job_media_id.to_string(),
        content_type: content_type.as_str().to_string(),
        season: season.unwrap_or(0),
        episode: episode.unwrap_or(0),
        language_code: language_code.to_string(),
        file_path,
    }
}
