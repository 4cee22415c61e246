/*!
 * Request orchestration: storage check, source resolution, placeholder
 * writing and job enqueueing for one subtitle request.
 */

use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::app_config::Config;
use crate::database::Repository;
use crate::file_utils::{FileManager, SubtitlePathScheme};
use crate::job_queue::JobQueue;
use crate::pipeline::{resolved_record, TranslationJob};
use crate::placeholder::{
    is_pending_placeholder, write_placeholder, NO_SUBTITLES_MESSAGE, PENDING_MESSAGE,
};
use crate::providers::ContentType;
use crate::source_resolver::{ResolveRequest, SourceResolver};
use crate::language_utils;

/// `ttNNN` for movies, `ttNNN:season:episode` for series episodes
static MEDIA_REF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(tt\d+)(?::(\d+):(\d+))?$").unwrap());

/// One parsed media reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTarget {
    pub content_type: ContentType,
    pub media_id: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl MediaTarget {
    /// Parse a raw media reference of the form `tt1234567` or
    /// `tt1234567:1:5`
    pub fn parse(raw: &str) -> Result<Self> {
        let captures = MEDIA_REF_REGEX
            .captures(raw.trim())
            .ok_or_else(|| anyhow!("Invalid media reference: '{}'", raw))?;

        let media_id = captures[1].to_string();
        let season = captures.get(2).map(|m| m.as_str().parse()).transpose()?;
        let episode = captures.get(3).map(|m| m.as_str().parse()).transpose()?;

        let content_type = if season.is_some() {
            ContentType::Series
        } else {
            ContentType::Movie
        };

        Ok(Self {
            content_type,
            media_id,
            season,
            episode,
        })
    }
}

/// Answer to one subtitle request: a public URL plus the label shown to
/// the end user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleAnswer {
    pub url: String,
    /// Language label, `{target}-translated` for files this service built
    pub language: String,
}

/// Orchestrates one subtitle request end to end.
///
/// Checks storage first, then walks the source fallback chain. A track
/// already in the target language is served directly from its source; any
/// other find gets a pending placeholder plus a queued translation job,
/// and polling callers pick up the real file once the job lands it.
pub struct AppController {
    config: Config,
    resolver: SourceResolver,
    repository: Repository,
    paths: SubtitlePathScheme,
    queue: Arc<JobQueue<TranslationJob>>,
}

impl AppController {
    pub fn new(
        config: Config,
        resolver: SourceResolver,
        repository: Repository,
        queue: Arc<JobQueue<TranslationJob>>,
    ) -> Self {
        let paths = SubtitlePathScheme::new(&config.subtitles_root);
        Self {
            config,
            resolver,
            repository,
            paths,
            queue,
        }
    }

    /// Handle one subtitle request for a raw media reference
    pub async fn handle_subtitle_request(&self, raw_id: &str) -> Result<SubtitleAnswer> {
        let target = MediaTarget::parse(raw_id)?;
        let lang = self.config.target_language.clone();
        let provider = self.config.translation.provider.to_lowercase_string();

        info!(
            "Subtitle request: {} ({}), target language {}",
            target.media_id,
            target.content_type.as_str(),
            lang
        );

        if let Some(answer) = self.answer_from_storage(&target, &lang, &provider).await? {
            return Ok(answer);
        }

        let request = ResolveRequest {
            content_type: target.content_type,
            media_id: target.media_id.clone(),
            season: target.season,
            episode: target.episode,
            target_language: lang.clone(),
        };

        match self.resolver.resolve(&request).await {
            Some(candidate) if language_utils::codes_match(&candidate.language_code, &lang) => {
                // Already in the target language, serve the source file as-is
                info!(
                    "Serving {} subtitle directly from source for {}",
                    candidate.language_code, target.media_id
                );
                Ok(SubtitleAnswer {
                    url: candidate.url,
                    language: self.language_label(),
                })
            }
            Some(candidate) => {
                // Placeholder and record must be on disk before the job can
                // finish, or a fast worker would see its output overwritten
                let answer = self
                    .placeholder_answer(&target, &lang, &provider, PENDING_MESSAGE)
                    .await?;
                self.enqueue_translation(&target, &lang, candidate).await?;
                Ok(answer)
            }
            None => {
                self.placeholder_answer(&target, &lang, &provider, NO_SUBTITLES_MESSAGE)
                    .await
            }
        }
    }

    /// Serve a previously recorded file when one exists and is not a
    /// leftover placeholder from an abandoned job
    async fn answer_from_storage(
        &self,
        target: &MediaTarget,
        lang: &str,
        provider: &str,
    ) -> Result<Option<SubtitleAnswer>> {
        let existing = self
            .repository
            .get_existing(&target.media_id, target.season, target.episode, lang)
            .await?;

        let Some(recorded_path) = existing.first() else {
            return Ok(None);
        };

        let local_path = self.paths.translated_path(
            provider,
            lang,
            &target.media_id,
            target.season,
            target.episode,
        );

        if !FileManager::file_exists(&local_path) {
            debug!(
                "Recorded subtitle missing on disk, re-resolving: {:?}",
                local_path
            );
            self.repository
                .delete_resolved(&target.media_id, target.season, target.episode, lang)
                .await?;
            return Ok(None);
        }

        if is_pending_placeholder(&local_path) {
            let job_key =
                TranslationJob::key_for(&target.media_id, target.season, target.episode, lang);
            let still_queued = self
                .repository
                .queue_contains(&target.media_id, target.season, target.episode, lang)
                .await?;

            if !still_queued && !self.queue.is_in_flight(&job_key) {
                // Placeholder with no live job behind it, start over
                warn!(
                    "Stale placeholder for {}, re-running resolution",
                    target.media_id
                );
                FileManager::remove_file(&local_path)?;
                self.repository
                    .delete_resolved(&target.media_id, target.season, target.episode, lang)
                    .await?;
                return Ok(None);
            }
        }

        debug!("Serving recorded subtitle: {}", recorded_path);
        Ok(Some(SubtitleAnswer {
            url: self.public_url(recorded_path),
            language: self.language_label(),
        }))
    }

    /// Write a placeholder file, record it, and answer with its URL
    async fn placeholder_answer(
        &self,
        target: &MediaTarget,
        lang: &str,
        provider: &str,
        message: &str,
    ) -> Result<SubtitleAnswer> {
        write_placeholder(
            &self.paths,
            provider,
            lang,
            &target.media_id,
            target.season,
            target.episode,
            message,
        )?;

        let url_path = self.paths.translated_url_path(
            provider,
            lang,
            &target.media_id,
            target.season,
            target.episode,
        );
        self.repository
            .record_resolved(&resolved_record(
                &target.media_id,
                target.content_type,
                target.season,
                target.episode,
                lang,
                url_path.clone(),
            ))
            .await?;

        Ok(SubtitleAnswer {
            url: self.public_url(&url_path),
            language: self.language_label(),
        })
    }

    /// Build and enqueue the translation job for a resolved candidate
    async fn enqueue_translation(
        &self,
        target: &MediaTarget,
        lang: &str,
        candidate: crate::providers::SubtitleCandidate,
    ) -> Result<()> {
        let job = TranslationJob {
            id: Uuid::new_v4(),
            content_type: target.content_type,
            media_id: target.media_id.clone(),
            season: target.season,
            episode: target.episode,
            candidates: vec![candidate],
            target_language: lang.to_string(),
            provider: self.config.translation.provider,
            api_key: self.config.translation.api_key.clone(),
            base_url: self.config.translation.base_url.clone(),
            model: self.config.translation.model.clone(),
        };

        if !self.queue.push(job) {
            debug!(
                "Translation for {} already in flight, serving the existing placeholder",
                target.media_id
            );
        }
        Ok(())
    }

    fn language_label(&self) -> String {
        format!("{}-translated", self.config.target_language)
    }

    fn public_url(&self, url_path: &str) -> String {
        format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            url_path
        )
    }
}
