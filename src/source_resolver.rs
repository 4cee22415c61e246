use std::sync::Arc;

use log::{debug, info, warn};

use crate::language_utils;
use crate::providers::{
    CatalogSource, ContentType, EpisodeSource, SearchSource, ShowIdMapper, SubtitleCandidate,
};

// @module: Ordered multi-source subtitle resolution

/// Language used as translation input when the target is unavailable
pub const SOURCE_LANGUAGE: &str = "en";

/// One subtitle lookup request
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub content_type: ContentType,
    pub media_id: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// Language the end user wants
    pub target_language: String,
}

/// Steps of the fallback chain, evaluated lazily in this exact order.
/// First match wins; there is no parallel fan-out.
#[derive(Debug, Clone, Copy)]
enum ResolveStep {
    EpisodeTarget,
    CatalogTarget,
    SearchTarget,
    EpisodeEnglish,
    CatalogEnglish,
    SearchEnglish,
    CatalogAny,
    SearchAny,
}

const RESOLVE_CHAIN: [ResolveStep; 8] = [
    ResolveStep::EpisodeTarget,
    ResolveStep::CatalogTarget,
    ResolveStep::SearchTarget,
    ResolveStep::EpisodeEnglish,
    ResolveStep::CatalogEnglish,
    ResolveStep::SearchEnglish,
    ResolveStep::CatalogAny,
    ResolveStep::SearchAny,
];

/// Resolves at most one subtitle candidate across three independent
/// sources.
///
/// Each source is queried for the target language first, then for English
/// as the translation input, and finally for anything at all. A failing or
/// empty source is "no match" and the chain continues; the resolver itself
/// performs no persistence and no side effects beyond the network calls.
pub struct SourceResolver {
    catalog: Arc<dyn CatalogSource>,
    search: Arc<dyn SearchSource>,
    episodes: Arc<dyn EpisodeSource>,
    show_ids: Arc<dyn ShowIdMapper>,
}

impl SourceResolver {
    /// Create a resolver over the given sources
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        search: Arc<dyn SearchSource>,
        episodes: Arc<dyn EpisodeSource>,
        show_ids: Arc<dyn ShowIdMapper>,
    ) -> Self {
        Self {
            catalog,
            search,
            episodes,
            show_ids,
        }
    }

    /// Walk the fallback chain and return the first acceptable candidate,
    /// or `None` when every source comes up empty
    pub async fn resolve(&self, request: &ResolveRequest) -> Option<SubtitleCandidate> {
        // The catalog answers with its full track list in one lookup, so
        // fetch it once and reuse it across the catalog-backed steps.
        let catalog_tracks = self.fetch_catalog(request).await;
        let target = request.target_language.as_str();

        for step in RESOLVE_CHAIN {
            let candidate = match step {
                ResolveStep::EpisodeTarget => self.episode_lookup(request, target).await,
                ResolveStep::CatalogTarget => Self::find_in_catalog(&catalog_tracks, target),
                ResolveStep::SearchTarget => self.search_lookup(request, Some(target)).await,
                ResolveStep::EpisodeEnglish => self.episode_lookup(request, SOURCE_LANGUAGE).await,
                ResolveStep::CatalogEnglish => {
                    Self::find_in_catalog(&catalog_tracks, SOURCE_LANGUAGE)
                }
                ResolveStep::SearchEnglish => {
                    self.search_lookup(request, Some(SOURCE_LANGUAGE)).await
                }
                ResolveStep::CatalogAny => catalog_tracks.first().cloned(),
                ResolveStep::SearchAny => self.search_lookup(request, None).await,
            };

            if let Some(candidate) = candidate {
                info!(
                    "Resolved subtitle for {} via {:?}: {} ({})",
                    request.media_id, step, candidate.url, candidate.language_code
                );
                return Some(candidate);
            }
        }

        info!("No subtitles found on any source for {}", request.media_id);
        None
    }

    /// Fetch the catalog track list, degrading to empty on failure
    async fn fetch_catalog(&self, request: &ResolveRequest) -> Vec<SubtitleCandidate> {
        match self
            .catalog
            .list_subtitles(
                request.content_type,
                &request.media_id,
                request.season,
                request.episode,
            )
            .await
        {
            Ok(tracks) => {
                debug!("Catalog returned {} tracks for {}", tracks.len(), request.media_id);
                tracks
            }
            Err(e) => {
                warn!(
                    "Catalog lookup failed for {}, falling back to other sources: {}",
                    request.media_id, e
                );
                Vec::new()
            }
        }
    }

    /// First catalog track whose language matches, comparing through the
    /// normalizer since the catalog echoes 2-letter codes
    fn find_in_catalog(
        tracks: &[SubtitleCandidate],
        language_code: &str,
    ) -> Option<SubtitleCandidate> {
        tracks
            .iter()
            .find(|track| language_utils::codes_match(&track.language_code, language_code))
            .cloned()
    }

    /// Episode-source lookup; series only, and only when the id mapping
    /// collaborator knows the show
    async fn episode_lookup(
        &self,
        request: &ResolveRequest,
        language_code: &str,
    ) -> Option<SubtitleCandidate> {
        let (ContentType::Series, Some(season), Some(episode)) =
            (request.content_type, request.season, request.episode)
        else {
            return None;
        };

        let show_id = match self.show_ids.external_show_id(&request.media_id).await {
            Ok(Some(show_id)) => show_id,
            Ok(None) => {
                debug!("No external show id mapping for {}", request.media_id);
                return None;
            }
            Err(e) => {
                warn!("Show id mapping failed for {}: {}", request.media_id, e);
                return None;
            }
        };

        match self
            .episodes
            .find_episode(&show_id, season, episode, language_code)
            .await
        {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(
                    "Episode lookup failed for {} s{}e{} ({}): {}",
                    request.media_id, season, episode, language_code, e
                );
                None
            }
        }
    }

    /// Search-source lookup with failure treated as no match
    async fn search_lookup(
        &self,
        request: &ResolveRequest,
        language_code: Option<&str>,
    ) -> Option<SubtitleCandidate> {
        match self.search.search(&request.media_id, language_code).await {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(
                    "Search failed for {} ({}): {}",
                    request.media_id,
                    language_code.unwrap_or("any"),
                    e
                );
                None
            }
        }
    }
}
