//! Best-of-N cover art resolution.
//!
//! For each query variant of a title the catalog is searched once. Candidates
//! that miss any distinctive source token are dropped before scoring; the rest
//! are scored by Jaccard similarity. The cascade stops as soon as a candidate
//! clears the early-exit cutoff, otherwise the best score across all variants
//! wins if it reaches the minimum threshold.

use log::{debug, info, warn};

use crate::backends::{AccessToken, CatalogSearchClient};
use crate::config::Config;
use crate::matching::similarity::jaccard;
use crate::matching::variants::query_variants;
use crate::matching::{TitleProfile, TokenPipeline};
use crate::protocol::{Candidate, CoverMatch, ImageSize, OverrideMap, SearchFields, SearchQuery};

#[derive(Debug, Clone, PartialEq)]
pub struct CoverMatchSettings {
    pub min_score: f64,
    pub early_exit_score: f64,
    pub search_limit: u32,
    pub image_size: ImageSize,
    pub image_url_template: String,
}

impl CoverMatchSettings {
    pub fn from_config(config: &Config, image_size: ImageSize, min_score: Option<f64>) -> Self {
        Self {
            min_score: min_score.unwrap_or(config.matching.min_score),
            early_exit_score: config.matching.early_exit_score,
            search_limit: config.igdb.search_limit,
            image_size,
            image_url_template: config.igdb.image_url_template.clone(),
        }
    }
}

/// How a single title's cover was (or was not) resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverResolution {
    Override { url: String },
    Matched { url: String, matched: CoverMatch },
    NoMatch { best_score: Option<f64> },
}

/// Substitutes the size token and image id into the URL template.
pub fn cover_url(template: &str, size: ImageSize, image_id: &str) -> String {
    template
        .replace("{size}", size.size_token())
        .replace("{image_id}", image_id)
}

pub struct CoverMatcher<'a> {
    search: &'a dyn CatalogSearchClient,
    pipeline: &'a TokenPipeline,
    overrides: &'a OverrideMap,
    settings: CoverMatchSettings,
}

impl<'a> CoverMatcher<'a> {
    pub fn new(
        search: &'a dyn CatalogSearchClient,
        pipeline: &'a TokenPipeline,
        overrides: &'a OverrideMap,
        settings: CoverMatchSettings,
    ) -> Self {
        Self {
            search,
            pipeline,
            overrides,
            settings,
        }
    }

    pub fn settings(&self) -> &CoverMatchSettings {
        &self.settings
    }

    pub fn resolve(&self, token: &AccessToken, title: &str) -> CoverResolution {
        if let Some(url) = self.overrides.lookup(title) {
            info!("CoverMatch[{}]: using manual override", title);
            return CoverResolution::Override {
                url: url.to_string(),
            };
        }

        let profile = self.pipeline.profile(title);
        match self.best_candidate(token, title, &profile) {
            Some(matched) if matched.score >= self.settings.min_score => {
                let url = cover_url(
                    &self.settings.image_url_template,
                    self.settings.image_size,
                    &matched.image_id,
                );
                info!(
                    "CoverMatch[{}]: accepted {} (score {:.3})",
                    title, matched.image_id, matched.score
                );
                CoverResolution::Matched { url, matched }
            }
            best => {
                let best_score = best.map(|matched| matched.score);
                info!(
                    "CoverMatch[{}]: no match (best score {:?}, threshold {:.2})",
                    title, best_score, self.settings.min_score
                );
                CoverResolution::NoMatch { best_score }
            }
        }
    }

    /// Gate first, then score. `None` when the candidate is unusable.
    fn score_candidate(&self, profile: &TitleProfile, candidate: &Candidate) -> Option<CoverMatch> {
        let image_id = candidate.usable_image_id()?;
        let candidate_tokens = self.pipeline.token_set(&candidate.joined_names());
        if !profile.admits(&candidate_tokens) {
            return None;
        }
        Some(CoverMatch {
            image_id: image_id.to_string(),
            score: jaccard(&profile.tokens, &candidate_tokens),
        })
    }

    /// Walks variants then candidates, returning early on a high-confidence hit.
    fn best_candidate(
        &self,
        token: &AccessToken,
        title: &str,
        profile: &TitleProfile,
    ) -> Option<CoverMatch> {
        let mut best: Option<CoverMatch> = None;
        for variant in query_variants(title) {
            let query = SearchQuery {
                term: variant,
                fields: SearchFields::Cover,
                limit: self.settings.search_limit,
                exclude_versions: false,
            };
            let candidates = match self.search.search(token, &query) {
                Ok(candidates) => candidates,
                Err(error) => {
                    warn!(
                        "CoverMatch[{}]: search for '{}' failed, treating as no results: {}",
                        title, query.term, error
                    );
                    continue;
                }
            };
            debug!(
                "CoverMatch[{}]: variant '{}' produced {} candidates",
                title,
                query.term,
                candidates.len()
            );

            for candidate in &candidates {
                let Some(scored) = self.score_candidate(profile, candidate) else {
                    debug!("CoverMatch[{}]: rejected '{}'", title, candidate.name);
                    continue;
                };
                if scored.score >= self.settings.early_exit_score {
                    debug!(
                        "CoverMatch[{}]: '{}' cleared early-exit cutoff ({:.3})",
                        title, candidate.name, scored.score
                    );
                    return Some(scored);
                }
                if best
                    .as_ref()
                    .map_or(true, |current| scored.score > current.score)
                {
                    best = Some(scored);
                }
            }
        }
        best
    }
}
