//! First-success synopsis and genre resolution.
//!
//! Queries run strictly in order: the display-normalized title (edition
//! variants excluded), its head before the first `:`/`-`, then any aliases.
//! The first query that returns a record wins.

use std::time::Duration;

use log::{debug, info, warn};

use crate::backends::{AccessToken, CatalogSearchClient, TranslationClient};
use crate::matching::aliases::AliasTable;
use crate::matching::genre_mapper::GenreMapper;
use crate::matching::normalize::{collapse_whitespace, normalize_display_title};
use crate::protocol::{Candidate, CatalogRecord, DetailMatch, RecordUpdate, SearchFields, SearchQuery};

const DETAIL_RESULT_LIMIT: u32 = 1;

pub struct DetailMatcher<'a> {
    search: &'a dyn CatalogSearchClient,
    translator: &'a dyn TranslationClient,
    aliases: &'a AliasTable,
    genres: &'a GenreMapper,
    retry_delay: Duration,
    pause: &'a dyn Fn(Duration),
}

impl<'a> DetailMatcher<'a> {
    pub fn new(
        search: &'a dyn CatalogSearchClient,
        translator: &'a dyn TranslationClient,
        aliases: &'a AliasTable,
        genres: &'a GenreMapper,
        retry_delay: Duration,
    ) -> Self {
        Self {
            search,
            translator,
            aliases,
            genres,
            retry_delay,
            pause: &std::thread::sleep,
        }
    }

    /// Replaces the between-attempt sleep.
    #[cfg(test)]
    pub fn with_pause(mut self, pause: &'a dyn Fn(Duration)) -> Self {
        self.pause = pause;
        self
    }

    /// Ordered, case-insensitively deduplicated query list for `title`.
    pub fn detail_queries(&self, title: &str) -> Vec<SearchQuery> {
        let normalized = normalize_display_title(title);
        if normalized.is_empty() {
            return Vec::new();
        }
        let simplified = normalized
            .split([':', '-'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let mut queries: Vec<SearchQuery> = Vec::new();
        let mut push_query = |term: String, exclude_versions: bool| {
            let term = collapse_whitespace(&term);
            if term.is_empty()
                || queries
                    .iter()
                    .any(|existing| existing.term.eq_ignore_ascii_case(&term))
            {
                return;
            }
            queries.push(SearchQuery {
                term,
                fields: SearchFields::Detail,
                limit: DETAIL_RESULT_LIMIT,
                exclude_versions,
            });
        };

        push_query(normalized.clone(), true);
        push_query(simplified, false);
        for alias in self.aliases.lookup(&normalized) {
            push_query(alias.clone(), false);
        }
        queries
    }

    /// Runs the cascade and stops at the first query returning any record.
    fn first_hit(
        &self,
        token: &AccessToken,
        title: &str,
        queries: &[SearchQuery],
    ) -> Option<(String, Candidate)> {
        for (index, query) in queries.iter().enumerate() {
            match self.search.search(token, query) {
                Ok(candidates) => {
                    if let Some(candidate) = candidates.into_iter().next() {
                        debug!(
                            "DetailMatch[{}]: query '{}' returned '{}'",
                            title, query.term, candidate.name
                        );
                        return Some((query.term.clone(), candidate));
                    }
                    debug!("DetailMatch[{}]: query '{}' returned nothing", title, query.term);
                }
                Err(error) => {
                    warn!(
                        "DetailMatch[{}]: query '{}' failed, treating as no results: {}",
                        title, query.term, error
                    );
                }
            }
            let is_last = index + 1 == queries.len();
            if !is_last && !self.retry_delay.is_zero() {
                (self.pause)(self.retry_delay);
            }
        }
        None
    }

    /// Falls back to the source text on any translation failure.
    fn translate_or_fallback(&self, title: &str, synopsis: &str) -> String {
        let source = collapse_whitespace(synopsis);
        match self.translator.translate(&source) {
            Ok(translated) if !translated.trim().is_empty() => translated.trim().to_string(),
            Ok(_) => {
                warn!("DetailMatch[{}]: translation came back empty, keeping source text", title);
                source
            }
            Err(error) => {
                warn!(
                    "DetailMatch[{}]: translation failed, keeping source text: {}",
                    title, error
                );
                source
            }
        }
    }

    /// Resolves `title`. The synopsis is only translated when
    /// `wants_description` is set; otherwise the match carries no description.
    pub fn resolve(
        &self,
        token: &AccessToken,
        title: &str,
        wants_description: bool,
    ) -> Option<DetailMatch> {
        let queries = self.detail_queries(title);
        let Some((query, candidate)) = self.first_hit(token, title, &queries) else {
            info!(
                "DetailMatch[{}]: no match after {} queries",
                title,
                queries.len()
            );
            return None;
        };

        let description = candidate
            .summary
            .as_deref()
            .filter(|summary| wants_description && !summary.trim().is_empty())
            .map(|summary| self.translate_or_fallback(title, summary));
        let genres = self.genres.map_genres(&candidate.genres);
        info!(
            "DetailMatch[{}]: matched '{}' via '{}' ({} genres)",
            title,
            candidate.name,
            query,
            genres.len()
        );
        Some(DetailMatch {
            matched_name: candidate.name,
            query,
            description,
            genres,
        })
    }
}

/// Whether a detail run may write the description of `record`.
pub fn needs_description(record: &CatalogRecord, overwrite: bool) -> bool {
    overwrite || !record.has_description()
}

/// Fields to write for `record`: only empty ones unless `overwrite` is set.
/// `None` when nothing would change.
pub fn merge_update(
    record: &CatalogRecord,
    detail: &DetailMatch,
    overwrite: bool,
) -> Option<RecordUpdate> {
    let description = detail
        .description
        .clone()
        .filter(|_| needs_description(record, overwrite));
    let genres = (!detail.genres.is_empty() && (overwrite || !record.has_genres()))
        .then(|| detail.genres.clone());
    let update = RecordUpdate::Details {
        description,
        genres,
    };
    (!update.is_empty()).then_some(update)
}
