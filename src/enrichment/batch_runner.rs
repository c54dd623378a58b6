//! Sequential batch driver for cover and detail runs.

use log::{info, warn};

use crate::backends::{AccessToken, CatalogStore, TokenAuthClient};
use crate::enrichment::cover_matcher::{CoverMatcher, CoverResolution};
use crate::enrichment::detail_matcher::{merge_update, needs_description, DetailMatcher};
use crate::error::EnrichError;
use crate::protocol::{
    CatalogRecord, EnrichmentMode, RecordUpdate, RunSummary, TitleOutcome, TitleStatus,
};

const SUMMARY_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    /// Truncates the pending backlog before the run starts.
    pub limit: Option<usize>,
    /// Detail runs only: replace fields that already hold a value.
    pub overwrite: bool,
}

struct SummaryBuilder {
    mode: EnrichmentMode,
    total: usize,
    updated: usize,
    sample: Vec<TitleOutcome>,
    dry_run: bool,
}

impl SummaryBuilder {
    fn new(mode: EnrichmentMode, total: usize, dry_run: bool) -> Self {
        Self {
            mode,
            total,
            updated: 0,
            sample: Vec::new(),
            dry_run,
        }
    }

    fn record(&mut self, outcome: TitleOutcome) {
        if outcome.status == TitleStatus::Matched {
            self.updated += 1;
        }
        if self.sample.len() < SUMMARY_SAMPLE_SIZE {
            self.sample.push(outcome);
        }
    }

    fn finish(self) -> RunSummary {
        RunSummary {
            mode: self.mode,
            total: self.total,
            updated: self.updated,
            sample: self.sample,
            dry_run: self.dry_run,
        }
    }
}

fn outcome(record: &CatalogRecord, status: TitleStatus) -> TitleOutcome {
    TitleOutcome {
        id: record.id,
        title: record.title.clone(),
        status,
        value: None,
        note: None,
    }
}

/// Processes pending catalog records one at a time.
pub struct BatchRunner<'a> {
    auth: &'a dyn TokenAuthClient,
    store: &'a dyn CatalogStore,
    options: RunOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        auth: &'a dyn TokenAuthClient,
        store: &'a dyn CatalogStore,
        options: RunOptions,
    ) -> Self {
        Self {
            auth,
            store,
            options,
        }
    }

    /// Credential exchange and backlog listing are the only run-level failures.
    fn prepare(&self, mode: EnrichmentMode) -> Result<(AccessToken, Vec<CatalogRecord>), EnrichError> {
        let token = self.auth.get_token()?;
        let mut pending = self.store.list_pending(mode, self.options.overwrite)?;
        if let Some(limit) = self.options.limit {
            pending.truncate(limit);
        }
        info!(
            "Batch[{:?}]: {} pending titles (dry run: {})",
            mode,
            pending.len(),
            self.options.dry_run
        );
        Ok((token, pending))
    }

    /// Writes `update` unless this is a dry run; failures become a per-title note.
    fn persist_outcome(
        &self,
        record: &CatalogRecord,
        update: &RecordUpdate,
        mut matched: TitleOutcome,
    ) -> TitleOutcome {
        if self.options.dry_run {
            return matched;
        }
        match self.store.persist(record.id, update) {
            Ok(()) => matched,
            Err(error) => {
                warn!("Batch: failed to persist '{}': {}", record.title, error);
                matched.status = TitleStatus::Failed;
                matched.note = Some(format!("persist failed: {error}"));
                matched
            }
        }
    }

    pub fn run_covers(&self, matcher: &CoverMatcher<'_>) -> Result<RunSummary, EnrichError> {
        let (token, pending) = self.prepare(EnrichmentMode::Covers)?;
        let mut summary =
            SummaryBuilder::new(EnrichmentMode::Covers, pending.len(), self.options.dry_run);

        for record in &pending {
            let resolved = match matcher.resolve(&token, &record.title) {
                CoverResolution::Override { url } => Some((url, "manual override".to_string())),
                CoverResolution::Matched { url, matched } => {
                    Some((url, format!("score {:.2}", matched.score)))
                }
                CoverResolution::NoMatch { best_score } => {
                    let mut no_match = outcome(record, TitleStatus::NoMatch);
                    no_match.note = Some(match best_score {
                        Some(score) => format!(
                            "no match (best score {:.2} below {:.2})",
                            score,
                            matcher.settings().min_score
                        ),
                        None => "no match".to_string(),
                    });
                    summary.record(no_match);
                    None
                }
            };
            let Some((url, note)) = resolved else {
                continue;
            };

            let mut matched = outcome(record, TitleStatus::Matched);
            matched.value = Some(url.clone());
            matched.note = Some(note);
            summary.record(self.persist_outcome(record, &RecordUpdate::Cover { url }, matched));
        }

        Ok(summary.finish())
    }

    pub fn run_details(&self, matcher: &DetailMatcher<'_>) -> Result<RunSummary, EnrichError> {
        let (token, pending) = self.prepare(EnrichmentMode::Details)?;
        let mut summary =
            SummaryBuilder::new(EnrichmentMode::Details, pending.len(), self.options.dry_run);

        for record in &pending {
            let wants_description = needs_description(record, self.options.overwrite);
            let Some(detail) = matcher.resolve(&token, &record.title, wants_description) else {
                let mut no_match = outcome(record, TitleStatus::NoMatch);
                no_match.note = Some("no match".to_string());
                summary.record(no_match);
                continue;
            };

            let Some(update) = merge_update(record, &detail, self.options.overwrite) else {
                let mut skipped = outcome(record, TitleStatus::Skipped);
                skipped.value = Some(detail.matched_name);
                skipped.note = Some("matched, but no empty fields to fill".to_string());
                summary.record(skipped);
                continue;
            };

            let mut matched = outcome(record, TitleStatus::Matched);
            matched.value = Some(detail.matched_name.clone());
            matched.note = Some(format!(
                "via '{}'; {} genres{}",
                detail.query,
                detail.genres.len(),
                if detail.description.is_some() {
                    ", description"
                } else {
                    ""
                }
            ));
            summary.record(self.persist_outcome(record, &update, matched));
        }

        Ok(summary.finish())
    }
}
