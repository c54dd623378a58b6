//! Collaborator interfaces and their concrete implementations.
//!
//! The resolution engine only talks to the outside world through the four
//! traits below. Each call returns a `Result` at the boundary; the
//! orchestrators decide which failures are per-title notes and which abort
//! the run.

#[cfg(test)]
pub mod fake;
pub mod igdb;
pub mod translation;

use std::time::Instant;

use crate::error::EnrichError;
use crate::protocol::{Candidate, CatalogRecord, EnrichmentMode, RecordUpdate, SearchQuery};

/// Bearer token obtained through the client-credential exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

pub trait TokenAuthClient {
    /// Missing credentials or a failed exchange is an
    /// [`EnrichError::Configuration`] and aborts the run.
    fn get_token(&self) -> Result<AccessToken, EnrichError>;
}

pub trait CatalogSearchClient {
    fn search(
        &self,
        token: &AccessToken,
        query: &SearchQuery,
    ) -> Result<Vec<Candidate>, EnrichError>;
}

pub trait TranslationClient {
    fn translate(&self, text: &str) -> Result<String, EnrichError>;
}

pub trait CatalogStore {
    fn list_pending(
        &self,
        mode: EnrichmentMode,
        overwrite: bool,
    ) -> Result<Vec<CatalogRecord>, EnrichError>;
    fn persist(&self, id: i64, update: &RecordUpdate) -> Result<(), EnrichError>;
}

/// Flattens a `ureq` failure into an [`EnrichError::ExternalCall`].
pub(crate) fn external_call_error(service: &'static str, error: ureq::Error) -> EnrichError {
    match error {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let snippet: String = body.trim().chars().take(160).collect();
            if snippet.is_empty() {
                EnrichError::external(service, format!("HTTP {code}"))
            } else {
                EnrichError::external(service, format!("HTTP {code}: {snippet}"))
            }
        }
        ureq::Error::Transport(transport) => EnrichError::external(service, transport.to_string()),
    }
}

/// Cuts `value` to at most `max_chars` characters on a char boundary.
pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect()
}
