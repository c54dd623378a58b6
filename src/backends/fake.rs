//! In-memory collaborators for orchestrator and batch tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::backends::{
    AccessToken, CatalogSearchClient, CatalogStore, TokenAuthClient, TranslationClient,
};
use crate::error::EnrichError;
use crate::protocol::{Candidate, CatalogRecord, EnrichmentMode, RecordUpdate, SearchQuery};

pub fn test_token() -> AccessToken {
    AccessToken {
        value: "test-token".to_string(),
        expires_at: None,
    }
}

pub fn candidate(name: &str, image_id: Option<&str>) -> Candidate {
    Candidate {
        name: name.to_string(),
        image_id: image_id.map(ToOwned::to_owned),
        ..Candidate::default()
    }
}

pub fn detail_candidate(name: &str, summary: &str, genres: &[&str]) -> Candidate {
    Candidate {
        name: name.to_string(),
        summary: Some(summary.to_string()),
        genres: genres.iter().map(|genre| genre.to_string()).collect(),
        ..Candidate::default()
    }
}

pub struct FakeAuth {
    pub missing_credentials: bool,
}

impl TokenAuthClient for FakeAuth {
    fn get_token(&self) -> Result<AccessToken, EnrichError> {
        if self.missing_credentials {
            return Err(EnrichError::Configuration("missing IGDB client id".to_string()));
        }
        Ok(test_token())
    }
}

/// Answers each search term with a scripted response; unknown terms get no results.
#[derive(Default)]
pub struct FakeSearch {
    responses: HashMap<String, Result<Vec<Candidate>, String>>,
    issued: Mutex<Vec<SearchQuery>>,
}

impl FakeSearch {
    pub fn with_results(mut self, term: &str, candidates: Vec<Candidate>) -> Self {
        self.responses.insert(term.to_string(), Ok(candidates));
        self
    }

    pub fn with_failure(mut self, term: &str, message: &str) -> Self {
        self.responses
            .insert(term.to_string(), Err(message.to_string()));
        self
    }

    pub fn issued(&self) -> Vec<SearchQuery> {
        self.issued.lock().expect("issued lock").clone()
    }

    pub fn issued_terms(&self) -> Vec<String> {
        self.issued().into_iter().map(|query| query.term).collect()
    }
}

impl CatalogSearchClient for FakeSearch {
    fn search(
        &self,
        _token: &AccessToken,
        query: &SearchQuery,
    ) -> Result<Vec<Candidate>, EnrichError> {
        self.issued.lock().expect("issued lock").push(query.clone());
        match self.responses.get(&query.term) {
            Some(Ok(candidates)) => Ok(candidates
                .iter()
                .take(query.limit as usize)
                .cloned()
                .collect()),
            Some(Err(message)) => Err(EnrichError::external("catalog search", message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Prefixes text with `[es] `, or fails every call.
pub struct FakeTranslator {
    pub fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeTranslator {
    pub fn working() -> Self {
        Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl TranslationClient for FakeTranslator {
    fn translate(&self, text: &str) -> Result<String, EnrichError> {
        self.calls.lock().expect("calls lock").push(text.to_string());
        if self.fail {
            return Err(EnrichError::TranslationUnavailable("HTTP 503".to_string()));
        }
        Ok(format!("[es] {text}"))
    }
}

#[derive(Default)]
pub struct FakeStore {
    records: Vec<CatalogRecord>,
    failing_ids: Vec<i64>,
    fail_listing: bool,
    persisted: Mutex<Vec<(i64, RecordUpdate)>>,
}

impl FakeStore {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing_persist_for(mut self, id: i64) -> Self {
        self.failing_ids.push(id);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn persisted(&self) -> Vec<(i64, RecordUpdate)> {
        self.persisted.lock().expect("persisted lock").clone()
    }
}

impl CatalogStore for FakeStore {
    fn list_pending(
        &self,
        mode: EnrichmentMode,
        overwrite: bool,
    ) -> Result<Vec<CatalogRecord>, EnrichError> {
        if self.fail_listing {
            return Err(EnrichError::Store(rusqlite::Error::InvalidQuery));
        }
        Ok(self
            .records
            .iter()
            .filter(|record| record.is_pending(mode, overwrite))
            .cloned()
            .collect())
    }

    fn persist(&self, id: i64, update: &RecordUpdate) -> Result<(), EnrichError> {
        if self.failing_ids.contains(&id) {
            return Err(EnrichError::Store(rusqlite::Error::QueryReturnedNoRows));
        }
        self.persisted
            .lock()
            .expect("persisted lock")
            .push((id, update.clone()));
        Ok(())
    }
}
