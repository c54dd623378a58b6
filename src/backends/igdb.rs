//! IGDB catalog adapter: client-credential auth and Apicalypse search.

use std::num::NonZeroU32;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use serde_json::Value;

use crate::backends::{external_call_error, AccessToken, CatalogSearchClient, TokenAuthClient};
use crate::config::IgdbConfig;
use crate::error::EnrichError;
use crate::protocol::{Candidate, SearchFields, SearchQuery};

const SEARCH_SERVICE: &str = "catalog search";
const AUTH_SERVICE: &str = "token exchange";
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const RATE_LIMIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Client id/secret pair for the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgdbCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl IgdbCredentials {
    /// Fails with a configuration error when either half is blank.
    pub fn new(client_id: &str, client_secret: &str) -> Result<Self, EnrichError> {
        let client_id = client_id.trim();
        let client_secret = client_secret.trim();
        if client_id.is_empty() {
            return Err(EnrichError::Configuration(
                "missing IGDB client id (set IGDB_CLIENT_ID or [igdb] client_id)".to_string(),
            ));
        }
        if client_secret.is_empty() {
            return Err(EnrichError::Configuration(
                "missing IGDB client secret (set IGDB_CLIENT_SECRET or run set-secret)"
                    .to_string(),
            ));
        }
        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }
}

/// IGDB adapter backed by `ureq`. Every outbound request waits for a slot in
/// a shared rate limiter.
pub struct IgdbClient {
    http_client: ureq::Agent,
    credentials: IgdbCredentials,
    token_url: String,
    search_url: String,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    cached_token: Mutex<Option<AccessToken>>,
}

impl IgdbClient {
    pub fn new(config: &IgdbConfig, credentials: IgdbCredentials) -> Self {
        let timeout = Duration::from_secs(u64::from(config.timeout_secs.max(1)));
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            http_client,
            credentials,
            token_url: config.token_url.trim().to_string(),
            search_url: config.search_url.trim().to_string(),
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
            cached_token: Mutex::new(None),
        }
    }

    fn wait_for_rate_limit_slot(&self) {
        while self.limiter.check().is_err() {
            std::thread::sleep(RATE_LIMIT_POLL_INTERVAL);
        }
    }

    fn exchange_token(&self) -> Result<AccessToken, EnrichError> {
        self.wait_for_rate_limit_slot();
        let response = self
            .http_client
            .post(&self.token_url)
            .set("Accept", "application/json")
            .send_form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .map_err(|error| external_call_error(AUTH_SERVICE, error))?;
        let payload: Value = response
            .into_json()
            .map_err(|error| EnrichError::external(AUTH_SERVICE, error.to_string()))?;
        parse_token_payload(&payload, Instant::now())
    }
}

impl TokenAuthClient for IgdbClient {
    fn get_token(&self) -> Result<AccessToken, EnrichError> {
        let mut cached = self
            .cached_token
            .lock()
            .map_err(|_| EnrichError::Configuration("token cache poisoned".to_string()))?;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.clone());
            }
            debug!("IGDB: cached access token expired, exchanging credentials again");
        }
        let token = self.exchange_token().map_err(|error| match error {
            EnrichError::Configuration(_) => error,
            other => EnrichError::Configuration(format!("credential exchange failed: {other}")),
        })?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

impl CatalogSearchClient for IgdbClient {
    fn search(
        &self,
        token: &AccessToken,
        query: &SearchQuery,
    ) -> Result<Vec<Candidate>, EnrichError> {
        let body = build_query_body(query);
        debug!("IGDB: {}", body);
        self.wait_for_rate_limit_slot();
        let response = self
            .http_client
            .post(&self.search_url)
            .set("Client-ID", &self.credentials.client_id)
            .set("Authorization", &format!("Bearer {}", token.value))
            .set("Accept", "application/json")
            .send_string(&body)
            .map_err(|error| external_call_error(SEARCH_SERVICE, error))?;
        let payload: Value = response
            .into_json()
            .map_err(|error| EnrichError::external(SEARCH_SERVICE, error.to_string()))?;
        let Some(items) = payload.as_array() else {
            warn!("IGDB: search response was not an array, treating as no results");
            return Ok(Vec::new());
        };
        Ok(items.iter().filter_map(parse_candidate).collect())
    }
}

fn escape_search_term(term: &str) -> String {
    term.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Renders the Apicalypse request body for one query.
pub(crate) fn build_query_body(query: &SearchQuery) -> String {
    let fields = match query.fields {
        SearchFields::Cover => "name, cover.image_id, alternative_names.name",
        SearchFields::Detail => "name, summary, genres.name",
    };
    let filter = if query.exclude_versions {
        " where version_parent = null;"
    } else {
        ""
    };
    format!(
        "search \"{}\"; fields {};{} limit {};",
        escape_search_term(&query.term),
        fields,
        filter,
        query.limit.max(1)
    )
}

fn named_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_candidate(item: &Value) -> Option<Candidate> {
    let name = item.get("name")?.as_str()?.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let image_id = item
        .get("cover")
        .and_then(|cover| cover.get("image_id"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);
    let summary = item
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);
    Some(Candidate {
        name,
        alternative_names: named_list(item.get("alternative_names")),
        image_id,
        summary,
        genres: named_list(item.get("genres")),
    })
}

pub(crate) fn parse_token_payload(payload: &Value, now: Instant) -> Result<AccessToken, EnrichError> {
    let value = payload
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| EnrichError::external(AUTH_SERVICE, "response carried no access_token"))?;
    let expires_at = payload
        .get("expires_in")
        .and_then(Value::as_u64)
        .map(|seconds| now + Duration::from_secs(seconds).saturating_sub(TOKEN_EXPIRY_MARGIN));
    Ok(AccessToken {
        value: value.to_string(),
        expires_at,
    })
}
