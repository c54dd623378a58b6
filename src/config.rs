//! Persistent configuration model and defaults.

use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// External catalog endpoints and limits.
    pub igdb: IgdbConfig,
    #[serde(default)]
    /// Cover-matching thresholds and stopword vocabulary.
    pub matching: MatchingConfig,
    #[serde(default)]
    /// Detail cascade, translation and alias settings.
    pub detail: DetailConfig,
    #[serde(default)]
    /// Local catalog database location.
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IgdbConfig {
    /// Falls back to `IGDB_CLIENT_ID` when empty.
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Cover URL with `{size}` and `{image_id}` placeholders.
    #[serde(default = "default_image_url_template")]
    pub image_url_template: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MatchingConfig {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_early_exit_score")]
    pub early_exit_score: f64,
    /// Replaces the built-in stopword list when present.
    #[serde(default)]
    pub stopwords: Option<Vec<String>>,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DetailConfig {
    #[serde(default = "default_translation_url")]
    pub translation_url: String,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_max_translation_chars")]
    pub max_translation_chars: usize,
    /// Pause between unsuccessful cascade queries.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Title → alternate search strings, merged over the built-in table.
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct StoreConfig {
    /// Defaults to `<data dir>/catalog-enricher/catalog.db` when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Default for IgdbConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            token_url: default_token_url(),
            search_url: default_search_url(),
            image_url_template: default_image_url_template(),
            search_limit: default_search_limit(),
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            early_exit_score: default_early_exit_score(),
            stopwords: None,
            extra_stopwords: Vec::new(),
        }
    }
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            translation_url: default_translation_url(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            max_translation_chars: default_max_translation_chars(),
            retry_delay_ms: default_retry_delay_ms(),
            aliases: HashMap::new(),
        }
    }
}

fn default_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_search_url() -> String {
    "https://api.igdb.com/v4/games".to_string()
}

fn default_image_url_template() -> String {
    "https://images.igdb.com/igdb/image/upload/t_{size}/{image_id}.jpg".to_string()
}

fn default_search_limit() -> u32 {
    7
}

fn default_requests_per_second() -> u32 {
    4
}

fn default_timeout_secs() -> u32 {
    15
}

fn default_min_score() -> f64 {
    0.55
}

fn default_early_exit_score() -> f64 {
    0.75
}

fn default_translation_url() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_max_translation_chars() -> usize {
    4000
}

fn default_retry_delay_ms() -> u64 {
    250
}
