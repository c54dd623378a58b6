//! Shared data model passed between the store, the orchestrators and the batch runner.

use std::collections::HashMap;

use serde::Serialize;

/// Which resolution pass a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    Covers,
    Details,
}

/// One locally stored catalog entry as read from the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogRecord {
    pub id: i64,
    pub title: String,
    pub cover_url: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
}

impl CatalogRecord {
    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    pub fn has_genres(&self) -> bool {
        !self.genres.is_empty()
    }

    pub fn has_cover(&self) -> bool {
        self.cover_url
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    /// Whether a run in `mode` still has work to do for this record.
    pub fn is_pending(&self, mode: EnrichmentMode, overwrite: bool) -> bool {
        match mode {
            EnrichmentMode::Covers => !self.has_cover(),
            EnrichmentMode::Details => overwrite || !self.has_description() || !self.has_genres(),
        }
    }
}

/// External metadata record proposed as a possible match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    pub name: String,
    pub alternative_names: Vec<String>,
    pub image_id: Option<String>,
    pub summary: Option<String>,
    pub genres: Vec<String>,
}

impl Candidate {
    /// Primary and alternate names joined into one string for tokenizing.
    pub fn joined_names(&self) -> String {
        let mut joined = self.name.clone();
        for alternative in &self.alternative_names {
            joined.push(' ');
            joined.push_str(alternative);
        }
        joined
    }

    pub fn usable_image_id(&self) -> Option<&str> {
        self.image_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Field set requested from the catalog search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFields {
    Cover,
    Detail,
}

/// A single outbound catalog search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub term: String,
    pub fields: SearchFields,
    pub limit: u32,
    /// Drops edition/version records (remasters, bundles) from the result set.
    pub exclude_versions: bool,
}

/// Requested artwork resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImageSize {
    #[default]
    Normal,
    Retina,
}

impl ImageSize {
    pub fn size_token(self) -> &'static str {
        match self {
            Self::Normal => "cover_big",
            Self::Retina => "cover_big_2x",
        }
    }
}

/// Accepted cover together with the similarity that won it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverMatch {
    pub image_id: String,
    pub score: f64,
}

/// Accepted detail record after translation and genre mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailMatch {
    pub matched_name: String,
    pub query: String,
    pub description: Option<String>,
    pub genres: Vec<String>,
}

/// Fields written back to the store for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordUpdate {
    Cover {
        url: String,
    },
    Details {
        description: Option<String>,
        genres: Option<Vec<String>>,
    },
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Cover { url } => url.is_empty(),
            Self::Details {
                description,
                genres,
            } => description.is_none() && genres.is_none(),
        }
    }
}

/// Override table keyed by trimmed, lowercased title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideMap {
    entries: HashMap<String, String>,
}

impl OverrideMap {
    pub fn override_key(title: &str) -> String {
        title.trim().to_lowercase()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries = HashMap::new();
        for (title, url) in pairs {
            let key = Self::override_key(title.as_ref());
            let url = url.into();
            if key.is_empty() || url.trim().is_empty() {
                continue;
            }
            entries.insert(key, url.trim().to_string());
        }
        Self { entries }
    }

    pub fn lookup(&self, title: &str) -> Option<&str> {
        self.entries
            .get(&Self::override_key(title))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-title outcome classification reported in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStatus {
    Matched,
    NoMatch,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleOutcome {
    pub id: i64,
    pub title: String,
    pub status: TitleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Result of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub mode: EnrichmentMode,
    pub total: usize,
    pub updated: usize,
    pub sample: Vec<TitleOutcome>,
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::{Candidate, OverrideMap, RecordUpdate};

    #[test]
    fn test_override_lookup_ignores_case_and_surrounding_whitespace() {
        let overrides = OverrideMap::from_pairs([("  Halo 3 ", "https://img/halo.jpg")]);
        assert_eq!(overrides.lookup("HALO 3"), Some("https://img/halo.jpg"));
        assert_eq!(overrides.lookup("halo 3  "), Some("https://img/halo.jpg"));
        assert_eq!(overrides.lookup("Halo 3: ODST"), None);
    }

    #[test]
    fn test_override_map_skips_blank_entries() {
        let overrides = OverrideMap::from_pairs([("", "https://img/a.jpg"), ("Doom", "  ")]);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_candidate_usable_image_id_rejects_blank_ids() {
        let mut candidate = Candidate {
            image_id: Some("   ".to_string()),
            ..Candidate::default()
        };
        assert_eq!(candidate.usable_image_id(), None);
        candidate.image_id = Some("co1wyy".to_string());
        assert_eq!(candidate.usable_image_id(), Some("co1wyy"));
    }

    #[test]
    fn test_candidate_joined_names_include_alternatives() {
        let candidate = Candidate {
            name: "Grand Theft Auto V".to_string(),
            alternative_names: vec!["GTA 5".to_string(), "GTA V".to_string()],
            ..Candidate::default()
        };
        assert_eq!(candidate.joined_names(), "Grand Theft Auto V GTA 5 GTA V");
    }

    #[test]
    fn test_details_update_without_fields_is_empty() {
        let update = RecordUpdate::Details {
            description: None,
            genres: None,
        };
        assert!(update.is_empty());
    }
}
