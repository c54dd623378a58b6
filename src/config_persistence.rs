use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::{Config, MatchingConfig};
use crate::error::EnrichError;
use crate::matching::stopwords::StopwordFilter;
use crate::protocol::OverrideMap;

const APP_DIR_NAME: &str = "catalog-enricher";

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

pub fn default_database_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join("catalog.db"))
}

/// Reads `path`, or returns defaults when the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Config, EnrichError> {
    let config_content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(
                "No config file at {}. Using built-in defaults.",
                path.display()
            );
            return Ok(Config::default());
        }
        Err(err) => return Err(err.into()),
    };
    toml::from_str(&config_content).map_err(|err| {
        EnrichError::Configuration(format!("failed to parse {}: {}", path.display(), err))
    })
}

/// Resolves the database path from config, falling back to the data directory.
pub fn resolve_database_path(config: &Config) -> Result<PathBuf, EnrichError> {
    if let Some(path) = config.store.database_path.clone() {
        return Ok(path);
    }
    default_database_path().ok_or_else(|| {
        EnrichError::Configuration(
            "could not determine a data directory; set [store] database_path".to_string(),
        )
    })
}

/// Loads a JSON object of `title → cover URL` overrides.
pub fn load_overrides_file(path: &Path) -> Result<OverrideMap, EnrichError> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        EnrichError::Configuration(format!(
            "failed to read overrides {}: {}",
            path.display(),
            err
        ))
    })?;
    let entries: HashMap<String, String> = serde_json::from_str(&content).map_err(|err| {
        EnrichError::Configuration(format!(
            "overrides {} must be a JSON object of title to URL: {}",
            path.display(),
            err
        ))
    })?;
    Ok(OverrideMap::from_pairs(entries))
}

pub fn stopword_filter_from_config(matching: &MatchingConfig) -> StopwordFilter {
    let base = match &matching.stopwords {
        Some(words) => StopwordFilter::from_words(words),
        None => StopwordFilter::default(),
    };
    base.extended(&matching.extra_stopwords)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{
        load_config_file, load_overrides_file, resolve_database_path, stopword_filter_from_config,
    };
    use crate::config::{Config, MatchingConfig};
    use crate::error::EnrichError;
    use crate::matching::TokenPipeline;

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_file(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[igdb]\nclient_id = \"abc\"\n\n[store]\ndatabase_path = \"/tmp/games.db\""
        )
        .expect("write config");
        let config = load_config_file(file.path()).expect("config");
        assert_eq!(config.igdb.client_id, "abc");
        assert_eq!(
            resolve_database_path(&config).expect("path"),
            std::path::PathBuf::from("/tmp/games.db")
        );
    }

    #[test]
    fn test_invalid_config_file_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[matching\nmin_score = ").expect("write config");
        assert!(matches!(
            load_config_file(file.path()),
            Err(EnrichError::Configuration(_))
        ));
    }

    #[test]
    fn test_overrides_file_is_keyed_by_normalized_title() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, r#"{{" Halo 3 ": "https://img.example/halo3.jpg"}}"#)
            .expect("write overrides");
        let overrides = load_overrides_file(file.path()).expect("overrides");
        assert_eq!(overrides.lookup("halo 3"), Some("https://img.example/halo3.jpg"));
    }

    #[test]
    fn test_overrides_file_must_be_an_object() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, r#"["Halo 3"]"#).expect("write overrides");
        assert!(matches!(
            load_overrides_file(file.path()),
            Err(EnrichError::Configuration(_))
        ));
    }

    #[test]
    fn test_stopword_filter_honours_replacement_and_extension() {
        let matching = MatchingConfig {
            stopwords: Some(vec!["bundle".to_string()]),
            extra_stopwords: vec!["pack".to_string()],
            ..MatchingConfig::default()
        };
        let filter = stopword_filter_from_config(&matching);
        assert!(filter.is_stopword("bundle"));
        assert!(filter.is_stopword("pack"));
        assert!(!filter.is_stopword("edition"));
    }

    #[test]
    fn test_accented_extra_stopwords_filter_folded_tokens() {
        let matching = MatchingConfig {
            extra_stopwords: vec!["Versión".to_string(), "Estándar".to_string()],
            ..MatchingConfig::default()
        };
        let pipeline = TokenPipeline::new(stopword_filter_from_config(&matching));
        assert_eq!(
            pipeline.filtered_tokens("FIFA 23 Versión Estándar"),
            vec!["fifa", "23"]
        );
    }
}
