//! Synopsis translation through the public Google Translate endpoint.

use std::time::Duration;

use serde_json::Value;

use crate::backends::{external_call_error, truncate_chars, TranslationClient};
use crate::config::DetailConfig;
use crate::error::EnrichError;

const TRANSLATION_SERVICE: &str = "translation";

pub struct GoogleTranslateClient {
    http_client: ureq::Agent,
    endpoint: String,
    source_language: String,
    target_language: String,
    max_chars: usize,
}

impl GoogleTranslateClient {
    pub fn new(config: &DetailConfig) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        Self {
            http_client,
            endpoint: config.translation_url.trim().to_string(),
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            max_chars: config.max_translation_chars,
        }
    }

    fn request_url(&self, text: &str) -> String {
        format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.endpoint,
            urlencoding::encode(&self.source_language),
            urlencoding::encode(&self.target_language),
            urlencoding::encode(text)
        )
    }
}

impl TranslationClient for GoogleTranslateClient {
    fn translate(&self, text: &str) -> Result<String, EnrichError> {
        let capped = truncate_chars(text.trim(), self.max_chars);
        if capped.is_empty() {
            return Ok(capped);
        }
        let payload: Value = self
            .http_client
            .get(&self.request_url(&capped))
            .call()
            .map_err(|error| {
                EnrichError::TranslationUnavailable(
                    external_call_error(TRANSLATION_SERVICE, error).to_string(),
                )
            })?
            .into_json()
            .map_err(|error| EnrichError::TranslationUnavailable(error.to_string()))?;
        let translated = join_translated_segments(&payload).ok_or_else(|| {
            EnrichError::TranslationUnavailable("response carried no translated text".to_string())
        })?;
        Ok(truncate_chars(&translated, self.max_chars))
    }
}

/// The endpoint answers `[[["translated", "source", ...], ...], ...]`.
pub(crate) fn join_translated_segments(payload: &Value) -> Option<String> {
    let joined: String = payload
        .get(0)?
        .as_array()?
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{join_translated_segments, GoogleTranslateClient};
    use crate::config::DetailConfig;

    #[test]
    fn test_join_translated_segments_concatenates_sentences() {
        let payload = json!([
            [["Una historia. ", "A story. ", null], ["Con dragones.", "With dragons.", null]],
            null,
            "en"
        ]);
        assert_eq!(
            join_translated_segments(&payload).as_deref(),
            Some("Una historia. Con dragones.")
        );
    }

    #[test]
    fn test_join_translated_segments_rejects_empty_payloads() {
        assert_eq!(join_translated_segments(&json!([])), None);
        assert_eq!(join_translated_segments(&json!([[["  ", "x"]]])), None);
        assert_eq!(join_translated_segments(&json!({"error": 1})), None);
    }

    #[test]
    fn test_request_url_encodes_text_and_languages() {
        let client = GoogleTranslateClient::new(&DetailConfig::default());
        let url = client.request_url("Rock & Roll?");
        assert!(url.ends_with("?client=gtx&sl=en&tl=es&dt=t&q=Rock%20%26%20Roll%3F"));
    }
}
