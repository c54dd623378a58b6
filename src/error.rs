//! Crate-wide error type.

use thiserror::Error;

/// Failures raised by collaborators and configuration loading.
///
/// A batch run aborts only on [`EnrichError::Configuration`] or when the pending
/// backlog cannot be listed. Failures past that point are caught per title and
/// turned into a note in the run summary.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{service} request failed: {message}")]
    ExternalCall {
        service: &'static str,
        message: String,
    },
    #[error("translation unavailable: {0}")]
    TranslationUnavailable(String),
    #[error("catalog store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnrichError {
    pub fn external(service: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalCall {
            service,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EnrichError;

    #[test]
    fn test_store_errors_convert_from_rusqlite() {
        let error: EnrichError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(error, EnrichError::Store(_)));
        assert!(error.to_string().starts_with("catalog store error"));
    }

    #[test]
    fn test_external_call_display_names_service() {
        let error = EnrichError::external("catalog search", "HTTP 429");
        assert_eq!(error.to_string(), "catalog search request failed: HTTP 429");
    }
}
