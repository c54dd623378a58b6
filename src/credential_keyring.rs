//! Keyring helpers for the catalog client secret.

use keyring::Entry;

use crate::error::EnrichError;

const IGDB_SERVICE_NAME: &str = "catalog-enricher.igdb";

fn igdb_entry(client_id: &str) -> Result<Entry, EnrichError> {
    Entry::new(IGDB_SERVICE_NAME, client_id).map_err(|err| {
        EnrichError::Configuration(format!("failed to create keyring entry: {err}"))
    })
}

/// Saves the client secret for `client_id` into the OS keyring.
pub fn set_igdb_client_secret(client_id: &str, secret: &str) -> Result<(), EnrichError> {
    let entry = igdb_entry(client_id)?;
    entry.set_password(secret).map_err(|err| {
        EnrichError::Configuration(format!("failed to set keyring password: {err}"))
    })
}

/// Loads the client secret for `client_id` from the OS keyring.
pub fn get_igdb_client_secret(client_id: &str) -> Result<Option<String>, EnrichError> {
    let entry = igdb_entry(client_id)?;
    match entry.get_password() {
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(EnrichError::Configuration(format!(
            "failed to get keyring password: {err}"
        ))),
    }
}

/// Environment value wins over config; blank values count as unset.
pub fn resolve_client_id(env_value: Option<String>, configured: &str) -> Option<String> {
    env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            let configured = configured.trim();
            (!configured.is_empty()).then(|| configured.to_string())
        })
}

/// Environment value wins; otherwise the keyring is consulted.
pub fn resolve_client_secret(
    env_value: Option<String>,
    client_id: &str,
) -> Result<Option<String>, EnrichError> {
    if let Some(secret) = env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        return Ok(Some(secret));
    }
    get_igdb_client_secret(client_id)
}
