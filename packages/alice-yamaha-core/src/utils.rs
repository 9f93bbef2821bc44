//! General utilities shared across the application.

use reqwest::Url;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Control URL Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Error type for device id validation.
///
/// Device ids are receiver control URLs, so they are validated before any
/// request is sent to them.
#[derive(Debug, Error)]
pub enum ControlUrlError {
    #[error("device id '{0}' is not a valid URL")]
    Malformed(String),
    #[error("device id '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("device id '{0}' has no host")]
    MissingHost(String),
}

/// Validates that a device id is an absolute `http(s)` URL with a host.
pub fn validate_control_url(id: &str) -> Result<Url, ControlUrlError> {
    let url = Url::parse(id).map_err(|_| ControlUrlError::Malformed(id.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ControlUrlError::UnsupportedScheme(id.to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ControlUrlError::MissingHost(id.to_string()));
    }

    Ok(url)
}
