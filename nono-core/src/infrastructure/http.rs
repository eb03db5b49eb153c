//! Pieces shared by the oracle and gateway HTTP clients.

use crate::foundation::IdentityError;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// `error` (or `message`) text from a JSON error body.
pub(crate) fn error_text(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.or(parsed.message).filter(|text| !text.trim().is_empty())
}

pub(crate) fn build_http_client(component: &str, timeout: Duration) -> Result<reqwest::Client, IdentityError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| IdentityError::ConfigError(format!("{component} http client build failed: {err}")))
}
