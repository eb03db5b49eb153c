use crate::foundation::util::url::{effective_port, join_segments, parse_base_url};
use crate::foundation::{validate_did, IdentityError, DEFAULT_ORACLE_PORT};
use crate::infrastructure::config::OracleConfig;
use crate::infrastructure::http::{build_http_client, error_text};
use crate::infrastructure::oracle::types::{
    ConsensusStatus, DataSourceHealth, OracleConfigView, OracleDeviceStatus, OracleHealth, OracleStatus,
};
use log::{debug, warn};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;

/// Read-only client for the oracle service.
///
/// Requests are made once; failures come back enriched with the resolved URL
/// (for HTTP errors) or the expected port (for connection failures).
#[derive(Clone, Debug)]
pub struct OracleClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl OracleClient {
    pub fn new(config: &OracleConfig) -> Result<Self, IdentityError> {
        Self::with_base_url(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, IdentityError> {
        let base_url = parse_base_url("oracle.base_url", base_url)?;
        let http = build_http_client("oracle", timeout)?;
        Ok(Self { http, base_url, timeout })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn health(&self) -> Result<OracleHealth, IdentityError> {
        self.get_json(&["health"]).await
    }

    pub async fn status(&self) -> Result<OracleStatus, IdentityError> {
        self.get_json(&["status"]).await
    }

    pub async fn data_sources(&self) -> Result<Vec<DataSourceHealth>, IdentityError> {
        self.get_json(&["datasources"]).await
    }

    pub async fn device_status(&self, did: &str) -> Result<OracleDeviceStatus, IdentityError> {
        let did = validate_did(did)?;
        self.get_json(&["device", did, "status"]).await
    }

    /// Consensus status of every device the oracle knows, keyed by DID.
    pub async fn all_device_statuses(&self) -> Result<BTreeMap<String, OracleDeviceStatus>, IdentityError> {
        self.get_json(&["devices", "status"]).await
    }

    pub async fn consensus_status(&self, did: &str) -> Result<ConsensusStatus, IdentityError> {
        let did = validate_did(did)?;
        self.get_json(&["consensus", did]).await
    }

    pub async fn config(&self) -> Result<OracleConfigView, IdentityError> {
        self.get_json(&["config"]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, IdentityError> {
        let url = join_segments(&self.base_url, segments)?;
        debug!("oracle request url={}", url);
        let response = self.http.get(url.clone()).send().await.map_err(|err| self.transport_error(&url, err))?;
        let status = response.status();
        let body = response.text().await.map_err(|err| self.transport_error(&url, err))?;
        if !status.is_success() {
            let err = request_failed(&url, status, &body);
            warn!("oracle request failed status={} url={}", status.as_u16(), url);
            return Err(err);
        }
        serde_json::from_str(&body).map_err(|err| crate::serde_err!("json", format!("oracle response from {url}: {err}")))
    }

    fn transport_error(&self, url: &Url, err: reqwest::Error) -> IdentityError {
        if err.is_connect() {
            let port = effective_port(url, DEFAULT_ORACLE_PORT);
            warn!("oracle unreachable url={} port={}", url, port);
            return IdentityError::OracleUnreachable { url: url.to_string(), port, details: err.to_string() };
        }
        if err.is_timeout() {
            return IdentityError::NetworkError(format!("oracle request timed out after {}s url={url}", self.timeout.as_secs()));
        }
        IdentityError::NetworkError(format!("oracle request failed url={url}: {err}"))
    }
}

fn request_failed(url: &Url, status: StatusCode, body: &str) -> IdentityError {
    let detail = error_text(body);
    let message = if status == StatusCode::NOT_FOUND {
        let mut message = format!("oracle endpoint not found (404): {url}; make sure the oracle service is running and serves this path");
        if let Some(detail) = detail {
            message.push_str(&format!(" ({detail})"));
        }
        message
    } else {
        let detail = detail.unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status").to_string());
        format!("oracle request failed ({}): {detail} url={url}", status.as_u16())
    };
    IdentityError::OracleRequestFailed { status: status.as_u16(), url: url.to_string(), message }
}
