use crate::foundation::util::url::{join_segments, parse_base_url};
use crate::foundation::{validate_did, IdentityError};
use crate::infrastructure::config::GatewayConfig;
use crate::infrastructure::gateway::types::{
    AuthLog, AuthLogFilter, AuthRecord, CrossDomainAuthRequest, CrossDomainAuthResponse, DeviceFilter, GatewayDevice,
    GatewayMessage, LoginRequest, LoginResponse, RegisterDeviceRequest, StatusUpdate, SyncAuthRecordRequest,
    TransactionVerification,
};
use crate::domain::DeviceStatus;
use crate::infrastructure::http::{build_http_client, error_text};
use log::{debug, info, warn};
use parking_lot::RwLock;
use reqwest::{header, Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Bearer-token client for the backend REST gateway.
///
/// A 401 response drops the held token; callers must log in or set a new one.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, IdentityError> {
        let client = Self::with_base_url(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        if let Some(token) = config.token.as_ref().filter(|token| !token.expose_secret().trim().is_empty()) {
            client.set_token(token.clone());
        }
        Ok(client)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, IdentityError> {
        let base_url = parse_base_url("gateway.base_url", base_url)?;
        let http = build_http_client("gateway", timeout)?;
        Ok(Self { http, base_url, token: RwLock::new(None) })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_token(&self, token: SecretString) {
        *self.token.write() = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    /// `POST /users/login`; stores the returned token.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<serde_json::Value, IdentityError> {
        let body = LoginRequest { username: username.to_string(), password: password.expose_secret().clone() };
        let response: LoginResponse = self.send(Method::POST, &["users", "login"], &[], Some(&body)).await?;
        self.set_token(SecretString::new(response.token.into_string()));
        info!("gateway login succeeded username={}", username);
        Ok(response.user)
    }

    pub async fn register_device(&self, request: &RegisterDeviceRequest) -> Result<GatewayDevice, IdentityError> {
        validate_did(&request.did)?;
        self.send(Method::POST, &["devices"], &[], Some(request)).await
    }

    pub async fn get_device(&self, did: &str) -> Result<GatewayDevice, IdentityError> {
        let did = validate_did(did)?;
        self.send(Method::GET, &["devices", did], &[], None::<&()>).await
    }

    pub async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<GatewayDevice>, IdentityError> {
        let mut query = Vec::new();
        if let Some(domain) = filter.domain.as_deref() {
            query.push(("domain", domain.to_string()));
        }
        if let Some(status) = filter.status {
            query.push(("status", status.as_str().to_string()));
        }
        self.send(Method::GET, &["devices"], &query, None::<&()>).await
    }

    pub async fn update_device_status(&self, did: &str, status: DeviceStatus) -> Result<GatewayDevice, IdentityError> {
        let did = validate_did(did)?;
        self.send(Method::PUT, &["devices", did, "status"], &[], Some(&StatusUpdate { status })).await
    }

    pub async fn revoke_device(&self, did: &str) -> Result<GatewayMessage, IdentityError> {
        let did = validate_did(did)?;
        self.send(Method::DELETE, &["devices", did], &[], None::<&()>).await
    }

    pub async fn request_cross_domain_auth(&self, request: &CrossDomainAuthRequest) -> Result<CrossDomainAuthResponse, IdentityError> {
        validate_did(&request.device_did)?;
        self.send(Method::POST, &["auth", "cross-domain"], &[], Some(request)).await
    }

    pub async fn auth_records(&self, did: &str) -> Result<Vec<AuthRecord>, IdentityError> {
        let did = validate_did(did)?;
        self.send(Method::GET, &["auth", "records", did], &[], None::<&()>).await
    }

    pub async fn auth_logs(&self, filter: &AuthLogFilter) -> Result<Vec<AuthLog>, IdentityError> {
        let mut query = Vec::new();
        if let Some(did) = filter.device_did.as_deref() {
            query.push(("device_did", did.to_string()));
        }
        if let Some(domain) = filter.domain.as_deref() {
            query.push(("domain", domain.to_string()));
        }
        self.send(Method::GET, &["auth", "logs"], &query, None::<&()>).await
    }

    pub async fn verify_transaction(&self, tx_hash: &str) -> Result<TransactionVerification, IdentityError> {
        let tx_hash = tx_hash.trim();
        if tx_hash.is_empty() {
            return Err(IdentityError::InvalidInput("tx_hash is empty".to_string()));
        }
        self.send(Method::GET, &["auth", "verify", tx_hash], &[], None::<&()>).await
    }

    pub async fn sync_auth_record(&self, request: &SyncAuthRecordRequest) -> Result<serde_json::Value, IdentityError> {
        validate_did(&request.device_did)?;
        self.send(Method::POST, &["auth", "sync"], &[], Some(request)).await
    }

    async fn send<B, T>(&self, method: Method, segments: &[&str], query: &[(&str, String)], body: Option<&B>) -> Result<T, IdentityError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut url = join_segments(&self.base_url, segments)?;
        for (key, value) in query.iter().filter(|(_, value)| !value.is_empty()) {
            url.query_pairs_mut().append_pair(key, value);
        }
        debug!("gateway request method={} url={}", method, url);

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.token.read().as_ref() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| transport_error(&url, err))?;
        let status = response.status();
        let text = response.text().await.map_err(|err| transport_error(&url, err))?;

        if status == StatusCode::UNAUTHORIZED {
            self.clear_token();
            warn!("gateway rejected session token; token cleared url={}", url);
            return Err(IdentityError::Unauthorized { url: url.to_string() });
        }
        if !status.is_success() {
            let message = error_text(&text).unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status").to_string());
            warn!("gateway request failed method={} status={} url={}", method, status.as_u16(), url);
            return Err(IdentityError::GatewayRequestFailed { status: status.as_u16(), url: url.to_string(), message });
        }
        serde_json::from_str(&text).map_err(|err| crate::serde_err!("json", format!("gateway response from {url}: {err}")))
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> IdentityError {
    if err.is_timeout() {
        return IdentityError::NetworkError(format!("gateway request timed out url={url}"));
    }
    IdentityError::NetworkError(format!("gateway request failed url={url}: {err}"))
}
