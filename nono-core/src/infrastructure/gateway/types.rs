use crate::domain::DeviceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDeviceRequest {
    pub did: String,
    pub device_id: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manufacturer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub firmware: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata: String,
}

/// Device row as stored by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayDevice {
    #[serde(default)]
    pub id: u64,
    pub did: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub firmware: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub owner: String,
    pub registered_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl GatewayDevice {
    pub fn device_status(&self) -> Option<DeviceStatus> {
        self.status.parse().ok()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub domain: Option<String>,
    pub status: Option<DeviceStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: DeviceStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossDomainAuthRequest {
    pub device_did: String,
    pub source_domain: String,
    pub target_domain: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossDomainAuthResponse {
    pub authorized: bool,
    #[serde(default)]
    pub record_id: u64,
    /// Absent when the gateway decided from its own records without reaching the ledger.
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRecord {
    #[serde(default)]
    pub id: u64,
    pub device_did: String,
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub target_domain: String,
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub tx_hash: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthLog {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub device_did: String,
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub target_domain: String,
    /// `request`, `success` or `failed`.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthLogFilter {
    pub device_did: Option<String>,
    /// Matches either side of the authorization.
    pub domain: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionVerification {
    pub tx_hash: String,
    pub status: bool,
    #[serde(default)]
    pub block_number: u64,
    #[serde(default)]
    pub gas_used: u64,
    /// Raw logs as relayed by the gateway (address, topics, data).
    #[serde(default)]
    pub events: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub confirmations: u64,
}

/// Authorization performed directly on the ledger, reported back so the gateway can record it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAuthRecordRequest {
    pub device_did: String,
    pub source_domain: String,
    pub target_domain: String,
    pub authorized: bool,
    pub tx_hash: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub token: TokenValue,
    #[serde(default)]
    pub user: serde_json::Value,
}

/// The gateway issues tokens as either strings or numeric ids.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Text(String),
    Number(u64),
}

impl TokenValue {
    pub fn into_string(self) -> String {
        match self {
            TokenValue::Text(text) => text,
            TokenValue::Number(number) => number.to_string(),
        }
    }
}
