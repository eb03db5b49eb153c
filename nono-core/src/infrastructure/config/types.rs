use crate::foundation::{
    DEFAULT_GATEWAY_BASE_URL, DEFAULT_GAS_LIMIT, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LEDGER_RPC_URL, DEFAULT_ORACLE_BASE_URL,
    DEFAULT_RECEIPT_POLL_INTERVAL_MS,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_rpc_url")]
    pub rpc_url: String,
    #[serde(default)]
    pub contract_address: String,
    /// Hex-encoded secp256k1 key for local signing. Never logged.
    #[serde(default)]
    pub private_key: Option<SecretString>,
    #[serde(default)]
    pub use_external_wallet: bool,
    /// Wallet JSON-RPC endpoint used when `use_external_wallet = true`.
    #[serde(default)]
    pub wallet_rpc_url: Option<String>,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Unset means wait for confirmation indefinitely.
    #[serde(default)]
    pub confirmation_timeout_secs: Option<u64>,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
    #[serde(default)]
    pub allow_concurrent_submissions: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_ledger_rpc_url(),
            contract_address: String::new(),
            private_key: None,
            use_external_wallet: false,
            wallet_rpc_url: None,
            gas_limit: default_gas_limit(),
            confirmation_timeout_secs: None,
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            allow_concurrent_submissions: false,
        }
    }
}

impl LedgerConfig {
    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { base_url: default_oracle_base_url(), timeout_secs: default_http_timeout_secs() }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub token: Option<SecretString>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { base_url: default_gateway_base_url(), timeout_secs: default_http_timeout_secs(), token: None }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), log_dir: None }
    }
}

fn default_ledger_rpc_url() -> String {
    DEFAULT_LEDGER_RPC_URL.to_string()
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_receipt_poll_interval_ms() -> u64 {
    DEFAULT_RECEIPT_POLL_INTERVAL_MS
}

fn default_oracle_base_url() -> String {
    DEFAULT_ORACLE_BASE_URL.to_string()
}

fn default_gateway_base_url() -> String {
    DEFAULT_GATEWAY_BASE_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}
