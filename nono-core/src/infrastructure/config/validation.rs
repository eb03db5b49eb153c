use crate::foundation::util::url::parse_base_url;
use crate::infrastructure::config::types::AppConfig;
use alloy::primitives::Address;
use log::LevelFilter;
use secrecy::ExposeSecret;
use std::str::FromStr;

impl AppConfig {
    /// Check field formats. Missing ledger credentials are reported by `connect`,
    /// so oracle-only use does not need a ledger section.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(err) = parse_base_url("ledger.rpc_url", &self.ledger.rpc_url) {
            errors.push(err.to_string());
        }
        let contract = self.ledger.contract_address.trim();
        if !contract.is_empty() && Address::from_str(contract).is_err() {
            errors.push(format!("invalid ledger.contract_address: {contract}"));
        }
        if self.ledger.gas_limit == 0 {
            errors.push("ledger.gas_limit must be > 0".to_string());
        }
        if self.ledger.receipt_poll_interval_ms == 0 {
            errors.push("ledger.receipt_poll_interval_ms must be > 0".to_string());
        }
        if self.ledger.confirmation_timeout_secs == Some(0) {
            errors.push("ledger.confirmation_timeout_secs must be > 0 when set".to_string());
        }
        let has_key = self.ledger.private_key.as_ref().map(|key| !key.expose_secret().trim().is_empty()).unwrap_or(false);
        if self.ledger.use_external_wallet {
            if has_key {
                errors.push("ledger.private_key must not be set when ledger.use_external_wallet=true".to_string());
            }
            if let Some(url) = self.ledger.wallet_rpc_url.as_deref().filter(|url| !url.trim().is_empty()) {
                if let Err(err) = parse_base_url("ledger.wallet_rpc_url", url) {
                    errors.push(err.to_string());
                }
            }
        }

        if let Err(err) = parse_base_url("oracle.base_url", &self.oracle.base_url) {
            errors.push(err.to_string());
        }
        if self.oracle.timeout_secs == 0 {
            errors.push("oracle.timeout_secs must be > 0".to_string());
        }
        if let Err(err) = parse_base_url("gateway.base_url", &self.gateway.base_url) {
            errors.push(err.to_string());
        }
        if self.gateway.timeout_secs == 0 {
            errors.push("gateway.timeout_secs must be > 0".to_string());
        }

        if LevelFilter::from_str(self.logging.level.trim()).is_err() {
            errors.push(format!("invalid logging.level: {}", self.logging.level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
