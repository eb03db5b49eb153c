//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Serde field defaults
//! 2. TOML config file
//! 3. Environment variables (NONO_* prefix)

use crate::foundation::util::url::redact_url;
use crate::foundation::IdentityError;
use crate::infrastructure::config::types::AppConfig;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "nono.toml";

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "NONO_CONFIG_PATH";

/// Environment variable prefix for config overrides.
///
/// Example: `NONO_LEDGER__RPC_URL` -> `ledger.rpc_url`
const ENV_PREFIX: &str = "NONO_";

/// Explicit path, then `NONO_CONFIG_PATH`, then `./nono.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => PathBuf::from(CONFIG_FILE_NAME),
    }
}

/// Load configuration from `path` (optional on disk) layered with the environment.
pub fn load_config(path: &Path) -> Result<AppConfig, IdentityError> {
    info!("loading configuration path={}", path.display());
    let config = extract(figment_base(path).merge(Env::prefixed(ENV_PREFIX).split("__")))?;
    debug!(
        "configuration loaded ledger.rpc_url={} oracle.base_url={} gateway.base_url={} external_wallet={}",
        redact_url(&config.ledger.rpc_url),
        redact_url(&config.oracle.base_url),
        redact_url(&config.gateway.base_url),
        config.ledger.use_external_wallet
    );
    Ok(config)
}

/// Load configuration from the TOML file only, ignoring the environment.
pub fn load_config_file_only(path: &Path) -> Result<AppConfig, IdentityError> {
    extract(figment_base(path))
}

fn figment_base(path: &Path) -> Figment {
    let figment = Figment::new();
    if path.exists() {
        figment.merge(Toml::file(path))
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
        figment
    }
}

fn extract(figment: Figment) -> Result<AppConfig, IdentityError> {
    figment.extract().map_err(|e| IdentityError::ConfigError(format!("config extraction failed: {e}")))
}
