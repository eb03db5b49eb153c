use crate::cli::Cli;
use log::warn;
use nono_core::foundation::IdentityError;
use nono_core::infrastructure::config::{load_config, resolve_config_path, AppConfig};
use nono_core::infrastructure::logging::init_logger;
use std::path::Path;

/// Load config without validating; validation runs once logging is up so errors get logged.
pub fn load_app_config(explicit_path: Option<&Path>) -> Result<AppConfig, IdentityError> {
    let config_path = resolve_config_path(explicit_path);
    load_config(&config_path)
}

pub fn init_logging(args: &Cli, app_config: &AppConfig) -> Result<(), IdentityError> {
    let filters = args.log_level.clone().unwrap_or_else(|| app_config.logging.level.clone());
    let log_dir = args.log_dir.as_deref().or(app_config.logging.log_dir.as_deref());
    init_logger(log_dir, &filters)
}

pub fn validate_startup_config(app_config: &AppConfig) -> Result<(), IdentityError> {
    if let Err(errors) = app_config.validate() {
        for err in &errors {
            warn!("config validation error: {}", err);
        }
        return Err(IdentityError::ConfigError(format!("validation failed: {}", errors.join("; "))));
    }
    Ok(())
}
