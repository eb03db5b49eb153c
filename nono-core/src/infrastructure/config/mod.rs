mod loader;
mod types;
pub mod validation;

pub use loader::{load_config, load_config_file_only, resolve_config_path, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
pub use types::*;

use crate::foundation::IdentityError;
use std::path::Path;

/// Resolve, load and validate the application config.
pub fn load_app_config(explicit_path: Option<&Path>) -> Result<AppConfig, IdentityError> {
    let config_path = resolve_config_path(explicit_path);
    let config = load_config(&config_path)?;
    config.validate().map_err(|errors| IdentityError::ConfigError(format!("validation failed: {}", errors.join("; "))))?;
    Ok(config)
}
