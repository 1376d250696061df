//! Resolution configuration loading from the filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::domain::configuration::parse_config_content;
use crate::domain::{AppError, ConfigFormat, ConfigOverrides, ResolutionConfig};

/// Load, parse and validate the resolution configuration at `path`.
///
/// Runs before any process activity; every problem surfaces as a config error.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<ResolutionConfig, AppError> {
    let content = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => {
            AppError::config_error(format!("Configuration file not found: {}", path.display()))
        }
        _ => AppError::config_error(format!("Cannot read {}: {}", path.display(), err)),
    })?;

    let format = ConfigFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading resolution configuration");
    parse_config_content(&content, format, overrides)
}
