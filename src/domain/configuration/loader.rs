//! Resolution configuration parsing (TOML, plus the legacy XML layout).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::AppError;
use crate::domain::configuration::{ConfigFile, ConfigOverrides, ResolutionConfig};

/// On-disk configuration syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    /// `<SVN_Path>`, `<SelectionPolicy>`, `<NamePattern>`, `<LocalCache>` elements.
    Xml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything but `.xml` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => ConfigFormat::Xml,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LegacyXmlConfig {
    #[serde(rename = "SVN_Path")]
    svn_path: Option<String>,
    #[serde(rename = "SelectionPolicy")]
    selection_policy: Option<String>,
    #[serde(rename = "NamePattern")]
    name_pattern: Option<String>,
    #[serde(rename = "LocalCache")]
    local_cache: Option<String>,
}

impl From<LegacyXmlConfig> for ConfigFile {
    fn from(xml: LegacyXmlConfig) -> Self {
        let trimmed = |value: Option<String>| {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        ConfigFile {
            repository_location: trimmed(xml.svn_path),
            selection_policy: trimmed(xml.selection_policy),
            name_pattern: trimmed(xml.name_pattern),
            cache_directory: trimmed(xml.local_cache).map(PathBuf::from),
            ..Default::default()
        }
    }
}

/// Parse raw configuration content without validating it.
pub fn parse_config_file(content: &str, format: ConfigFormat) -> Result<ConfigFile, AppError> {
    match format {
        ConfigFormat::Toml => Ok(toml::from_str(content)?),
        ConfigFormat::Xml => {
            let legacy: LegacyXmlConfig = quick_xml::de::from_str(content).map_err(|err| {
                AppError::config_error(format!("XML parse error: {}", err))
            })?;
            Ok(legacy.into())
        }
    }
}

/// Parse and validate configuration content.
pub fn parse_config_content(
    content: &str,
    format: ConfigFormat,
    overrides: &ConfigOverrides,
) -> Result<ResolutionConfig, AppError> {
    parse_config_file(content, format)?.resolve(overrides)
}
