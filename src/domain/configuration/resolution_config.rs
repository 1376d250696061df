//! Resolution configuration domain models.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, NamePattern, SelectionPolicy};

/// Cache directory used when the configuration does not name one.
pub const DEFAULT_CACHE_DIRECTORY: &str = "./_cache_configs";

/// Raw configuration as written on disk, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Remote folder holding the configuration artifacts (required).
    pub repository_location: Option<String>,
    /// Selection policy name; defaults to `semver_then_time`.
    pub selection_policy: Option<String>,
    /// `*` or `*.<ext>`; defaults to `*.cfx`.
    pub name_pattern: Option<String>,
    /// Local export directory.
    pub cache_directory: Option<PathBuf>,
    /// Subversion client settings.
    #[serde(default)]
    pub svn: SvnConfig,
    /// External execution tool; handoff is skipped when absent.
    #[serde(default)]
    pub handoff: Option<HandoffConfig>,
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub selection_policy: Option<String>,
    pub name_pattern: Option<String>,
    pub cache_directory: Option<PathBuf>,
}

/// Validated configuration for one resolution run. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    pub repository_location: Url,
    pub selection_policy: SelectionPolicy,
    pub name_pattern: NamePattern,
    pub cache_directory: PathBuf,
    pub svn: SvnConfig,
    pub handoff: Option<HandoffConfig>,
}

impl ConfigFile {
    /// Validate the raw file and fold in command-line overrides.
    pub fn resolve(self, overrides: &ConfigOverrides) -> Result<ResolutionConfig, AppError> {
        let location = self
            .repository_location
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::config_error("repository_location is missing"))?;
        let repository_location = Url::parse(location).map_err(|err| {
            AppError::config_error(format!("Invalid repository_location '{}': {}", location, err))
        })?;
        if repository_location.cannot_be_a_base() {
            return Err(AppError::config_error(format!(
                "Invalid repository_location '{}': not a hierarchical URL",
                location
            )));
        }

        let selection_policy =
            match overrides.selection_policy.as_deref().or(self.selection_policy.as_deref()) {
                Some(value) => value.parse()?,
                None => SelectionPolicy::default(),
            };
        let name_pattern = match overrides.name_pattern.as_deref().or(self.name_pattern.as_deref())
        {
            Some(value) => value.parse()?,
            None => NamePattern::default(),
        };
        let cache_directory = overrides
            .cache_directory
            .clone()
            .or(self.cache_directory)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIRECTORY));

        self.svn.validate()?;
        if let Some(handoff) = &self.handoff {
            handoff.validate()?;
        }

        Ok(ResolutionConfig {
            repository_location,
            selection_policy,
            name_pattern,
            cache_directory,
            svn: self.svn,
            handoff: self.handoff,
        })
    }
}

/// Subversion client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SvnConfig {
    /// Executable invoked for `list` and `export`.
    #[serde(default = "default_svn_program")]
    pub program: String,
    /// Upper bound for a single svn invocation, in seconds.
    #[serde(default = "default_svn_timeout")]
    pub timeout_secs: u64,
    /// Extra listing attempts after a transient command failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for SvnConfig {
    fn default() -> Self {
        Self {
            program: default_svn_program(),
            timeout_secs: default_svn_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl SvnConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.program.trim().is_empty() {
            return Err(AppError::config_error("svn.program must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("svn.timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

fn default_svn_program() -> String {
    "svn".to_string()
}

fn default_svn_timeout() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    500
}

/// External execution tool driven through the open/compile/start lifecycle.
///
/// Stage arguments may contain `{config}` (local artifact path) and `{name}`
/// (artifact file name). A stage with no arguments is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandoffConfig {
    pub program: String,
    #[serde(default = "default_open_args")]
    pub open: Vec<String>,
    #[serde(default)]
    pub compile: Vec<String>,
    #[serde(default)]
    pub start: Vec<String>,
    #[serde(default = "default_handoff_timeout")]
    pub timeout_secs: u64,
}

impl HandoffConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.program.trim().is_empty() {
            return Err(AppError::config_error("handoff.program must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("handoff.timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

fn default_open_args() -> Vec<String> {
    vec!["{config}".to_string()]
}

fn default_handoff_timeout() -> u64 {
    600
}
