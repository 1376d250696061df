use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::AppError;

/// Ranking rule used to pick one artifact from the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Newest commit wins; the version embedded in the name is ignored.
    ByTimestampDescending,
    /// Highest name-derived version wins, newest commit breaks version ties.
    #[default]
    BySemverThenTimestamp,
}

impl SelectionPolicy {
    pub const ALL: [SelectionPolicy; 2] =
        [SelectionPolicy::ByTimestampDescending, SelectionPolicy::BySemverThenTimestamp];

    /// Canonical configuration value.
    pub fn config_name(self) -> &'static str {
        match self {
            SelectionPolicy::ByTimestampDescending => "newest_by_time",
            SelectionPolicy::BySemverThenTimestamp => "semver_then_time",
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest_by_time" | "latest" | "by_timestamp_descending" | "bytimestampdescending" => {
                Ok(SelectionPolicy::ByTimestampDescending)
            }
            "semver_then_time" | "by_semver_then_timestamp" | "bysemverthentimestamp" => {
                Ok(SelectionPolicy::BySemverThenTimestamp)
            }
            _ => Err(AppError::config_error(format!(
                "Unknown selection policy '{}': expected one of {}",
                value,
                SelectionPolicy::ALL.map(|p| p.config_name()).join(", ")
            ))),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Name filter applied before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePattern {
    /// Every listed artifact is a candidate.
    Any,
    /// Only names ending with the extension (leading dot included).
    Extension(String),
}

impl NamePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Any => true,
            NamePattern::Extension(ext) => name.ends_with(ext.as_str()),
        }
    }
}

impl Default for NamePattern {
    fn default() -> Self {
        NamePattern::Extension(".cfx".to_string())
    }
}

impl FromStr for NamePattern {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value == "*" {
            return Ok(NamePattern::Any);
        }
        match value.strip_prefix("*.") {
            Some(ext) if !ext.is_empty() && !ext.contains(['*', '?', '/', '\\']) => {
                Ok(NamePattern::Extension(format!(".{}", ext)))
            }
            _ => Err(AppError::config_error(format!(
                "Unsupported name pattern '{}': expected '*' or '*.<ext>'",
                value
            ))),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::Any => f.write_str("*"),
            NamePattern::Extension(ext) => write!(f, "*{}", ext),
        }
    }
}
