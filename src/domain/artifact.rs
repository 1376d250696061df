//! Artifact records flowing through a resolution run.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::domain::version::{Version, parse_version_from_name};

/// File extensions the repository lister keeps.
pub const ARTIFACT_EXTENSIONS: [&str; 2] = [".cfg", ".cfx"];

/// A configuration artifact listed in the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactEntry {
    /// File name, unique within one listing.
    pub name: String,
    /// Full remote URL of the file.
    pub url: String,
    /// Raw commit date as reported by the repository; empty when absent.
    pub timestamp: String,
}

impl ArtifactEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into(), timestamp: timestamp.into() }
    }

    /// Commit time, or `None` when the timestamp is missing or unparseable.
    pub fn commit_time(&self) -> Option<DateTime<Utc>> {
        parse_commit_time(&self.timestamp)
    }

    /// Version embedded in the file name, or the sentinel.
    pub fn version(&self) -> Version {
        parse_version_from_name(&self.name)
    }

    pub fn has_artifact_extension(name: &str) -> bool {
        ARTIFACT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}

/// Parse an ISO-8601-like commit date.
///
/// Offsets are honoured; values without an offset are read as UTC.
pub fn parse_commit_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// The selected artifact once it has been materialized locally.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedArtifact {
    pub source: ArtifactEntry,
    pub local_path: PathBuf,
    /// Hex-encoded SHA-256 of the exported content.
    pub sha256: String,
}
