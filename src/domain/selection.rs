//! Selection policy engine: filter, rank and pick exactly one artifact.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::{AppError, ArtifactEntry, NamePattern, SelectionPolicy, Version};

/// A candidate together with the keys it was ranked by.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub entry: ArtifactEntry,
    pub version: Version,
    pub commit_time: Option<DateTime<Utc>>,
}

impl RankedCandidate {
    fn new(entry: ArtifactEntry) -> Self {
        let version = entry.version();
        let commit_time = entry.commit_time();
        Self { entry, version, commit_time }
    }

    fn compare(&self, other: &Self, policy: SelectionPolicy) -> Ordering {
        let primary = match policy {
            SelectionPolicy::ByTimestampDescending => Ordering::Equal,
            SelectionPolicy::BySemverThenTimestamp => other.version.cmp(&self.version),
        };
        // `None` orders before any time, so a missing timestamp never wins.
        primary
            .then_with(|| Reverse(self.commit_time).cmp(&Reverse(other.commit_time)))
            .then_with(|| self.entry.name.cmp(&other.entry.name))
            .then_with(|| self.entry.url.cmp(&other.entry.url))
            .then_with(|| self.entry.timestamp.cmp(&other.entry.timestamp))
    }
}

/// Filter `entries` by `pattern` and return the candidates best-first.
///
/// Exact duplicate entries collapse into one. The order depends only on the
/// content of the candidate set, never on the order entries were listed in.
pub fn rank_candidates(
    entries: &[ArtifactEntry],
    policy: SelectionPolicy,
    pattern: &NamePattern,
) -> Vec<RankedCandidate> {
    let unique: BTreeSet<(&str, &str, &str)> = entries
        .iter()
        .filter(|entry| pattern.matches(&entry.name))
        .map(|entry| (entry.name.as_str(), entry.url.as_str(), entry.timestamp.as_str()))
        .collect();

    let mut ranked: Vec<RankedCandidate> = unique
        .into_iter()
        .map(|(name, url, timestamp)| RankedCandidate::new(ArtifactEntry::new(name, url, timestamp)))
        .collect();
    ranked.sort_by(|a, b| a.compare(b, policy));
    ranked
}

/// Pick exactly one artifact, or fail with `NotFound` when nothing survives filtering.
pub fn select_artifact(
    entries: &[ArtifactEntry],
    policy: SelectionPolicy,
    pattern: &NamePattern,
) -> Result<ArtifactEntry, AppError> {
    rank_candidates(entries, policy, pattern)
        .into_iter()
        .next()
        .map(|candidate| candidate.entry)
        .ok_or_else(|| AppError::NotFound { pattern: pattern.to_string() })
}
