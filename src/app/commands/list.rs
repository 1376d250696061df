//! Candidate listing: the ranked candidate set, without export or handoff.

use serde::Serialize;

use crate::domain::{AppError, RankedCandidate, ResolutionConfig, rank_candidates};
use crate::ports::RepositoryPort;

/// One row of the ranked candidate listing.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub rank: usize,
    pub name: String,
    /// Parsed version, `None` when the name carries none.
    pub version: Option<String>,
    pub timestamp: String,
    pub url: String,
}

impl CandidateSummary {
    fn from_ranked(rank: usize, candidate: RankedCandidate) -> Self {
        let version =
            (!candidate.version.is_sentinel()).then(|| candidate.version.to_string());
        Self {
            rank,
            name: candidate.entry.name,
            version,
            timestamp: candidate.entry.timestamp,
            url: candidate.entry.url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateListing {
    pub repository_location: String,
    pub selection_policy: String,
    pub name_pattern: String,
    pub candidates: Vec<CandidateSummary>,
}

pub fn execute(
    repository: &impl RepositoryPort,
    config: &ResolutionConfig,
) -> Result<CandidateListing, AppError> {
    let entries = repository.list(&config.repository_location)?;
    let candidates = rank_candidates(&entries, config.selection_policy, &config.name_pattern)
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| CandidateSummary::from_ranked(idx + 1, candidate))
        .collect();

    Ok(CandidateListing {
        repository_location: config.repository_location.to_string(),
        selection_policy: config.selection_policy.to_string(),
        name_pattern: config.name_pattern.to_string(),
        candidates,
    })
}
