//! cfx-resolve: pick the right configuration artifact from a Subversion
//! repository, export it locally and hand it to the test-execution tool.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use adapters::process::CancelToken;
pub use app::api::{
    CandidateListing, CandidateSummary, ResolveOptions, list_candidates, load_config, resolve,
    resolve_with,
};
pub use domain::{
    AppError, ArtifactEntry, NamePattern, ResolutionConfig, ResolvedArtifact, SelectionPolicy,
    Version, parse_version_from_name, rank_candidates, select_artifact,
};
