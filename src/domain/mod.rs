pub mod artifact;
pub mod configuration;
pub mod error;
pub mod policy;
pub mod selection;
pub mod version;

pub use artifact::{ARTIFACT_EXTENSIONS, ArtifactEntry, ResolvedArtifact, parse_commit_time};
pub use configuration::{
    ConfigFile, ConfigFormat, ConfigOverrides, HandoffConfig, ResolutionConfig, SvnConfig,
};
pub use error::AppError;
pub use policy::{NamePattern, SelectionPolicy};
pub use selection::{RankedCandidate, rank_candidates, select_artifact};
pub use version::{Version, parse_version_from_name};
