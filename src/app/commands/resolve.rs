//! Resolution pipeline: list → select → export → handoff.

use tracing::info;

use crate::app::AppContext;
use crate::app::commands::export::export_artifact;
use crate::domain::{AppError, ResolutionConfig, ResolvedArtifact, select_artifact};
use crate::ports::{ExecutionPort, RepositoryPort};

/// Run one resolution and hand the exported artifact to the execution tool.
pub fn execute<R: RepositoryPort, E: ExecutionPort>(
    ctx: &mut AppContext<R, E>,
    config: &ResolutionConfig,
) -> Result<ResolvedArtifact, AppError> {
    let entries = ctx.repository().list(&config.repository_location)?;
    let chosen = select_artifact(&entries, config.selection_policy, &config.name_pattern)?;
    info!(
        name = %chosen.name,
        policy = %config.selection_policy,
        version = %chosen.version(),
        listed = entries.len(),
        "selected artifact"
    );

    let resolved =
        export_artifact(ctx.repository(), &chosen, &config.cache_directory, ctx.cancel_token())?;

    hand_off(ctx.execution_mut(), &resolved)?;
    Ok(resolved)
}

fn hand_off(execution: &mut impl ExecutionPort, artifact: &ResolvedArtifact) -> Result<(), AppError> {
    execution.open(artifact)?;
    execution.compile()?;
    execution.start()
}
