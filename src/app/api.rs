//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together configuration
//! loading, adapter construction and command execution.

use std::path::Path;

use crate::adapters::execution_command::{CommandExecution, NoopExecution};
use crate::adapters::process::CancelToken;
use crate::adapters::repository_retrying::{RetryPolicy, RetryingRepository};
use crate::adapters::svn_command::SvnCommandAdapter;
use crate::app::AppContext;
use crate::app::commands::{list, resolve};
use crate::ports::ExecutionPort;

pub use crate::app::commands::list::{CandidateListing, CandidateSummary};
pub use crate::domain::{AppError, ConfigOverrides, ResolutionConfig, ResolvedArtifact};

/// Options for a resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub overrides: ConfigOverrides,
    /// Hand the exported artifact to the configured execution tool.
    pub handoff: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { overrides: ConfigOverrides::default(), handoff: true }
    }
}

/// Load and validate the configuration at `path`.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<ResolutionConfig, AppError> {
    crate::app::config::load_config(path, overrides)
}

/// Resolve, export and hand off the artifact selected by the configuration at `config_path`.
pub fn resolve(config_path: &Path, options: &ResolveOptions) -> Result<ResolvedArtifact, AppError> {
    let config = load_config(config_path, &options.overrides)?;
    resolve_with(&config, options.handoff, CancelToken::new())
}

/// Run the resolution pipeline for an already-loaded configuration.
///
/// Cancelling `cancel` aborts running svn or handoff processes and discards
/// any in-progress export.
pub fn resolve_with(
    config: &ResolutionConfig,
    handoff: bool,
    cancel: CancelToken,
) -> Result<ResolvedArtifact, AppError> {
    let repository = svn_repository(config, &cancel);
    let execution: Box<dyn ExecutionPort> = match (&config.handoff, handoff) {
        (Some(handoff_config), true) => {
            Box::new(CommandExecution::new(handoff_config.clone(), cancel.clone()))
        }
        _ => Box::new(NoopExecution),
    };

    let mut ctx = AppContext::new(repository, execution, cancel);
    resolve::execute(&mut ctx, config)
}

/// List the ranked candidate set without exporting anything.
pub fn list_candidates(
    config_path: &Path,
    overrides: &ConfigOverrides,
) -> Result<CandidateListing, AppError> {
    let config = load_config(config_path, overrides)?;
    let repository = svn_repository(&config, &CancelToken::new());
    list::execute(&repository, &config)
}

fn svn_repository(
    config: &ResolutionConfig,
    cancel: &CancelToken,
) -> RetryingRepository<SvnCommandAdapter> {
    RetryingRepository::new(
        SvnCommandAdapter::new(&config.svn, cancel.clone()),
        RetryPolicy::from_config(&config.svn),
    )
}
