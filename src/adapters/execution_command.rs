//! Execution handoff adapters.

use std::time::Duration;

use tracing::info;

use crate::adapters::process::{CancelToken, ProcessRunner};
use crate::domain::{AppError, HandoffConfig, ResolvedArtifact};
use crate::ports::ExecutionPort;

/// Drives an external execution tool by running its program once per lifecycle stage.
#[derive(Debug)]
pub struct CommandExecution {
    config: HandoffConfig,
    runner: ProcessRunner,
    artifact: Option<ResolvedArtifact>,
}

impl CommandExecution {
    pub fn new(config: HandoffConfig, cancel: CancelToken) -> Self {
        let runner = ProcessRunner::new(Duration::from_secs(config.timeout_secs), cancel);
        Self { config, runner, artifact: None }
    }

    fn run_stage(&self, stage: &str, template: &[String]) -> Result<(), AppError> {
        let artifact = self.artifact.as_ref().ok_or_else(|| {
            AppError::command_failure(
                &self.config.program,
                format!("{} requested before a configuration was opened", stage),
            )
        })?;
        if template.is_empty() {
            info!(stage, "no arguments configured, skipping handoff stage");
            return Ok(());
        }

        let args = expand_args(template, artifact);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        info!(stage, program = %self.config.program, "running handoff stage");
        self.runner
            .run(&self.config.program, &arg_refs)
            .map(|_| ())
            .map_err(|err| err.into_command_failure(format!("{} {}", self.config.program, args.join(" "))))
    }
}

impl ExecutionPort for CommandExecution {
    fn open(&mut self, artifact: &ResolvedArtifact) -> Result<(), AppError> {
        self.artifact = Some(artifact.clone());
        self.run_stage("open", &self.config.open)
    }

    fn compile(&mut self) -> Result<(), AppError> {
        self.run_stage("compile", &self.config.compile)
    }

    fn start(&mut self) -> Result<(), AppError> {
        self.run_stage("start", &self.config.start)
    }
}

fn expand_args(template: &[String], artifact: &ResolvedArtifact) -> Vec<String> {
    let path = artifact.local_path.to_string_lossy();
    template
        .iter()
        .map(|arg| arg.replace("{config}", &path).replace("{name}", &artifact.source.name))
        .collect()
}

/// Handoff used when no execution tool is configured.
#[derive(Debug, Default)]
pub struct NoopExecution;

impl ExecutionPort for NoopExecution {
    fn open(&mut self, artifact: &ResolvedArtifact) -> Result<(), AppError> {
        info!(path = %artifact.local_path.display(), "no execution tool configured, handoff skipped");
        Ok(())
    }

    fn compile(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    fn start(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}
