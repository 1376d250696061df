use std::path::PathBuf;

use crate::domain::{AppError, ResolvedArtifact};
use crate::ports::ExecutionPort;

/// Records each lifecycle call it receives.
#[derive(Default)]
pub struct RecordingExecution {
    pub calls: Vec<String>,
    pub opened: Option<PathBuf>,
    pub fail_on: Option<&'static str>,
}

impl RecordingExecution {
    fn record(&mut self, stage: &'static str) -> Result<(), AppError> {
        self.calls.push(stage.to_string());
        if self.fail_on == Some(stage) {
            return Err(AppError::command_failure("runner", format!("{} failed", stage)));
        }
        Ok(())
    }
}

impl ExecutionPort for RecordingExecution {
    fn open(&mut self, artifact: &ResolvedArtifact) -> Result<(), AppError> {
        self.opened = Some(artifact.local_path.clone());
        self.record("open")
    }

    fn compile(&mut self) -> Result<(), AppError> {
        self.record("compile")
    }

    fn start(&mut self) -> Result<(), AppError> {
        self.record("start")
    }
}
