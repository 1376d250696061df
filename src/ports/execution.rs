use crate::domain::{AppError, ResolvedArtifact};

/// Downstream test-execution tool that consumes the resolved configuration.
///
/// Called in lifecycle order: `open`, `compile`, `start`.
pub trait ExecutionPort {
    /// Load the resolved configuration into the tool.
    fn open(&mut self, artifact: &ResolvedArtifact) -> Result<(), AppError>;

    /// Compile whatever the loaded configuration needs before running.
    fn compile(&mut self) -> Result<(), AppError>;

    /// Start execution.
    fn start(&mut self) -> Result<(), AppError>;
}

impl<T: ExecutionPort + ?Sized> ExecutionPort for Box<T> {
    fn open(&mut self, artifact: &ResolvedArtifact) -> Result<(), AppError> {
        (**self).open(artifact)
    }

    fn compile(&mut self) -> Result<(), AppError> {
        (**self).compile()
    }

    fn start(&mut self) -> Result<(), AppError> {
        (**self).start()
    }
}
