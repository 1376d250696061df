use crate::adapters::process::CancelToken;
use crate::ports::{ExecutionPort, RepositoryPort};

/// Application context holding dependencies for a resolution run.
pub struct AppContext<R: RepositoryPort, E: ExecutionPort> {
    repository: R,
    execution: E,
    cancel: CancelToken,
}

impl<R: RepositoryPort, E: ExecutionPort> AppContext<R, E> {
    /// Create a new application context.
    pub fn new(repository: R, execution: E, cancel: CancelToken) -> Self {
        Self { repository, execution, cancel }
    }

    /// Get a reference to the repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Get a mutable reference to the execution handoff.
    pub fn execution_mut(&mut self) -> &mut E {
        &mut self.execution
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Consume the context, returning the execution handoff.
    pub fn into_execution(self) -> E {
        self.execution
    }
}
