mod execution;
mod repository;

pub use execution::ExecutionPort;
pub use repository::RepositoryPort;
