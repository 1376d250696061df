mod fake_repository;
mod recording_execution;

pub use fake_repository::FakeRepository;
pub use recording_execution::RecordingExecution;
