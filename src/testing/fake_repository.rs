use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use url::Url;

use crate::domain::{AppError, ArtifactEntry};
use crate::ports::RepositoryPort;

/// In-memory repository returning fixed entries and writing fixed export content.
#[derive(Default)]
pub struct FakeRepository {
    entries: Vec<ArtifactEntry>,
    list_failures: Mutex<VecDeque<AppError>>,
    list_calls: Mutex<usize>,
    export_failure: Mutex<Option<AppError>>,
    export_content: Mutex<Option<String>>,
    write_on_export: Mutex<bool>,
    exports: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeRepository {
    pub fn with_entries(entries: Vec<ArtifactEntry>) -> Self {
        Self { entries, write_on_export: Mutex::new(true), ..Default::default() }
    }

    /// Queue errors returned by the next `list` calls, in order.
    pub fn fail_next_lists(&self, errors: Vec<AppError>) {
        self.list_failures.lock().unwrap().extend(errors);
    }

    pub fn fail_next_export(&self, error: AppError) {
        *self.export_failure.lock().unwrap() = Some(error);
    }

    pub fn set_export_content(&self, content: &str) {
        *self.export_content.lock().unwrap() = Some(content.to_string());
    }

    /// Report success from `export` without writing anything.
    pub fn skip_export_write(&self) {
        *self.write_on_export.lock().unwrap() = false;
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn exports(&self) -> Vec<(String, PathBuf)> {
        self.exports.lock().unwrap().clone()
    }
}

impl RepositoryPort for FakeRepository {
    fn list(&self, _location: &Url) -> Result<Vec<ArtifactEntry>, AppError> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(error) = self.list_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(self.entries.clone())
    }

    fn export(&self, url: &str, destination: &Path) -> Result<(), AppError> {
        self.exports.lock().unwrap().push((url.to_string(), destination.to_path_buf()));
        if let Some(error) = self.export_failure.lock().unwrap().take() {
            // Leave a partial file behind, like an interrupted transfer would.
            fs::write(destination, b"partial")?;
            return Err(error);
        }
        if *self.write_on_export.lock().unwrap() {
            let content = self
                .export_content
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| format!("content of {}", url));
            fs::write(destination, content)?;
        }
        Ok(())
    }
}
