//! Artifact exporter: materialize the selected artifact in the local cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::adapters::process::CancelToken;
use crate::domain::{AppError, ArtifactEntry, ResolvedArtifact};
use crate::ports::RepositoryPort;

/// Export `entry` into `cache_dir`, replacing any file with the same basename.
///
/// The transfer lands in a staging directory inside `cache_dir` and is renamed
/// into place only after it completed, so a failed or cancelled export never
/// leaves a partial file at the destination. Exports to the same destination
/// are serialized within the process.
pub fn export_artifact<R: RepositoryPort + ?Sized>(
    repository: &R,
    entry: &ArtifactEntry,
    cache_dir: &Path,
    cancel: &CancelToken,
) -> Result<ResolvedArtifact, AppError> {
    let file_name = local_file_name(entry)?;
    fs::create_dir_all(cache_dir)?;
    let destination = cache_dir.join(file_name);
    let lock_key = fs::canonicalize(cache_dir)?.join(file_name);

    with_destination_lock(lock_key, || {
        if destination.is_file() {
            debug!(path = %destination.display(), "removing previously exported artifact");
            fs::remove_file(&destination)?;
        }

        let staging = tempfile::Builder::new().prefix(".export-").tempdir_in(cache_dir)?;
        let staged = staging.path().join(file_name);
        repository.export(&entry.url, &staged)?;

        if !staged.is_file() {
            return Err(AppError::ExportFailure {
                url: entry.url.clone(),
                details: "export reported success but produced no file".to_string(),
            });
        }
        if cancel.is_cancelled() {
            return Err(AppError::cancelled(format!("export {}", entry.url)));
        }

        fs::rename(&staged, &destination)?;
        let sha256 = file_sha256(&destination)?;
        info!(name = %entry.name, path = %destination.display(), %sha256, "exported artifact");

        Ok(ResolvedArtifact { source: entry.clone(), local_path: destination.clone(), sha256 })
    })
}

fn local_file_name(entry: &ArtifactEntry) -> Result<&str, AppError> {
    let name = entry.name.rsplit(['/', '\\']).next().unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::ExportFailure {
            url: entry.url.clone(),
            details: format!("'{}' is not a usable local file name", entry.name),
        });
    }
    Ok(name)
}

type LockTable = Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

fn lock_table() -> &'static LockTable {
    static LOCKS: OnceLock<LockTable> = OnceLock::new();
    LOCKS.get_or_init(Default::default)
}

/// Run `f` while holding the lock for `key`, a canonical destination path.
/// The entry is dropped again once no other export is waiting on it.
fn with_destination_lock<T>(
    key: PathBuf,
    f: impl FnOnce() -> Result<T, AppError>,
) -> Result<T, AppError> {
    let lock = lock_table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key.clone())
        .or_default()
        .clone();

    let result = {
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    };

    let mut locks = lock_table().lock().unwrap_or_else(PoisonError::into_inner);
    if Arc::strong_count(&lock) <= 2 {
        locks.remove(&key);
    }
    result
}

fn file_sha256(path: &Path) -> Result<String, AppError> {
    let content = fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRepository;
    use tempfile::TempDir;

    fn entry(name: &str) -> ArtifactEntry {
        ArtifactEntry::new(name, format!("https://svn.example.com/configs/{}", name), "")
    }

    fn staging_leftovers(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".export-"))
            .count()
    }

    #[test]
    fn creates_cache_directory_and_exports() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("nested/cache");
        let repository = FakeRepository::with_entries(vec![]);
        repository.set_export_content("[config]");

        let resolved =
            export_artifact(&repository, &entry("SGW_1.7.0.cfx"), &cache, &CancelToken::new()).unwrap();

        assert_eq!(resolved.local_path, cache.join("SGW_1.7.0.cfx"));
        assert_eq!(fs::read_to_string(&resolved.local_path).unwrap(), "[config]");
        assert_eq!(resolved.sha256.len(), 64);
        assert_eq!(staging_leftovers(&cache), 0);
    }

    #[test]
    fn repeated_export_overwrites_with_latest_content() {
        let dir = TempDir::new().unwrap();
        let repository = FakeRepository::with_entries(vec![]);
        let artifact = entry("SGW_1.7.0.cfx");

        repository.set_export_content("first");
        export_artifact(&repository, &artifact, dir.path(), &CancelToken::new()).unwrap();
        repository.set_export_content("second");
        let resolved = export_artifact(&repository, &artifact, dir.path(), &CancelToken::new()).unwrap();

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().filter_map(Result::ok).collect();
        assert_eq!(files.len(), 1);
        assert_eq!(fs::read_to_string(resolved.local_path).unwrap(), "second");
    }

    #[test]
    fn failed_export_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let repository = FakeRepository::with_entries(vec![]);
        repository.fail_next_export(AppError::ExportFailure {
            url: "u".into(),
            details: "E170000: path not found".into(),
        });

        let err = export_artifact(&repository, &entry("SGW_1.7.0.cfx"), dir.path(), &CancelToken::new())
            .unwrap_err();

        assert!(matches!(err, AppError::ExportFailure { .. }));
        assert!(!dir.path().join("SGW_1.7.0.cfx").exists());
        assert_eq!(staging_leftovers(dir.path()), 0);
    }

    #[test]
    fn stale_file_is_removed_even_when_export_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("SGW_1.7.0.cfx"), "stale").unwrap();
        let repository = FakeRepository::with_entries(vec![]);
        repository.fail_next_export(AppError::ExportFailure { url: "u".into(), details: "d".into() });

        assert!(export_artifact(&repository, &entry("SGW_1.7.0.cfx"), dir.path(), &CancelToken::new()).is_err());
        assert!(!dir.path().join("SGW_1.7.0.cfx").exists());
    }

    #[test]
    fn export_without_output_file_is_export_failure() {
        let dir = TempDir::new().unwrap();
        let repository = FakeRepository::with_entries(vec![]);
        repository.skip_export_write();

        let err = export_artifact(&repository, &entry("SGW_1.7.0.cfx"), dir.path(), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, AppError::ExportFailure { ref details, .. } if details.contains("no file")));
    }

    #[test]
    fn cancelled_run_does_not_publish_the_export() {
        let dir = TempDir::new().unwrap();
        let repository = FakeRepository::with_entries(vec![]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = export_artifact(&repository, &entry("SGW_1.7.0.cfx"), dir.path(), &cancel).unwrap_err();
        assert!(err.is_cancelled());
        assert!(!dir.path().join("SGW_1.7.0.cfx").exists());
        assert_eq!(staging_leftovers(dir.path()), 0);
    }

    #[test]
    fn equivalent_cache_paths_share_one_lock_entry() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("cache");
        let dotted = dir.path().join(".").join("cache");
        fs::create_dir_all(&plain).unwrap();

        let held = with_destination_lock(fs::canonicalize(&plain).unwrap().join("a.cfx"), || {
            let key = fs::canonicalize(&dotted).unwrap().join("a.cfx");
            let locks = lock_table().lock().unwrap();
            Ok(locks.contains_key(&key))
        })
        .unwrap();

        assert!(held);
    }

    #[test]
    fn lock_entries_are_released_after_export() {
        let dir = TempDir::new().unwrap();
        let repository = FakeRepository::with_entries(vec![]);
        let resolved =
            export_artifact(&repository, &entry("SGW_9.9.9.cfx"), dir.path(), &CancelToken::new()).unwrap();

        let key = fs::canonicalize(dir.path()).unwrap().join("SGW_9.9.9.cfx");
        assert!(!lock_table().lock().unwrap().contains_key(&key));
        assert!(resolved.local_path.is_file());
    }

    #[test]
    fn unusable_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let repository = FakeRepository::with_entries(vec![]);
        let err = export_artifact(&repository, &entry(".."), dir.path(), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, AppError::ExportFailure { .. }));
        assert!(repository.exports().is_empty());
    }
}
