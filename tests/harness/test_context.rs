//! Shared testing harness for `cfx-resolve` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fake_svn::FakeSvn;

pub(crate) const REPOSITORY: &str = "https://svn.example.com/repo/configs";

/// Testing harness providing an isolated environment for CLI exercises.
pub(crate) struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    svn: FakeSvn,
}

impl TestContext {
    /// Create a new isolated environment with a fake svn client installed.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        let svn = FakeSvn::install(&root.path().join("bin"));
        Self { root, work_dir, svn }
    }

    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub(crate) fn svn(&self) -> &FakeSvn {
        &self.svn
    }

    /// Build a command for invoking the compiled binary within the work directory.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("cfx-resolve").expect("Failed to locate cfx-resolve binary");
        cmd.current_dir(&self.work_dir).env_remove("RUST_LOG");
        cmd
    }

    /// Write `cfx-resolve.toml` pointing at the fake svn client, followed by `extra`.
    pub(crate) fn write_config(&self, extra: &str) {
        let content = format!(
            "repository_location = \"{}\"\n{}\n[svn]\nprogram = \"{}\"\ntimeout_secs = 10\nmax_retries = 0\n",
            REPOSITORY,
            extra,
            self.svn.program.display()
        );
        fs::write(self.work_dir.join("cfx-resolve.toml"), content).expect("Failed to write config");
    }

    /// Write a raw configuration file under the work directory.
    pub(crate) fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Default cache directory relative to the work directory.
    pub(crate) fn cache_dir(&self) -> PathBuf {
        self.work_dir.join("_cache_configs")
    }

    /// Names of the files present in the cache directory.
    pub(crate) fn cached_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.cache_dir())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    pub(crate) fn root(&self) -> &Path {
        self.root.path()
    }
}
