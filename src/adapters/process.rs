//! Bounded, cancellable execution of external processes.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::AppError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Shared flag that aborts in-flight and future process runs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Captured output of a successful process run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Why a process run did not succeed.
#[derive(Debug)]
pub enum ProcessError {
    /// The process could not be spawned or waited on.
    Spawn(String),
    /// The process exited with a non-zero status.
    Exit(String),
    TimedOut(Duration),
    Cancelled,
}

impl ProcessError {
    /// Timeouts and cancellation stay command failures whatever the operation.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ProcessError::TimedOut(_) | ProcessError::Cancelled)
    }

    pub fn details(&self) -> String {
        match self {
            ProcessError::Spawn(details) | ProcessError::Exit(details) => details.clone(),
            ProcessError::TimedOut(timeout) => format!("timed out after {:?}", timeout),
            ProcessError::Cancelled => "cancelled".to_string(),
        }
    }

    pub fn into_command_failure(self, command: impl Into<String>) -> AppError {
        match self {
            ProcessError::Cancelled => AppError::cancelled(command),
            other => AppError::command_failure(command, other.details()),
        }
    }
}

/// Runs external programs with a timeout and a cancellation token.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    cancel: CancelToken,
}

impl ProcessRunner {
    pub fn new(timeout: Duration, cancel: CancelToken) -> Self {
        Self { timeout, cancel }
    }

    /// Run `program` to completion and capture its output.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput, ProcessError> {
        if self.cancel.is_cancelled() {
            return Err(ProcessError::Cancelled);
        }

        debug!(program, ?args, "spawning process");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProcessError::Spawn(e.to_string()))?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());
        let deadline = Instant::now() + self.timeout;

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    terminate(&mut child);
                    return Err(ProcessError::Spawn(e.to_string()));
                }
            }
            if self.cancel.is_cancelled() {
                warn!(program, "cancelling running process");
                terminate(&mut child);
                return Err(ProcessError::Cancelled);
            }
            if Instant::now() >= deadline {
                warn!(program, timeout = ?self.timeout, "process timed out");
                terminate(&mut child);
                return Err(ProcessError::TimedOut(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = collect(stdout_reader);
        let stderr = collect(stderr_reader);

        if !status.success() {
            let stderr = stderr.trim();
            return Err(ProcessError::Exit(if stderr.is_empty() {
                format!("exited with {}", status)
            } else {
                stderr.to_string()
            }));
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    source.map(|mut source| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = source.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
