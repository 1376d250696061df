//! Retry wrapper for repository listing.

use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::domain::{AppError, ArtifactEntry, SvnConfig};
use crate::ports::RepositoryPort;

const MAX_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self { max_retries, base_delay_ms }
    }

    pub fn from_config(config: &SvnConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay_ms)
    }

    fn delay_for_retry(&self, retry: u32) -> Duration {
        // retry=1 -> base, retry=2 -> base*2, retry=3 -> base*4, capped.
        let exponent = retry.saturating_sub(1).min(6);
        let delay_ms = self.base_delay_ms.saturating_mul(1_u64 << exponent).min(MAX_DELAY_MS);
        Duration::from_millis(delay_ms)
    }
}

/// Retries listing after transient command failures. Exports and every other
/// error kind pass through untouched.
pub struct RetryingRepository<R: RepositoryPort> {
    inner: R,
    policy: RetryPolicy,
}

impl<R: RepositoryPort> RetryingRepository<R> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<R: RepositoryPort> RepositoryPort for RetryingRepository<R> {
    fn list(&self, location: &Url) -> Result<Vec<ArtifactEntry>, AppError> {
        let mut retry = 0;
        loop {
            match self.inner.list(location) {
                Ok(entries) => return Ok(entries),
                Err(error) if error.is_transient() && retry < self.policy.max_retries => {
                    retry += 1;
                    let delay = self.policy.delay_for_retry(retry);
                    warn!(
                        "Listing {} failed (retry {}/{}): {}. Retrying in {} ms.",
                        location,
                        retry,
                        self.policy.max_retries,
                        error,
                        delay.as_millis()
                    );
                    thread::sleep(delay);
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn export(&self, url: &str, destination: &Path) -> Result<(), AppError> {
        self.inner.export(url, destination)
    }
}
