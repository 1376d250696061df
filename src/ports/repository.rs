use std::path::Path;

use url::Url;

use crate::domain::{AppError, ArtifactEntry};

/// Read-only access to a remote version-controlled repository.
pub trait RepositoryPort {
    /// List configuration artifacts (`.cfg`/`.cfx` files) directly under `location`.
    ///
    /// Fails with `CommandFailure` when the listing cannot be obtained and with
    /// `MalformedResponse` when its output does not match the expected schema.
    fn list(&self, location: &Url) -> Result<Vec<ArtifactEntry>, AppError>;

    /// Write the content at `url` to `destination`, overwriting any existing file.
    ///
    /// Must fail rather than leave a truncated file behind.
    fn export(&self, url: &str, destination: &Path) -> Result<(), AppError>;
}

impl<T: RepositoryPort + ?Sized> RepositoryPort for Box<T> {
    fn list(&self, location: &Url) -> Result<Vec<ArtifactEntry>, AppError> {
        (**self).list(location)
    }

    fn export(&self, url: &str, destination: &Path) -> Result<(), AppError> {
        (**self).export(url, destination)
    }
}
