//! FileSource: "a project's files", backed by disk, a VCS API or memory.
//!
//! Every path is project-relative and `/`-separated. Adapters must only ever
//! reach files through this trait so the same logic runs locally and remotely.

use crate::errors::{SourceError, SourceResult};

#[allow(async_fn_in_trait)]
pub trait FileSource: Send + Sync {
    /// Short human-readable label for logs (`local:/path`, `github:owner/repo@ref`).
    fn label(&self) -> String;

    async fn exists(&self, path: &str) -> SourceResult<bool>;

    async fn read(&self, path: &str) -> SourceResult<String>;

    /// Entry names (not paths) directly inside `path`, in the backend's order.
    async fn readdir(&self, path: &str) -> SourceResult<Vec<String>>;

    async fn is_directory(&self, path: &str) -> SourceResult<bool>;

    /// Project-relative files matching a glob pattern, sorted.
    async fn glob(&self, pattern: &str) -> SourceResult<Vec<String>>;

    /// `exists`, with every non-fatal failure read as "absent".
    async fn probe(&self, path: &str) -> SourceResult<bool> {
        match self.exists(path).await {
            Ok(found) => Ok(found),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::trace!(path, error = %e, "probe failed, treating as absent");
                Ok(false)
            }
        }
    }

    /// `is_directory`, with every non-fatal failure read as "not a directory".
    async fn probe_dir(&self, path: &str) -> SourceResult<bool> {
        match self.is_directory(path).await {
            Ok(is_dir) => Ok(is_dir),
            Err(e) if e.is_fatal() => Err(e),
            Err(_) => Ok(false),
        }
    }

    /// `read`, with every non-fatal failure read as `None`.
    async fn read_optional(&self, path: &str) -> SourceResult<Option<String>> {
        match self.read(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_fatal() => Err(e),
            Err(SourceError::NotFound { .. }) => Ok(None),
            Err(e) => {
                tracing::debug!(path, error = %e, "unreadable file skipped");
                Ok(None)
            }
        }
    }
}
