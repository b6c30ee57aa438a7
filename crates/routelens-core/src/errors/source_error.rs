//! File-source errors (local disk, remote contents API, in-memory).

use super::error_code::{self, RouteLensErrorCode};
use super::path_error::PathError;

/// Errors raised by a [`FileSource`](crate::traits::FileSource) implementation.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP {status} while fetching {path}")]
    Http { status: u16, path: String },

    #[error("request failed for {path}: {message}")]
    Request { path: String, message: String },

    #[error("could not decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

impl SourceError {
    /// True for the one error class that must abort the whole pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_string(),
            }
        } else {
            Self::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}

impl RouteLensErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::SOURCE_NOT_FOUND,
            Self::Io { .. } => error_code::SOURCE_IO,
            Self::Http { .. } | Self::Request { .. } => error_code::SOURCE_HTTP,
            Self::Decode { .. } => error_code::SOURCE_DECODE,
            Self::Path(e) => e.error_code(),
        }
    }
}

/// Convenience type alias.
pub type SourceResult<T> = Result<T, SourceError>;
