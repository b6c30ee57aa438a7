//! Path-joining errors. The only errors in routelens that are always fatal.

use super::error_code::{self, RouteLensErrorCode};

/// A path segment tried to escape the directory it was joined onto.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path traversal rejected: segment '{segment}' leaves the base directory")]
    Traversal { segment: String },

    #[error("encoded path traversal rejected: segment '{segment}'")]
    EncodedTraversal { segment: String },

    #[error("absolute path rejected where a relative segment was expected: '{segment}'")]
    Absolute { segment: String },
}

impl RouteLensErrorCode for PathError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Traversal { .. } | Self::EncodedTraversal { .. } => error_code::PATH_TRAVERSAL,
            Self::Absolute { .. } => error_code::PATH_ABSOLUTE,
        }
    }
}
