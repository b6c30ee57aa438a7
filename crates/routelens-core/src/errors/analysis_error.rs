//! Top-level error for discovery, detection, graph building and impact mapping.

use super::error_code::{self, RouteLensErrorCode};
use super::{PathError, RegistryError, SourceError};

/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("file source error: {0}")]
    Source(#[from] SourceError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("detection failed for {framework}: {message}")]
    Detection { framework: String, message: String },
}

impl From<PathError> for AnalysisError {
    fn from(e: PathError) -> Self {
        Self::Source(SourceError::Path(e))
    }
}

impl RouteLensErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Source(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
            Self::Detection { .. } => error_code::DETECTION_FAILED,
        }
    }
}

/// Convenience type alias.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
