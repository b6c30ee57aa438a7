//! Framework registry errors.

use super::error_code::{self, RouteLensErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("framework '{name}' is not registered (registered: {})", registered.join(", "))]
    NotFound {
        name: String,
        registered: Vec<String>,
    },
}

impl RouteLensErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::FRAMEWORK_NOT_FOUND,
        }
    }
}
