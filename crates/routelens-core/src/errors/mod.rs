//! Error types for every routelens subsystem.
//!
//! Each enum implements [`RouteLensErrorCode`] so callers across an FFI or
//! reporting boundary can match on a stable code instead of a message.

pub mod analysis_error;
pub mod error_code;
pub mod path_error;
pub mod registry_error;
pub mod source_error;

pub use analysis_error::{AnalysisError, AnalysisResult};
pub use error_code::RouteLensErrorCode;
pub use path_error::PathError;
pub use registry_error::RegistryError;
pub use source_error::{SourceError, SourceResult};
