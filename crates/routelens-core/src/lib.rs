//! # routelens-core
//!
//! Foundation crate for the routelens change-impact engine.
//! Defines the data model, errors, config, tracing setup, path safety and the
//! `FileSource` capability with its local, remote and in-memory backends.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod paths;
pub mod source;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::RouteLensConfig;
pub use errors::{AnalysisError, AnalysisResult, RouteLensErrorCode, SourceError, SourceResult};
pub use traits::FileSource;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::{Confidence, FrameworkDetectionResult, ImportGraph, Route, RouterType};
