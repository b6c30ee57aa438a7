//! Configuration for a routelens pass.
//!
//! Every field has a default, so partial TOML files are always accepted.

pub mod detection_config;
pub mod remote_config;
pub mod scan_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use detection_config::DetectionConfig;
pub use remote_config::RemoteConfig;
pub use scan_config::{AliasConfig, ScanConfig};

use crate::errors::SourceError;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RouteLensConfig {
    pub scan: ScanConfig,
    pub remote: RemoteConfig,
    pub detection: DetectionConfig,
}

impl RouteLensConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load config from a TOML file on disk.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::io(&display, e))?;
        Self::from_toml(&text).map_err(|e| SourceError::Decode {
            path: display,
            message: e.to_string(),
        })
    }
}
