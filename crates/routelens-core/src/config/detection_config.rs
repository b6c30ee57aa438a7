//! Framework detection configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DetectionConfig {
    /// Framework names the detector never probes.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Skip detection and use this framework directly.
    pub force_framework: Option<String>,
}

impl DetectionConfig {
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d == name)
    }
}
