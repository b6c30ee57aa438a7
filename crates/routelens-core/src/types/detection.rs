//! Framework detection results.

use serde::{Deserialize, Serialize};

/// Coarse detection certainty derived from counting structural indicators.
///
/// The 3/2/1 mapping is a heuristic kept for compatibility, not a scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    /// 3 ⇒ high, 2 ⇒ medium, 1 ⇒ low, 0 ⇒ none.
    pub fn from_indicators(count: usize) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouterType {
    /// Next.js `app/` directory.
    App,
    /// Next.js `pages/` directory.
    Pages,
    /// Next.js with both `app/` and `pages/`.
    Hybrid,
    /// Any other file-based router.
    FileBased,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkDetectionResult {
    pub framework: Option<String>,
    pub confidence: Confidence,
    pub reason: String,
    pub router_type: Option<RouterType>,
    pub version: Option<String>,
}

impl FrameworkDetectionResult {
    /// A result for a framework that was probed and not found.
    pub fn none(reason: impl Into<String>) -> Self {
        Self {
            framework: None,
            confidence: Confidence::None,
            reason: reason.into(),
            router_type: None,
            version: None,
        }
    }

    /// Build a result from the indicators that were present.
    ///
    /// `framework` is only set when at least one indicator fired.
    pub fn from_indicators(framework: &str, indicators: &[&str]) -> Self {
        let confidence = Confidence::from_indicators(indicators.len());
        if confidence == Confidence::None {
            return Self::none(format!("no {framework} indicators found"));
        }
        Self {
            framework: Some(framework.to_string()),
            confidence,
            reason: format!("{framework}: {}", indicators.join(", ")),
            router_type: Some(RouterType::FileBased),
            version: None,
        }
    }

    pub fn with_router_type(mut self, router_type: RouterType) -> Self {
        if self.framework.is_some() {
            self.router_type = Some(router_type);
        }
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        if self.framework.is_some() {
            self.version = version;
        }
        self
    }

    pub fn is_detected(&self) -> bool {
        self.confidence != Confidence::None
    }
}
