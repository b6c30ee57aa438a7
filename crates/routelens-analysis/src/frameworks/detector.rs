//! Framework detection in fixed specificity order.

use std::sync::Arc;

use routelens_core::config::DetectionConfig;
use routelens_core::{Confidence, FileSource, FrameworkDetectionResult};

use super::adapter::{Adapter, AdapterContext, FrameworkAdapter};
use super::registry::FrameworkRegistry;

/// Most specific first: React Router shares Remix's layout and is probed after it.
pub const DETECTION_ORDER: &[&str] = &["sveltekit", "nextjs", "nuxt", "remix", "react-router"];

/// A detected framework and the adapter that claimed it.
#[derive(Debug, Clone)]
pub struct Detection {
    pub adapter: Arc<Adapter>,
    pub result: FrameworkDetectionResult,
}

pub struct FrameworkDetector<'r> {
    registry: &'r FrameworkRegistry,
    config: DetectionConfig,
}

impl<'r> FrameworkDetector<'r> {
    pub fn new(registry: &'r FrameworkRegistry) -> Self {
        Self {
            registry,
            config: DetectionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    /// The best match, short-circuiting on the first high-confidence result.
    /// Ties keep detection order.
    pub async fn detect<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> Option<Detection> {
        let mut best: Option<Detection> = None;
        for name in self.candidates() {
            let Some(detection) = self.probe(name, ctx).await else {
                continue;
            };
            if detection.result.confidence == Confidence::High {
                tracing::debug!(framework = name, "high-confidence match, stopping");
                return Some(detection);
            }
            let better = best
                .as_ref()
                .map_or(true, |b| detection.result.confidence > b.result.confidence);
            if better {
                best = Some(detection);
            }
        }
        best
    }

    /// Every non-`none` match, in detection order.
    pub async fn detect_all<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> Vec<Detection> {
        let mut out = Vec::new();
        for name in self.candidates() {
            if let Some(detection) = self.probe(name, ctx).await {
                out.push(detection);
            }
        }
        out
    }

    fn candidates(&self) -> impl Iterator<Item = &'static str> + '_ {
        DETECTION_ORDER
            .iter()
            .copied()
            .filter(|name| !self.config.is_disabled(name))
    }

    /// Run one adapter's detection; failures are logged and read as "no match".
    async fn probe<S: FileSource>(&self, name: &str, ctx: &AdapterContext<'_, S>) -> Option<Detection> {
        let adapter = match self.registry.get(name) {
            Ok(adapter) => adapter,
            Err(e) => {
                tracing::warn!(framework = name, error = %e, "framework not registered, skipping");
                return None;
            }
        };
        match adapter.detect(ctx).await {
            Ok(result) if result.is_detected() => Some(Detection { adapter, result }),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(framework = name, error = %e, "detection failed, skipping");
                None
            }
        }
    }
}
