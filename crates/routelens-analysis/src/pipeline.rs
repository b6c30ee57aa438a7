//! 4-phase change-impact pipeline.
//!
//! Phase 1: Framework detection (or the configured framework)
//! Phase 2: Route discovery
//! Phase 3: Import graph build
//! Phase 4: Change-impact mapping

use std::sync::Arc;
use std::time::Instant;

use routelens_core::{AnalysisResult, FileSource, FrameworkDetectionResult, ImportGraph, Route, RouteLensConfig};
use serde::Serialize;

use crate::frameworks::{Adapter, AdapterContext, FrameworkAdapter, FrameworkDetector, FrameworkRegistry};
use crate::impact::{ChangeImpactMapper, ImpactMap};
use crate::import_graph::ImportGraphBuilder;

/// Everything one pass produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub detection: FrameworkDetectionResult,
    pub routes: Vec<Route>,
    pub graph: ImportGraph,
    pub impact: ImpactMap,
    /// Per-phase wall time in microseconds.
    pub phase_times_us: [u64; 4],
}

impl ImpactReport {
    /// Report for a project no adapter claimed.
    pub fn empty(detection: FrameworkDetectionResult) -> Self {
        Self {
            detection,
            routes: Vec::new(),
            graph: ImportGraph::new(),
            impact: ImpactMap::new(),
            phase_times_us: [0; 4],
        }
    }

    pub fn framework(&self) -> Option<&str> {
        self.detection.framework.as_deref()
    }
}

pub struct ImpactPipeline<'r> {
    registry: &'r FrameworkRegistry,
    config: RouteLensConfig,
}

impl<'r> ImpactPipeline<'r> {
    pub fn new(registry: &'r FrameworkRegistry) -> Self {
        Self {
            registry,
            config: RouteLensConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RouteLensConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RouteLensConfig {
        &self.config
    }

    /// Run every phase against `source` with the pipeline's scan config.
    pub async fn run<S, P>(&self, source: &S, changed: &[P]) -> AnalysisResult<ImpactReport>
    where
        S: FileSource,
        P: AsRef<str>,
    {
        let ctx = AdapterContext::new(source).with_scan(self.config.scan.clone());
        self.run_in(&ctx, changed).await
    }

    /// Run every phase inside an existing context.
    pub async fn run_in<S, P>(&self, ctx: &AdapterContext<'_, S>, changed: &[P]) -> AnalysisResult<ImpactReport>
    where
        S: FileSource,
        P: AsRef<str>,
    {
        let total_start = Instant::now();
        let mut times = [0u64; 4];

        // Phase 1: Detection
        let phase1_start = Instant::now();
        let Some((adapter, detection)) = self.select_adapter(ctx).await? else {
            tracing::info!(root = %ctx.project_root, "no supported framework detected");
            return Ok(ImpactReport::empty(FrameworkDetectionResult::none(
                "no supported framework detected",
            )));
        };
        times[0] = phase1_start.elapsed().as_micros() as u64;
        tracing::info!(
            framework = adapter.name(),
            confidence = detection.confidence.name(),
            elapsed_us = times[0],
            "framework selected"
        );

        // Phase 2: Route discovery
        let phase2_start = Instant::now();
        let routes = adapter.discover_routes(ctx).await?;
        times[1] = phase2_start.elapsed().as_micros() as u64;
        tracing::info!(routes = routes.len(), elapsed_us = times[1], "routes discovered");

        // Phase 3: Import graph
        let phase3_start = Instant::now();
        let graph = ImportGraphBuilder::for_adapter(&*adapter, ctx.scan.clone())
            .build(ctx.file_source)
            .await?;
        times[2] = phase3_start.elapsed().as_micros() as u64;

        // Phase 4: Impact mapping
        let phase4_start = Instant::now();
        let impact = ChangeImpactMapper::new(&*adapter).map(changed, &routes, &graph);
        times[3] = phase4_start.elapsed().as_micros() as u64;
        tracing::info!(
            changed = changed.len(),
            affected = impact.len(),
            elapsed_us = times[3],
            "impact mapped"
        );

        tracing::info!(
            total_us = total_start.elapsed().as_micros() as u64,
            "impact pipeline finished"
        );
        Ok(ImpactReport {
            detection,
            routes,
            graph,
            impact,
            phase_times_us: times,
        })
    }

    /// The configured framework, or the detector's best match.
    async fn select_adapter<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<Option<(Arc<Adapter>, FrameworkDetectionResult)>> {
        if let Some(name) = &self.config.detection.force_framework {
            let adapter = self.registry.get(name)?;
            let mut detection = adapter.detect(ctx).await?;
            if !detection.is_detected() {
                detection = FrameworkDetectionResult::from_indicators(name, &["forced by configuration"]);
            }
            return Ok(Some((adapter, detection)));
        }

        let detector = FrameworkDetector::new(self.registry).with_config(self.config.detection.clone());
        Ok(detector.detect(ctx).await.map(|d| (d.adapter, d.result)))
    }
}
