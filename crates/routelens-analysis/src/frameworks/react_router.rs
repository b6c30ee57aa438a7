//! React Router (framework mode, `flatRoutes()`) adapter.
//!
//! Shares Remix's flat-file conventions. Detection steps aside whenever any
//! Remix indicator is present, so a Remix project is never claimed here.

use routelens_core::errors::PathError;
use routelens_core::{AnalysisResult, FileSource, FrameworkDetectionResult, Route};

use super::adapter::{AdapterContext, AliasTable, FrameworkAdapter, RouteMatch};
use super::defaults;
use super::flat_routes::{self, ROUTES_DIR, ROUTE_EXTENSIONS};
use super::manifest::PackageManifest;

const CONFIG_FILES: &[&str] = &["react-router.config.ts", "react-router.config.js", "react-router.config.mjs"];

const REMIX_CONFIG_FILES: &[&str] = &["remix.config.js", "remix.config.mjs", "remix.config.cjs"];

/// Route manifests used by framework mode.
const ROUTE_CONFIGS: &[&str] = &["app/routes.ts", "app/routes.js"];

const ALIASES: AliasTable = &[("~", &["app"])];

#[derive(Debug, Clone, Copy, Default)]
pub struct ReactRouterAdapter;

impl ReactRouterAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for ReactRouterAdapter {
    fn name(&self) -> &'static str {
        "react-router"
    }

    fn display_name(&self) -> &'static str {
        "React Router"
    }

    fn page_extensions(&self) -> &'static [&'static str] {
        ROUTE_EXTENSIONS
    }

    fn import_aliases(&self) -> AliasTable {
        ALIASES
    }

    fn routes_directory(&self) -> &'static str {
        ROUTES_DIR
    }

    fn is_route_file(&self, path: &str) -> bool {
        flat_routes::is_route_file(path)
    }

    fn is_layout_file(&self, path: &str) -> bool {
        flat_routes::is_layout_file(path)
    }

    fn login_candidates(&self, pattern: &str) -> Result<Vec<String>, PathError> {
        flat_routes::login_candidates(pattern)
    }

    fn structural_matches(&self, file: &str, routes: &[Route]) -> Vec<RouteMatch> {
        flat_routes::structural_matches(file, routes)
    }

    async fn detect<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<FrameworkDetectionResult> {
        let source = ctx.file_source;
        let manifest = PackageManifest::load(source).await?;
        let n = ctx.concurrency();

        if manifest.has_prefix("@remix-run/") {
            return Ok(FrameworkDetectionResult::none("remix dependencies present"));
        }
        if defaults::first_existing(source, REMIX_CONFIG_FILES, n).await?.is_some() {
            return Ok(FrameworkDetectionResult::none("remix config present"));
        }

        let mut indicators = Vec::new();
        if defaults::first_existing(source, CONFIG_FILES, n).await?.is_some() {
            indicators.push("react-router.config present");
        }
        if defaults::first_existing(source, ROUTE_CONFIGS, n).await?.is_some()
            || flat_routes::has_route_tree(source, n).await?
        {
            indicators.push("app routes");
        }
        if manifest.has_any(&["@react-router/dev", "react-router"]) {
            indicators.push("react-router dependency");
        }

        Ok(FrameworkDetectionResult::from_indicators(self.name(), &indicators)
            .with_version(manifest.first_version(&["react-router", "@react-router/dev"])))
    }

    async fn discover_routes<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Vec<Route>> {
        flat_routes::discover(ctx, self.name()).await
    }
}
