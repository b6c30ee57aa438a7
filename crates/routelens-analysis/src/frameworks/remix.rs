//! Remix (v2 flat routes) adapter.

use routelens_core::errors::PathError;
use routelens_core::{AnalysisResult, FileSource, FrameworkDetectionResult, Route};

use super::adapter::{AdapterContext, AliasTable, FrameworkAdapter, RouteMatch};
use super::defaults;
use super::flat_routes::{self, ROUTES_DIR, ROUTE_EXTENSIONS};
use super::manifest::PackageManifest;

const CONFIG_FILES: &[&str] = &["remix.config.js", "remix.config.mjs", "remix.config.cjs"];

/// Vite configs that may carry the Remix plugin.
const VITE_CONFIGS: &[&str] = &["vite.config.ts", "vite.config.js", "vite.config.mjs"];

const REMIX_PACKAGES: &[&str] = &[
    "@remix-run/react",
    "@remix-run/node",
    "@remix-run/dev",
    "@remix-run/serve",
    "@remix-run/cloudflare",
    "@remix-run/deno",
];

const ALIASES: AliasTable = &[("~", &["app"])];

#[derive(Debug, Clone, Copy, Default)]
pub struct RemixAdapter;

impl RemixAdapter {
    pub fn new() -> Self {
        Self
    }

    async fn has_config<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<bool> {
        let source = ctx.file_source;
        if defaults::first_existing(source, CONFIG_FILES, ctx.concurrency()).await?.is_some() {
            return Ok(true);
        }
        for file in VITE_CONFIGS {
            if let Some(content) = source.read_optional(file).await? {
                if content.contains("@remix-run/dev") {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl FrameworkAdapter for RemixAdapter {
    fn name(&self) -> &'static str {
        "remix"
    }

    fn display_name(&self) -> &'static str {
        "Remix"
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
        let manifest = PackageManifest::load(ctx.file_source).await?;

        let mut indicators = Vec::new();
        if self.has_config(ctx).await? {
            indicators.push("remix config present");
        }
        if flat_routes::has_route_tree(ctx.file_source, ctx.concurrency()).await? {
            indicators.push("app/routes directory");
        }
        if manifest.has_any(REMIX_PACKAGES) {
            indicators.push("@remix-run dependency");
        }

        Ok(FrameworkDetectionResult::from_indicators(self.name(), &indicators)
            .with_version(manifest.first_version(&["@remix-run/react", "@remix-run/dev"])))
    }

    async fn discover_routes<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Vec<Route>> {
        flat_routes::discover(ctx, self.name()).await
    }
}
