//! Next.js adapter covering both routers.
//!
//! App router (`app/` or `src/app/`): directory-per-route, `page.*` renders,
//! `route.*` is an API handler, `layout.*`/`template.*` wrap the subtree.
//! Private (`_x`), parallel-slot (`@x`) and intercepting (`(.)x`) directories
//! are not walked. Pages router (`pages/` or `src/pages/`): file-per-route,
//! `index` collapses, `_app`/`_document` wrap everything, `pages/api` is skipped.

use routelens_core::errors::PathError;
use routelens_core::{
    paths, AnalysisResult, FileSource, FrameworkDetectionResult, FxHashSet, Route, RouterType,
};

use super::adapter::{AdapterContext, AliasTable, FrameworkAdapter, RouteMatch};
use super::defaults::{self, DirEntry, MatchCollector};
use super::manifest::PackageManifest;
use super::{scan, segments};
use crate::impact::ImpactReason;

const APP_ROOTS: &[&str] = &["app", "src/app"];
const PAGES_ROOTS: &[&str] = &["pages", "src/pages"];

const CONFIG_FILES: &[&str] = &["next.config.js", "next.config.mjs", "next.config.ts", "next.config.cjs"];

const PAGE_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js", "mdx"];

const ALIASES: AliasTable = &[("@", &["src", ""])];

/// App-router files that belong to the route in their directory.
const APP_ROUTE_STEMS: &[&str] = &["page", "route", "loading", "error", "not-found", "default"];
const APP_LAYOUT_STEMS: &[&str] = &["layout", "template"];

const LOGIN_EXTENSIONS: &[&str] = &["tsx", "jsx", "js"];
const LOGIN_GROUPS: &[&str] = &["", "(auth)"];

#[derive(Debug, Clone, Copy, Default)]
pub struct NextJsAdapter;

impl NextJsAdapter {
    pub fn new() -> Self {
        Self
    }

    async fn app_root<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Option<&'static str>> {
        let source = ctx.file_source;
        for root in APP_ROOTS.iter().copied() {
            if !source.probe_dir(root).await? {
                continue;
            }
            let entries = defaults::list_dir(source, root, ctx.concurrency()).await?;
            if entries.iter().any(|e| !e.is_dir && has_page_ext(e) && is_app_marker(e.stem())) {
                return Ok(Some(root));
            }
            // Remix and React Router keep `root.*` and `routes` directly under `app/`.
            if entries.iter().any(|e| matches!(e.stem(), "root" | "routes")) {
                continue;
            }
            // Multiple root layouts: only route groups carry `layout.*`.
            let marker = |e: &DirEntry| has_page_ext(e) && is_app_marker(e.stem());
            if module_under(ctx, root, marker, is_app_walkable).await? {
                return Ok(Some(root));
            }
        }
        Ok(None)
    }

    async fn pages_root<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Option<&'static str>> {
        for root in PAGES_ROOTS.iter().copied() {
            // A page module anywhere, not just a directory (Nuxt also has `pages/`).
            let walkable = |e: &DirEntry| e.is_dir && !e.name.starts_with('.') && e.name != "node_modules";
            if module_under(ctx, root, has_page_ext, walkable).await? {
                return Ok(Some(root));
            }
        }
        Ok(None)
    }

    async fn discover_app<S: FileSource>(&self, ctx: &AdapterContext<'_, S>, root: &str) -> AnalysisResult<Vec<Route>> {
        let source = ctx.file_source;
        let max_depth = ctx.scan.effective_max_depth();
        let mut routes = Vec::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack = vec![AppFrame {
            dir: root.to_string(),
            segments: Vec::new(),
            group: None,
            layout: false,
            auth: false,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            if !visited.insert(frame.dir.clone()) {
                continue;
            }
            let entries = defaults::list_dir(source, &frame.dir, ctx.concurrency()).await?;

            let mut layouts = Vec::new();
            let mut pages = Vec::new();
            let mut handlers = Vec::new();
            for entry in entries.iter().filter(|e| !e.is_dir && has_page_ext(e)) {
                match entry.stem() {
                    "page" => pages.push(entry.path.clone()),
                    "route" => handlers.push(entry.path.clone()),
                    stem if APP_LAYOUT_STEMS.contains(&stem) => layouts.push(entry.path.clone()),
                    _ => {}
                }
            }

            let layout_sources = defaults::read_all(source, &layouts).await?;
            let layout = frame.layout || !layouts.is_empty();
            let auth = frame.auth || layout_sources.iter().any(|(_, c)| scan::has_auth_marker(c));

            if !pages.is_empty() || !handlers.is_empty() {
                let mut route = Route::new(defaults::url_from_segments(&frame.segments), frame.dir.clone());
                route.group = frame.group.clone();
                route.has_layout = layout;
                route.is_dynamic = frame.segments.iter().any(|s| s.contains('['));
                route.has_api_endpoint = !handlers.is_empty();

                let mut route_auth = auth;
                let mut form = false;
                for (_, content) in defaults::read_all(source, &pages).await? {
                    route_auth |= scan::has_auth_marker(&content);
                    form |= scan::has_form(&content);
                    route.actions.extend(scan::server_actions(&content));
                }
                for (_, content) in defaults::read_all(source, &handlers).await? {
                    route_auth |= scan::has_auth_marker(&content);
                    for method in scan::http_methods(&content) {
                        if !route.api_methods.contains(&method) {
                            route.api_methods.push(method);
                        }
                    }
                }
                route.is_auth_protected = route_auth;
                route.has_form_handler = form || !route.actions.is_empty();
                route.page_files = pages;
                route.server_files = handlers;
                routes.push(route);
            }

            if frame.depth >= max_depth {
                if entries.iter().any(is_app_walkable) {
                    tracing::warn!(dir = %frame.dir, max_depth, "route tree deeper than max_depth, not descending");
                }
                continue;
            }
            for entry in entries.iter().rev().filter(|e| is_app_walkable(e)) {
                let mut child = AppFrame {
                    dir: entry.path.clone(),
                    segments: frame.segments.clone(),
                    group: frame.group.clone(),
                    layout,
                    auth,
                    depth: frame.depth + 1,
                };
                match segments::group_name(&entry.name) {
                    Some(group) => child.group = Some(group.to_string()),
                    None => child.segments.push(entry.name.clone()),
                }
                stack.push(child);
            }
        }
        Ok(routes)
    }

    async fn discover_pages<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
        root: &str,
    ) -> AnalysisResult<Vec<Route>> {
        let source = ctx.file_source;
        let max_depth = ctx.scan.effective_max_depth();
        let wrappers: Vec<String> = ["_app", "_document"]
            .iter()
            .flat_map(|stem| PAGE_EXTENSIONS.iter().map(move |ext| format!("{root}/{stem}.{ext}")))
            .collect();
        let has_wrapper = defaults::first_existing(source, &wrappers, ctx.concurrency())
            .await?
            .is_some();

        let mut routes = Vec::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack: Vec<(String, Vec<String>, usize)> = vec![(root.to_string(), Vec::new(), 0)];

        while let Some((dir, segs, depth)) = stack.pop() {
            if !visited.insert(dir.clone()) {
                continue;
            }
            let entries = defaults::list_dir(source, &dir, ctx.concurrency()).await?;

            for entry in entries.iter().filter(|e| !e.is_dir && is_pages_module(e)) {
                let stem = entry.stem();
                let mut url = segs.clone();
                let directory = if stem == "index" {
                    dir.clone()
                } else {
                    url.push(stem.to_string());
                    paths::join(&dir, stem)
                };

                let mut route = Route::new(defaults::url_from_segments(&url), directory);
                route.has_layout = has_wrapper;
                route.is_dynamic = url.iter().any(|s| s.contains('['));
                if let Some(content) = source.read_optional(&entry.path).await? {
                    route.is_auth_protected = scan::has_auth_marker(&content);
                    route.has_form_handler = scan::has_form(&content);
                }
                route.page_files = vec![entry.path.clone()];
                routes.push(route);
            }

            if depth >= max_depth {
                continue;
            }
            for entry in entries.iter().rev().filter(|e| is_pages_walkable(e, depth)) {
                let mut child = segs.clone();
                child.push(entry.name.clone());
                stack.push((entry.path.clone(), child, depth + 1));
            }
        }
        Ok(routes)
    }
}

struct AppFrame {
    dir: String,
    segments: Vec<String>,
    group: Option<String>,
    layout: bool,
    auth: bool,
    depth: usize,
}

/// Whether any file under `root` satisfies `accept`, descending only into
/// directories `walkable` admits, no deeper than `max_depth`.
async fn module_under<S, F, W>(ctx: &AdapterContext<'_, S>, root: &str, accept: F, walkable: W) -> AnalysisResult<bool>
where
    S: FileSource,
    F: Fn(&DirEntry) -> bool,
    W: Fn(&DirEntry) -> bool,
{
    let max_depth = ctx.scan.effective_max_depth();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut stack = vec![(root.to_string(), 0usize)];

    while let Some((dir, depth)) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let entries = defaults::list_dir(ctx.file_source, &dir, ctx.concurrency()).await?;
        if entries.iter().any(|e| !e.is_dir && accept(e)) {
            return Ok(true);
        }
        if depth < max_depth {
            stack.extend(entries.iter().filter(|e| walkable(e)).map(|e| (e.path.clone(), depth + 1)));
        }
    }
    Ok(false)
}

fn is_app_marker(stem: &str) -> bool {
    stem == "page" || stem == "route" || APP_LAYOUT_STEMS.contains(&stem)
}

fn has_page_ext(entry: &DirEntry) -> bool {
    entry.extension().is_some_and(|x| PAGE_EXTENSIONS.contains(&x))
}

fn is_app_walkable(entry: &DirEntry) -> bool {
    entry.is_dir
        && !entry.name.starts_with(['.', '_', '@'])
        && entry.name != "node_modules"
        && !segments::is_intercepting(&entry.name)
}

fn is_pages_walkable(entry: &DirEntry, depth: usize) -> bool {
    entry.is_dir
        && !entry.name.starts_with('.')
        && entry.name != "node_modules"
        && !(depth == 0 && entry.name == "api")
}

fn is_pages_module(entry: &DirEntry) -> bool {
    let stem = entry.stem();
    has_page_ext(entry)
        && !stem.starts_with('_')
        && !stem.ends_with(".d")
        && !stem.ends_with(".test")
        && !stem.ends_with(".spec")
}

fn app_root_of(path: &str) -> Option<&'static str> {
    APP_ROOTS.iter().copied().find(|root| paths::is_within(path, root))
}

fn pages_root_of(path: &str) -> Option<&'static str> {
    PAGES_ROOTS.iter().copied().find(|root| paths::is_within(path, root))
}

fn has_page_extension(path: &str) -> bool {
    paths::extension(path).is_some_and(|x| PAGE_EXTENSIONS.contains(&x))
}

impl FrameworkAdapter for NextJsAdapter {
    fn name(&self) -> &'static str {
        "nextjs"
    }

    fn display_name(&self) -> &'static str {
        "Next.js"
    }

    fn page_extensions(&self) -> &'static [&'static str] {
        PAGE_EXTENSIONS
    }

    fn import_aliases(&self) -> AliasTable {
        ALIASES
    }

    fn routes_directory(&self) -> &'static str {
        APP_ROOTS[0]
    }

    fn is_route_file(&self, path: &str) -> bool {
        if !has_page_extension(path) {
            return false;
        }
        if app_root_of(path).is_some() {
            return APP_ROUTE_STEMS.contains(&paths::file_stem(path));
        }
        match pages_root_of(path) {
            Some(root) => {
                !paths::file_stem(path).starts_with('_') && !paths::is_within(path, &paths::join(root, "api"))
            }
            None => false,
        }
    }

    fn is_layout_file(&self, path: &str) -> bool {
        if !has_page_extension(path) {
            return false;
        }
        let stem = paths::file_stem(path);
        if app_root_of(path).is_some() {
            return APP_LAYOUT_STEMS.contains(&stem);
        }
        match pages_root_of(path) {
            Some(root) => paths::parent(path) == root && matches!(stem, "_app" | "_document"),
            None => false,
        }
    }

    fn login_candidates(&self, pattern: &str) -> Result<Vec<String>, PathError> {
        let mut out = Vec::new();
        for root in APP_ROOTS {
            for group in LOGIN_GROUPS {
                let dir = paths::safe_join_all(root, &[*group, pattern])?;
                out.extend(LOGIN_EXTENSIONS.iter().map(|ext| format!("{dir}/page.{ext}")));
            }
        }
        for root in PAGES_ROOTS {
            let base = paths::safe_join(root, pattern)?;
            out.extend(LOGIN_EXTENSIONS.iter().map(|ext| format!("{base}.{ext}")));
            out.extend(LOGIN_EXTENSIONS.iter().map(|ext| format!("{base}/index.{ext}")));
        }
        Ok(out)
    }

    fn structural_matches(&self, file: &str, routes: &[Route]) -> Vec<RouteMatch> {
        let Some(root) = pages_root_of(file) else {
            return defaults::structural_matches(self, file, routes);
        };
        // File-per-route: sharing a directory does not make files related.
        let mut out = MatchCollector::new();
        if self.is_layout_file(file) {
            out.within(root, routes, ImpactReason::Layout);
        } else if self.is_route_file(file) {
            out.owned(file, routes, ImpactReason::Direct);
        }
        out.into_matches()
    }

    async fn detect<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<FrameworkDetectionResult> {
        let source = ctx.file_source;
        let manifest = PackageManifest::load(source).await?;
        let app = self.app_root(ctx).await?;
        let pages = self.pages_root(ctx).await?;

        let mut indicators = Vec::new();
        if defaults::first_existing(source, CONFIG_FILES, ctx.concurrency()).await?.is_some() {
            indicators.push("next.config present");
        }
        if app.is_some() || pages.is_some() {
            indicators.push("app or pages directory");
        }
        if manifest.has("next") {
            indicators.push("next dependency");
        }

        let router = match (app, pages) {
            (Some(_), Some(_)) => RouterType::Hybrid,
            (None, Some(_)) => RouterType::Pages,
            _ => RouterType::App,
        };
        Ok(FrameworkDetectionResult::from_indicators(self.name(), &indicators)
            .with_router_type(router)
            .with_version(manifest.version("next")))
    }

    async fn discover_routes<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Vec<Route>> {
        let mut routes = Vec::new();
        if let Some(root) = self.app_root(ctx).await? {
            routes.extend(self.discover_app(ctx, root).await?);
        }
        if let Some(root) = self.pages_root(ctx).await? {
            routes.extend(self.discover_pages(ctx, root).await?);
        }
        tracing::debug!(count = routes.len(), "next.js routes discovered");
        Ok(defaults::finalize_routes(routes))
    }
}
