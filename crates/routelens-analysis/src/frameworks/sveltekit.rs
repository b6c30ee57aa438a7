//! SvelteKit adapter.
//!
//! Every directory under `src/routes` is a URL segment; a directory is a route
//! when it holds `+page.*` or `+server.*`. `(group)` directories add no
//! segment. Layouts (`+layout.*`) cover their directory and everything below.

use routelens_core::errors::PathError;
use routelens_core::{paths, AnalysisResult, FileSource, FrameworkDetectionResult, FxHashSet, Route};

use super::adapter::{AdapterContext, AliasTable, FrameworkAdapter};
use super::defaults::{self, DirEntry};
use super::manifest::PackageManifest;
use super::{scan, segments};

const ROUTES_DIR: &str = "src/routes";

const CONFIG_FILES: &[&str] = &[
    "svelte.config.js",
    "svelte.config.ts",
    "svelte.config.mjs",
    "svelte.config.cjs",
];

const PAGE_EXTENSIONS: &[&str] = &["svelte", "ts", "js"];

const ALIASES: AliasTable = &[("$lib", &["src/lib"])];

const INTERNAL: &[&str] = &["$app", "$env", "$service-worker"];

/// Route groups checked when looking for a login page.
const LOGIN_GROUPS: &[&str] = &["", "(auth)", "(public)"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Module {
    Page,
    PageServer,
    Endpoint,
    Layout,
    Error,
}

fn module_kind(name: &str) -> Option<Module> {
    let ext = paths::extension(name)?;
    if !PAGE_EXTENSIONS.contains(&ext) {
        return None;
    }
    match paths::file_stem(name) {
        "+page" => Some(Module::Page),
        "+page.server" => Some(Module::PageServer),
        "+server" => Some(Module::Endpoint),
        "+layout" | "+layout.server" => Some(Module::Layout),
        "+error" => Some(Module::Error),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SvelteKitAdapter;

impl SvelteKitAdapter {
    pub fn new() -> Self {
        Self
    }
}

struct Frame {
    dir: String,
    segments: Vec<String>,
    group: Option<String>,
    layout: bool,
    auth: bool,
    depth: usize,
}

impl FrameworkAdapter for SvelteKitAdapter {
    fn name(&self) -> &'static str {
        "sveltekit"
    }

    fn display_name(&self) -> &'static str {
        "SvelteKit"
    }

    fn page_extensions(&self) -> &'static [&'static str] {
        PAGE_EXTENSIONS
    }

    fn import_aliases(&self) -> AliasTable {
        ALIASES
    }

    fn internal_aliases(&self) -> &'static [&'static str] {
        INTERNAL
    }

    fn routes_directory(&self) -> &'static str {
        ROUTES_DIR
    }

    fn is_route_file(&self, path: &str) -> bool {
        paths::is_within(path, ROUTES_DIR)
            && matches!(
                module_kind(paths::file_name(path)),
                Some(Module::Page | Module::PageServer | Module::Endpoint | Module::Error)
            )
    }

    fn is_layout_file(&self, path: &str) -> bool {
        paths::is_within(path, ROUTES_DIR) && module_kind(paths::file_name(path)) == Some(Module::Layout)
    }

    fn login_candidates(&self, pattern: &str) -> Result<Vec<String>, PathError> {
        let mut out = Vec::new();
        for group in LOGIN_GROUPS {
            let dir = paths::safe_join_all(ROUTES_DIR, &[*group, pattern])?;
            out.push(paths::join(&dir, "+page.svelte"));
        }
        Ok(out)
    }

    async fn detect<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<FrameworkDetectionResult> {
        let source = ctx.file_source;
        let manifest = PackageManifest::load(source).await?;

        let mut indicators = Vec::new();
        if defaults::first_existing(source, CONFIG_FILES, ctx.concurrency()).await?.is_some() {
            indicators.push("svelte.config present");
        }
        if source.probe_dir(ROUTES_DIR).await? {
            indicators.push("src/routes directory");
        }
        if manifest.has("@sveltejs/kit") {
            indicators.push("@sveltejs/kit dependency");
        }

        Ok(FrameworkDetectionResult::from_indicators(self.name(), &indicators)
            .with_version(manifest.version("@sveltejs/kit")))
    }

    async fn discover_routes<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Vec<Route>> {
        let source = ctx.file_source;
        let max_depth = ctx.scan.effective_max_depth();
        let mut routes = Vec::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack = vec![Frame {
            dir: ROUTES_DIR.to_string(),
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
            let mut servers = Vec::new();
            let mut endpoint = false;
            for entry in entries.iter().filter(|e| !e.is_dir) {
                match module_kind(&entry.name) {
                    Some(Module::Layout) => layouts.push(entry.path.clone()),
                    Some(Module::Page) => pages.push(entry.path.clone()),
                    Some(Module::PageServer) => servers.push(entry.path.clone()),
                    Some(Module::Endpoint) => {
                        endpoint = true;
                        servers.push(entry.path.clone());
                    }
                    Some(Module::Error) | None => {}
                }
            }

            let layout_sources = defaults::read_all(source, &layouts).await?;
            let layout = frame.layout || !layouts.is_empty();
            let auth = frame.auth || layout_sources.iter().any(|(_, c)| scan::has_auth_marker(c));

            if !pages.is_empty() || endpoint {
                let route = build_route(source, &frame, pages, servers, endpoint, layout, auth).await?;
                routes.push(route);
            }

            if frame.depth >= max_depth {
                if entries.iter().any(is_walkable) {
                    tracing::warn!(dir = %frame.dir, max_depth, "route tree deeper than max_depth, not descending");
                }
                continue;
            }
            for entry in entries.iter().rev().filter(|e| is_walkable(e)) {
                let mut child = Frame {
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

        tracing::debug!(count = routes.len(), "sveltekit routes discovered");
        Ok(defaults::finalize_routes(routes))
    }
}

fn is_walkable(entry: &DirEntry) -> bool {
    entry.is_dir && !entry.name.starts_with('.') && entry.name != "node_modules"
}

async fn build_route<S: FileSource>(
    source: &S,
    frame: &Frame,
    pages: Vec<String>,
    servers: Vec<String>,
    endpoint: bool,
    has_layout: bool,
    inherited_auth: bool,
) -> AnalysisResult<Route> {
    let mut route = Route::new(defaults::url_from_segments(&frame.segments), frame.dir.clone());
    route.group = frame.group.clone();
    route.has_layout = has_layout;
    route.has_api_endpoint = endpoint;
    route.is_dynamic = frame.segments.iter().any(|s| s.contains('['));

    let own: Vec<String> = pages.iter().chain(servers.iter()).cloned().collect();
    let mut auth = inherited_auth;
    let mut form = false;
    for (file, content) in defaults::read_all(source, &own).await? {
        auth |= scan::has_auth_marker(&content);
        match paths::file_stem(&file) {
            "+page.server" => route.actions.extend(scan::sveltekit_actions(&content)),
            "+server" => route.api_methods = scan::http_methods(&content),
            _ => {}
        }
        if paths::extension(&file) == Some("svelte") {
            form |= scan::has_form(&content);
        }
    }

    route.is_auth_protected = auth;
    route.has_form_handler = form || !route.actions.is_empty();
    route.page_files = pages;
    route.server_files = servers;
    Ok(route)
}
