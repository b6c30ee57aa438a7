//! Nuxt adapter.
//!
//! File-per-route under `pages/` (or `app/pages/` with the Nuxt 4 layout).
//! `index` collapses, `[id]` → `:id`, `[...slug]` → `:slug*`, `[[opt]]` →
//! `:opt?`. A page `users.vue` next to a `users/` directory is a nested parent
//! that wraps every child route. `layouts/*` and `app.vue` wrap every page.

use std::sync::OnceLock;

use regex::Regex;
use routelens_core::errors::PathError;
use routelens_core::{paths, AnalysisResult, FileSource, FrameworkDetectionResult, FxHashMap, FxHashSet, Route};

use super::adapter::{AdapterContext, AliasTable, FrameworkAdapter, RouteMatch};
use super::defaults::{self, DirEntry, MatchCollector};
use super::manifest::PackageManifest;
use super::segments::{self, DynamicStyle};
use super::scan;
use crate::impact::ImpactReason;

const PAGES_ROOTS: &[&str] = &["pages", "app/pages"];
const LAYOUT_DIRS: &[&str] = &["layouts", "app/layouts"];
const APP_FILES: &[&str] = &["app.vue", "app/app.vue"];

const CONFIG_FILES: &[&str] = &["nuxt.config.ts", "nuxt.config.js", "nuxt.config.mjs"];

const PAGE_EXTENSIONS: &[&str] = &["vue", "tsx", "jsx", "ts", "js", "mjs"];

const ALIASES: AliasTable = &[
    ("~~", &[""]),
    ("@@", &[""]),
    ("~", &["", "app"]),
    ("@", &["", "app"]),
];

const INTERNAL: &[&str] = &[
    "#app",
    "#imports",
    "#components",
    "#build",
    "#internal",
    "#head",
    "#vue-router",
    "#nuxt",
];

fn named_layout_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"definePageMeta\s*\(\s*\{[^}]*\blayout\s*:\s*['"]"#).expect("page meta layout regex"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NuxtAdapter;

impl NuxtAdapter {
    pub fn new() -> Self {
        Self
    }

    async fn pages_root<S: FileSource>(&self, source: &S) -> AnalysisResult<Option<&'static str>> {
        for root in PAGES_ROOTS.iter().copied() {
            if source.probe_dir(root).await? {
                return Ok(Some(root));
            }
        }
        Ok(None)
    }
}

struct Frame {
    dir: String,
    segments: Vec<String>,
    group: Option<String>,
    /// Inside a nested parent page.
    nested: bool,
    auth: bool,
    depth: usize,
}

fn is_page_module(entry: &DirEntry) -> bool {
    !entry.is_dir
        && !entry.name.starts_with('.')
        && entry.extension().is_some_and(|x| PAGE_EXTENSIONS.contains(&x))
}

fn is_walkable(entry: &DirEntry) -> bool {
    entry.is_dir && !entry.name.starts_with('.') && entry.name != "node_modules"
}

fn is_global_layout(path: &str) -> bool {
    APP_FILES.contains(&path)
        || LAYOUT_DIRS
            .iter()
            .any(|dir| paths::parent(path) == *dir && paths::extension(path) == Some("vue"))
}

impl FrameworkAdapter for NuxtAdapter {
    fn name(&self) -> &'static str {
        "nuxt"
    }

    fn display_name(&self) -> &'static str {
        "Nuxt"
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
        PAGES_ROOTS[0]
    }

    fn is_route_file(&self, path: &str) -> bool {
        PAGES_ROOTS.iter().any(|root| paths::is_within(path, root))
            && paths::extension(path).is_some_and(|x| PAGE_EXTENSIONS.contains(&x))
    }

    fn is_layout_file(&self, path: &str) -> bool {
        is_global_layout(path)
    }

    fn login_candidates(&self, pattern: &str) -> Result<Vec<String>, PathError> {
        let mut out = Vec::new();
        for root in PAGES_ROOTS {
            let base = paths::safe_join(root, pattern)?;
            out.push(format!("{base}.vue"));
            out.push(format!("{base}/index.vue"));
        }
        Ok(out)
    }

    fn structural_matches(&self, file: &str, routes: &[Route]) -> Vec<RouteMatch> {
        let mut out = MatchCollector::new();
        if is_global_layout(file) {
            out.all(routes, ImpactReason::Layout);
        } else if self.is_route_file(file) {
            out.owned(file, routes, ImpactReason::Direct);
            // `users.vue` wraps everything under `users/`.
            out.within(paths::strip_extension(file), routes, ImpactReason::Layout);
        }
        out.into_matches()
    }

    async fn detect<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<FrameworkDetectionResult> {
        let source = ctx.file_source;
        let manifest = PackageManifest::load(source).await?;

        let mut indicators = Vec::new();
        if defaults::first_existing(source, CONFIG_FILES, ctx.concurrency()).await?.is_some() {
            indicators.push("nuxt.config present");
        }

        let mut has_pages = defaults::first_existing(source, APP_FILES, ctx.concurrency()).await?.is_some();
        if !has_pages {
            for root in PAGES_ROOTS {
                let entries = defaults::list_dir(source, root, ctx.concurrency()).await?;
                if entries.iter().any(|e| e.extension() == Some("vue")) {
                    has_pages = true;
                    break;
                }
            }
        }
        if has_pages {
            indicators.push("pages directory with .vue files");
        }
        if manifest.has_any(&["nuxt", "nuxt3"]) {
            indicators.push("nuxt dependency");
        }

        Ok(FrameworkDetectionResult::from_indicators(self.name(), &indicators)
            .with_version(manifest.first_version(&["nuxt", "nuxt3"])))
    }

    async fn discover_routes<S: FileSource>(&self, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Vec<Route>> {
        let source = ctx.file_source;
        let Some(root) = self.pages_root(source).await? else {
            return Ok(Vec::new());
        };
        let default_layouts: Vec<String> = LAYOUT_DIRS.iter().map(|d| format!("{d}/default.vue")).collect();
        let global_layout = defaults::first_existing(source, &default_layouts, ctx.concurrency())
            .await?
            .is_some();

        let max_depth = ctx.scan.effective_max_depth();
        let mut routes = Vec::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack = vec![Frame {
            dir: root.to_string(),
            segments: Vec::new(),
            group: None,
            nested: false,
            auth: false,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            if !visited.insert(frame.dir.clone()) {
                continue;
            }
            let entries = defaults::list_dir(source, &frame.dir, ctx.concurrency()).await?;
            let dir_names: FxHashSet<&str> = entries
                .iter()
                .filter(|e| e.is_dir)
                .map(|e| e.name.as_str())
                .collect();
            // Nested parent stem → whether it is auth-protected.
            let mut parents: FxHashMap<String, bool> = FxHashMap::default();

            for entry in entries.iter().filter(|e| is_page_module(e)) {
                let stem = entry.stem();
                let mut url = frame.segments.clone();
                let directory = if stem == "index" {
                    frame.dir.clone()
                } else {
                    url.push(segments::translate_brackets(stem, DynamicStyle::Nuxt));
                    paths::join(&frame.dir, stem)
                };

                let path = defaults::url_from_segments(&url);
                let mut route = Route::new(path, directory);
                route.group = frame.group.clone();
                route.is_dynamic = segments::is_dynamic_path(&route.path);
                let mut named_layout = false;
                let mut auth = frame.auth;
                if let Some(content) = source.read_optional(&entry.path).await? {
                    auth |= scan::has_auth_marker(&content);
                    named_layout = named_layout_re().is_match(&content);
                    route.has_form_handler = scan::has_form(&content);
                }
                route.is_auth_protected = auth;
                route.has_layout = global_layout || frame.nested || named_layout;
                route.page_files = vec![entry.path.clone()];

                if dir_names.contains(stem) {
                    parents.insert(stem.to_string(), auth);
                }
                routes.push(route);
            }

            if frame.depth >= max_depth {
                if entries.iter().any(is_walkable) {
                    tracing::warn!(dir = %frame.dir, max_depth, "route tree deeper than max_depth, not descending");
                }
                continue;
            }
            for entry in entries.iter().rev().filter(|e| is_walkable(e)) {
                let parent_auth = parents.get(&entry.name).copied();
                let mut child = Frame {
                    dir: entry.path.clone(),
                    segments: frame.segments.clone(),
                    group: frame.group.clone(),
                    nested: frame.nested || parent_auth.is_some(),
                    auth: frame.auth || parent_auth.unwrap_or(false),
                    depth: frame.depth + 1,
                };
                match segments::group_name(&entry.name) {
                    Some(group) => child.group = Some(group.to_string()),
                    None => child
                        .segments
                        .push(segments::translate_brackets(&entry.name, DynamicStyle::Nuxt)),
                }
                stack.push(child);
            }
        }

        tracing::debug!(count = routes.len(), "nuxt routes discovered");
        Ok(defaults::finalize_routes(routes))
    }
}
