//! Behaviour shared by every adapter unless it overrides it.

use futures::stream::{self, StreamExt};
use routelens_core::{paths, AnalysisResult, FileSource, FxHashSet, ImportGraph, Route, SourceResult};

use super::adapter::{AdapterContext, FrameworkAdapter, RouteMatch};
use crate::impact::ImpactReason;
use crate::import_graph::resolver::{self, ImportResolver};

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn stem(&self) -> &str {
        paths::file_stem(&self.name)
    }

    pub fn extension(&self) -> Option<&str> {
        paths::extension(&self.name)
    }
}

/// List `dir`, classifying each child with bounded concurrency.
///
/// Entries come back sorted by name regardless of backend order. A missing or
/// unreadable directory yields an empty listing; path errors propagate.
pub async fn list_dir<S: FileSource>(source: &S, dir: &str, concurrency: usize) -> AnalysisResult<Vec<DirEntry>> {
    let mut names = match source.readdir(dir).await {
        Ok(names) => names,
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            tracing::debug!(dir, error = %e, "directory not listable, skipping");
            return Ok(Vec::new());
        }
    };
    names.sort();
    names.dedup();

    let classified: Vec<SourceResult<DirEntry>> = stream::iter(names)
        .map(|name| async move {
            let path = paths::join(dir, &name);
            let is_dir = source.probe_dir(&path).await;
            is_dir.map(|is_dir| DirEntry { name, path, is_dir })
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    classified
        .into_iter()
        .collect::<SourceResult<Vec<_>>>()
        .map_err(Into::into)
}

/// The first candidate (in order) that exists as a file.
pub async fn first_existing<S, T>(source: &S, candidates: &[T], concurrency: usize) -> AnalysisResult<Option<String>>
where
    S: FileSource,
    T: AsRef<str>,
{
    let found: Vec<SourceResult<bool>> = stream::iter(candidates.iter())
        .map(|c| resolver::is_file(source, c.as_ref()))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    for (candidate, hit) in candidates.iter().zip(found) {
        if hit? {
            return Ok(Some(candidate.as_ref().to_string()));
        }
    }
    Ok(None)
}

/// Every candidate that exists as a file, in candidate order.
pub async fn existing_files<S, T>(source: &S, candidates: &[T], concurrency: usize) -> AnalysisResult<Vec<String>>
where
    S: FileSource,
    T: AsRef<str>,
{
    let found: Vec<SourceResult<bool>> = stream::iter(candidates.iter())
        .map(|c| resolver::is_file(source, c.as_ref()))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut out = Vec::new();
    for (candidate, hit) in candidates.iter().zip(found) {
        if hit? {
            out.push(candidate.as_ref().to_string());
        }
    }
    Ok(out)
}

/// Read every path that exists, in order, skipping missing ones.
pub async fn read_all<S: FileSource>(source: &S, files: &[String]) -> AnalysisResult<Vec<(String, String)>> {
    let mut out = Vec::with_capacity(files.len());
    for file in files {
        if let Some(content) = source.read_optional(file).await? {
            out.push((file.clone(), content));
        }
    }
    Ok(out)
}

/// Join URL segments into a route path; empty segments are dropped.
pub fn url_from_segments<I, T>(segments: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let parts: Vec<String> = segments
        .into_iter()
        .filter(|s| !s.as_ref().is_empty())
        .map(|s| s.as_ref().to_string())
        .collect();
    format!("/{}", parts.join("/"))
}

/// Sort by path and merge routes sharing a path.
pub fn finalize_routes(mut routes: Vec<Route>) -> Vec<Route> {
    routes.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.directory.cmp(&b.directory)));
    let mut out: Vec<Route> = Vec::with_capacity(routes.len());
    for route in routes {
        match out.last_mut() {
            Some(last) if last.path == route.path => last.absorb(route),
            _ => out.push(route),
        }
    }
    out
}

// ─── Impact rules ────────────────────────────────────────────────────────

/// Accumulates matches, keeping only the first reason per route.
#[derive(Debug, Default)]
pub struct MatchCollector {
    matches: Vec<RouteMatch>,
    seen: FxHashSet<usize>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, route: usize, reason: ImpactReason) {
        if self.seen.insert(route) {
            self.matches.push(RouteMatch { route, reason });
        }
    }

    /// Routes that list `file` among their own modules.
    pub fn owned(&mut self, file: &str, routes: &[Route], reason: ImpactReason) {
        for (idx, route) in routes.iter().enumerate() {
            if route.owns_file(file) {
                self.push(idx, reason);
            }
        }
    }

    /// Routes that own `file` or live in its directory.
    pub fn same_directory(&mut self, file: &str, routes: &[Route], reason: ImpactReason) {
        let dir = paths::parent(file);
        for (idx, route) in routes.iter().enumerate() {
            if route.owns_file(file) || route.directory == dir {
                self.push(idx, reason);
            }
        }
    }

    /// Routes whose directory is `dir` or lies underneath it.
    pub fn within(&mut self, dir: &str, routes: &[Route], reason: ImpactReason) {
        for (idx, route) in routes.iter().enumerate() {
            if paths::is_within(&route.directory, dir) {
                self.push(idx, reason);
            }
        }
    }

    pub fn all(&mut self, routes: &[Route], reason: ImpactReason) {
        for idx in 0..routes.len() {
            self.push(idx, reason);
        }
    }

    pub fn extend(&mut self, other: Vec<RouteMatch>, reason: ImpactReason) {
        for m in other {
            self.push(m.route, reason);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn into_matches(self) -> Vec<RouteMatch> {
        self.matches
    }
}

/// Direct and layout rules for directory-per-route conventions.
pub fn structural_matches<A: FrameworkAdapter + ?Sized>(adapter: &A, file: &str, routes: &[Route]) -> Vec<RouteMatch> {
    let mut out = MatchCollector::new();
    let is_layout = adapter.is_layout_file(file);
    if is_layout || adapter.is_route_file(file) {
        out.same_directory(file, routes, ImpactReason::Direct);
    }
    if is_layout {
        out.within(paths::parent(file), routes, ImpactReason::Layout);
    }
    out.into_matches()
}

/// Structural rules first; only when they implicate nothing, every route
/// that transitively imports the file.
pub fn map_file_to_routes<A: FrameworkAdapter + ?Sized>(
    adapter: &A,
    file: &str,
    routes: &[Route],
    graph: &ImportGraph,
) -> Vec<RouteMatch> {
    let file = paths::normalize(file);
    let structural = adapter.structural_matches(&file, routes);
    if !structural.is_empty() {
        return structural;
    }

    let mut out = MatchCollector::new();
    for dependent in graph.transitive_dependents(&file) {
        if adapter.is_route_file(&dependent) || adapter.is_layout_file(&dependent) {
            out.extend(adapter.structural_matches(&dependent, routes), ImpactReason::ImportGraph);
            continue;
        }
        // Colocated helper: the nearest enclosing route directory owns it.
        if let Some(idx) = enclosing_route(&dependent, routes) {
            out.push(idx, ImpactReason::ImportGraph);
        }
    }
    out.into_matches()
}

fn enclosing_route(file: &str, routes: &[Route]) -> Option<usize> {
    let mut dir = paths::parent(file);
    while !dir.is_empty() {
        if let Some(idx) = routes.iter().position(|r| r.directory == dir) {
            return Some(idx);
        }
        dir = paths::parent(dir);
    }
    None
}

pub async fn resolve_import<A, S>(
    adapter: &A,
    specifier: &str,
    from_file: &str,
    ctx: &AdapterContext<'_, S>,
) -> AnalysisResult<Option<String>>
where
    A: FrameworkAdapter + ?Sized,
    S: FileSource,
{
    let resolver = ImportResolver::for_adapter(adapter, &ctx.scan);
    let from_file = paths::normalize(from_file);
    Ok(resolver
        .resolve(ctx.file_source, specifier, &from_file, None)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_from_segments_handles_root() {
        assert_eq!(url_from_segments(Vec::<String>::new()), "/");
        assert_eq!(url_from_segments(["blog", "", "[slug]"]), "/blog/[slug]");
    }

    #[test]
    fn finalize_merges_same_path() {
        let mut a = Route::new("/users", "pages/users");
        a.page_files = vec!["pages/users/index.vue".into()];
        let mut b = Route::new("/users", "pages/users");
        b.page_files = vec!["pages/users.vue".into()];
        let c = Route::new("/", "pages");

        let out = finalize_routes(vec![a, c, b]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].path, "/");
        assert_eq!(out[1].page_files.len(), 2);
    }

    #[test]
    fn nested_helper_belongs_to_nearest_route() {
        let routes = vec![Route::new("/", "src/routes"), Route::new("/blog", "src/routes/blog")];
        assert_eq!(enclosing_route("src/routes/blog/parts/Toc.svelte", &routes), Some(1));
        assert_eq!(enclosing_route("src/routes/Nav.svelte", &routes), Some(0));
        assert_eq!(enclosing_route("src/lib/Button.svelte", &routes), None);
    }
}
