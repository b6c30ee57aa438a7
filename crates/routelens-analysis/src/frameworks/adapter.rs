//! FrameworkAdapter trait: the capability set every routing convention provides.
//!
//! Discovery, detection and impact mapping are generic over the adapter, and the
//! adapter only ever touches files through the [`AdapterContext`]'s `FileSource`.

use routelens_core::config::ScanConfig;
use routelens_core::errors::PathError;
use routelens_core::source::RepoRef;
use routelens_core::{AnalysisResult, FileSource, FrameworkDetectionResult, ImportGraph, Route};

use super::defaults;
use super::{NextJsAdapter, NuxtAdapter, ReactRouterAdapter, RemixAdapter, SvelteKitAdapter};
use crate::impact::ImpactReason;
use crate::login::{self, LoginPage};

/// Import alias prefixes and the project-relative directories they expand to,
/// tried in order.
pub type AliasTable = &'static [(&'static str, &'static [&'static str])];

/// Everything an adapter needs for one analysis run.
pub struct AdapterContext<'a, S: FileSource> {
    pub file_source: &'a S,
    pub project_root: String,
    pub repo_info: Option<RepoRef>,
    pub scan: ScanConfig,
}

impl<'a, S: FileSource> AdapterContext<'a, S> {
    pub fn new(file_source: &'a S) -> Self {
        Self {
            project_root: file_source.label(),
            file_source,
            repo_info: None,
            scan: ScanConfig::default(),
        }
    }

    pub fn with_scan(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_repo_info(mut self, repo: RepoRef) -> Self {
        self.repo_info = Some(repo);
        self
    }

    pub fn with_project_root(mut self, root: impl Into<String>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Bound on concurrent probes issued for one listing or resolution.
    pub fn concurrency(&self) -> usize {
        self.scan.effective_probe_concurrency()
    }
}

/// A route implicated by one changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    /// Index into the route slice passed to `map_file_to_routes`.
    pub route: usize,
    pub reason: ImpactReason,
}

/// The framework adapter contract.
///
/// Path predicates are pure; everything touching the project is async and
/// goes through the context's file source.
#[allow(async_fn_in_trait)]
pub trait FrameworkAdapter: Send + Sync {
    /// Registry key, e.g. `sveltekit`.
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Extensions (without dot) of files that can define a page.
    fn page_extensions(&self) -> &'static [&'static str];

    fn import_aliases(&self) -> AliasTable;

    /// Virtual module prefixes that never resolve to a project file.
    fn internal_aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Primary routes directory, project-relative.
    fn routes_directory(&self) -> &'static str;

    fn is_route_file(&self, path: &str) -> bool;

    fn is_layout_file(&self, path: &str) -> bool;

    /// Candidate page files for one login URL pattern (e.g. `auth/login`).
    fn login_candidates(&self, pattern: &str) -> Result<Vec<String>, PathError>;

    async fn detect<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<FrameworkDetectionResult>;

    /// Every route, sorted by path, one entry per distinct path.
    async fn discover_routes<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<Vec<Route>>;

    /// Routes `file` implicates by its position in the routing tree alone
    /// (own module, or a layout covering the route).
    fn structural_matches(&self, file: &str, routes: &[Route]) -> Vec<RouteMatch> {
        defaults::structural_matches(self, file, routes)
    }

    fn map_file_to_routes(&self, file: &str, routes: &[Route], graph: &ImportGraph) -> Vec<RouteMatch> {
        defaults::map_file_to_routes(self, file, routes, graph)
    }

    /// Resolve an import specifier written in `from_file` to a project file.
    async fn resolve_import<S: FileSource>(
        &self,
        specifier: &str,
        from_file: &str,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<Option<String>> {
        defaults::resolve_import(self, specifier, from_file, ctx).await
    }

    async fn find_login_pages<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<Vec<LoginPage>> {
        login::find_login_pages(self, ctx).await
    }
}

/// The closed set of built-in adapters.
#[derive(Debug, Clone)]
pub enum Adapter {
    SvelteKit(SvelteKitAdapter),
    NextJs(NextJsAdapter),
    Nuxt(NuxtAdapter),
    Remix(RemixAdapter),
    ReactRouter(ReactRouterAdapter),
}

macro_rules! dispatch {
    ($self:ident, $a:ident => $body:expr) => {
        match $self {
            Adapter::SvelteKit($a) => $body,
            Adapter::NextJs($a) => $body,
            Adapter::Nuxt($a) => $body,
            Adapter::Remix($a) => $body,
            Adapter::ReactRouter($a) => $body,
        }
    };
}

impl FrameworkAdapter for Adapter {
    fn name(&self) -> &'static str {
        dispatch!(self, a => a.name())
    }

    fn display_name(&self) -> &'static str {
        dispatch!(self, a => a.display_name())
    }

    fn page_extensions(&self) -> &'static [&'static str] {
        dispatch!(self, a => a.page_extensions())
    }

    fn import_aliases(&self) -> AliasTable {
        dispatch!(self, a => a.import_aliases())
    }

    fn internal_aliases(&self) -> &'static [&'static str] {
        dispatch!(self, a => a.internal_aliases())
    }

    fn routes_directory(&self) -> &'static str {
        dispatch!(self, a => a.routes_directory())
    }

    fn is_route_file(&self, path: &str) -> bool {
        dispatch!(self, a => a.is_route_file(path))
    }

    fn is_layout_file(&self, path: &str) -> bool {
        dispatch!(self, a => a.is_layout_file(path))
    }

    fn login_candidates(&self, pattern: &str) -> Result<Vec<String>, PathError> {
        dispatch!(self, a => a.login_candidates(pattern))
    }

    async fn detect<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<FrameworkDetectionResult> {
        dispatch!(self, a => a.detect(ctx).await)
    }

    async fn discover_routes<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<Vec<Route>> {
        dispatch!(self, a => a.discover_routes(ctx).await)
    }

    fn structural_matches(&self, file: &str, routes: &[Route]) -> Vec<RouteMatch> {
        dispatch!(self, a => a.structural_matches(file, routes))
    }

    fn map_file_to_routes(&self, file: &str, routes: &[Route], graph: &ImportGraph) -> Vec<RouteMatch> {
        dispatch!(self, a => a.map_file_to_routes(file, routes, graph))
    }

    async fn resolve_import<S: FileSource>(
        &self,
        specifier: &str,
        from_file: &str,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<Option<String>> {
        dispatch!(self, a => a.resolve_import(specifier, from_file, ctx).await)
    }

    async fn find_login_pages<S: FileSource>(
        &self,
        ctx: &AdapterContext<'_, S>,
    ) -> AnalysisResult<Vec<LoginPage>> {
        dispatch!(self, a => a.find_login_pages(ctx).await)
    }
}

impl From<SvelteKitAdapter> for Adapter {
    fn from(a: SvelteKitAdapter) -> Self {
        Self::SvelteKit(a)
    }
}

impl From<NextJsAdapter> for Adapter {
    fn from(a: NextJsAdapter) -> Self {
        Self::NextJs(a)
    }
}

impl From<NuxtAdapter> for Adapter {
    fn from(a: NuxtAdapter) -> Self {
        Self::Nuxt(a)
    }
}

impl From<RemixAdapter> for Adapter {
    fn from(a: RemixAdapter) -> Self {
        Self::Remix(a)
    }
}

impl From<ReactRouterAdapter> for Adapter {
    fn from(a: ReactRouterAdapter) -> Self {
        Self::ReactRouter(a)
    }
}
