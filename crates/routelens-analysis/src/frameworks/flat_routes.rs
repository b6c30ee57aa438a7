//! Dot-delimited flat-file routing shared by Remix and React Router.
//!
//! Every file directly under `app/routes` (or `route.*` inside a direct
//! subfolder) is a route module. Its name splits on `.` into URL segments.
//! A module `a` is the layout of every module named `a.*`, and `app/root.*`
//! wraps everything.

use routelens_core::errors::PathError;
use routelens_core::{paths, AnalysisResult, FileSource, Route};

use super::adapter::{AdapterContext, RouteMatch};
use super::defaults::{self, MatchCollector};
use super::scan;
use super::segments::{self, DynamicStyle};
use crate::impact::ImpactReason;

pub const ROUTES_DIR: &str = "app/routes";

pub const ROOT_FILES: &[&str] = &["app/root.tsx", "app/root.jsx", "app/root.ts", "app/root.js"];

pub const ROUTE_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js", "mdx", "md"];

/// Module file names inside a folder route, in preference order.
const FOLDER_MODULES: &[&str] = &["route", "index"];

const LOGIN_EXTENSIONS: &[&str] = &["tsx", "jsx", "js"];

/// One route module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatModule {
    /// Dot-delimited module name (`blog.$slug`).
    pub name: String,
    pub file: String,
    /// `app/routes/<name>`.
    pub directory: String,
}

/// Split a module name into raw segments: `.` separates, `_.` is an escaped
/// literal dot, and dots inside brackets (`[.]`) never separate.
pub fn split_module_name(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '[' => {
                depth += 1;
                buf.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                buf.push(c);
            }
            '.' if depth == 0 => {
                if buf.len() > 1 && buf.ends_with('_') {
                    buf.pop();
                    buf.push('.');
                } else {
                    out.push(std::mem::take(&mut buf));
                }
            }
            _ => buf.push(c),
        }
    }
    out.push(buf);
    out.retain(|s| !s.is_empty());
    out
}

/// True for `_x` segments other than `_index`.
pub fn is_pathless(raw: &str) -> bool {
    raw.starts_with('_') && raw != "_index"
}

/// URL segment for one raw segment; `None` for index and pathless segments.
pub fn translate_segment(raw: &str) -> Option<String> {
    if raw == "_index" || is_pathless(raw) {
        return None;
    }
    let raw = match raw.strip_suffix('_') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => raw,
    };
    if raw == "$" {
        return Some("*".to_string());
    }
    if let Some(inner) = raw.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        return Some(match inner.strip_prefix('$') {
            Some(param) => format!(":{param}?"),
            None => format!("{inner}?"),
        });
    }
    if let Some(param) = raw.strip_prefix('$') {
        return Some(format!(":{param}"));
    }
    Some(segments::translate_brackets(raw, DynamicStyle::Colon))
}

/// URL path for a module name.
pub fn module_url(name: &str) -> String {
    defaults::url_from_segments(split_module_name(name).iter().filter_map(|s| translate_segment(s)))
}

/// Module name if `path` is a route module file.
pub fn module_name_of(path: &str) -> Option<&str> {
    let ext = paths::extension(path)?;
    if !ROUTE_EXTENSIONS.contains(&ext) {
        return None;
    }
    let parent = paths::parent(path);
    if parent == ROUTES_DIR {
        return Some(paths::file_stem(path));
    }
    if paths::parent(parent) == ROUTES_DIR && FOLDER_MODULES.contains(&paths::file_stem(path)) {
        return Some(paths::file_name(parent));
    }
    None
}

fn is_pathless_module(name: &str) -> bool {
    split_module_name(name).last().is_some_and(|s| is_pathless(s))
}

pub fn is_root_file(path: &str) -> bool {
    ROOT_FILES.contains(&path)
}

pub fn is_route_file(path: &str) -> bool {
    module_name_of(path).is_some_and(|name| !is_pathless_module(name))
}

pub fn is_layout_file(path: &str) -> bool {
    is_root_file(path) || module_name_of(path).is_some_and(is_pathless_module)
}

/// `a` is an ancestor of `a.b` and `a.b.c`.
fn is_ancestor(parent: &str, child: &str) -> bool {
    child.len() > parent.len() && child.starts_with(parent) && child.as_bytes()[parent.len()] == b'.'
}

pub fn login_candidates(pattern: &str) -> Result<Vec<String>, PathError> {
    // Validates the raw pattern before it is flattened.
    paths::safe_join(ROUTES_DIR, pattern)?;
    let name = pattern.trim_matches('/').replace('/', ".");
    let mut out = Vec::new();
    for ext in LOGIN_EXTENSIONS {
        out.push(paths::safe_join(ROUTES_DIR, &format!("{name}.{ext}"))?);
        out.push(paths::safe_join(ROUTES_DIR, &format!("_auth.{name}.{ext}"))?);
        out.push(paths::safe_join_all(ROUTES_DIR, &[name.as_str(), format!("route.{ext}").as_str()])?);
    }
    Ok(out)
}

/// `app/routes` exists or a root module does.
pub async fn has_route_tree<S: FileSource>(source: &S, concurrency: usize) -> AnalysisResult<bool> {
    if source.probe_dir(ROUTES_DIR).await? {
        return Ok(true);
    }
    Ok(defaults::first_existing(source, ROOT_FILES, concurrency).await?.is_some())
}

/// Enumerate route modules in name order.
pub async fn modules<S: FileSource>(source: &S, concurrency: usize) -> AnalysisResult<Vec<FlatModule>> {
    let entries = defaults::list_dir(source, ROUTES_DIR, concurrency).await?;
    let mut out = Vec::new();
    for entry in entries {
        if entry.name.starts_with('.') || entry.name == "node_modules" {
            continue;
        }
        if entry.is_dir {
            let candidates: Vec<String> = FOLDER_MODULES
                .iter()
                .flat_map(|stem| ROUTE_EXTENSIONS.iter().map(move |ext| format!("{stem}.{ext}")))
                .map(|file| paths::join(&entry.path, &file))
                .collect();
            if let Some(file) = defaults::first_existing(source, &candidates, concurrency).await? {
                out.push(FlatModule {
                    name: entry.name.clone(),
                    file,
                    directory: entry.path.clone(),
                });
            }
            continue;
        }
        let stem = entry.stem();
        let routable = entry.extension().is_some_and(|x| ROUTE_EXTENSIONS.contains(&x))
            && !stem.ends_with(".test")
            && !stem.ends_with(".spec")
            && !stem.ends_with(".d");
        if routable {
            out.push(FlatModule {
                name: stem.to_string(),
                file: entry.path.clone(),
                directory: paths::strip_extension(&entry.path).to_string(),
            });
        }
    }
    Ok(out)
}

/// Discover every route in the flat tree.
pub async fn discover<S: FileSource>(ctx: &AdapterContext<'_, S>, framework: &str) -> AnalysisResult<Vec<Route>> {
    let source = ctx.file_source;
    let n = ctx.concurrency();
    let root = defaults::first_existing(source, ROOT_FILES, n).await?;
    let root_auth = match &root {
        Some(file) => source
            .read_optional(file)
            .await?
            .is_some_and(|c| scan::has_auth_marker(&c)),
        None => false,
    };

    let modules = modules(source, n).await?;
    let files: Vec<String> = modules.iter().map(|m| m.file.clone()).collect();
    let contents = defaults::read_all(source, &files).await?;

    let mut routes = Vec::new();
    for module in &modules {
        if is_pathless_module(&module.name) {
            continue;
        }
        let content = content_of(&contents, &module.file);
        let ancestors: Vec<&FlatModule> = modules.iter().filter(|m| is_ancestor(&m.name, &module.name)).collect();

        let mut route = Route::new(module_url(&module.name), module.directory.clone());
        route.is_dynamic = segments::is_dynamic_path(&route.path);
        route.has_layout = root.is_some() || !ancestors.is_empty();
        route.is_auth_protected = root_auth
            || scan::has_auth_marker(content)
            || ancestors.iter().any(|a| scan::has_auth_marker(content_of(&contents, &a.file)));

        let action = scan::exports_action(content);
        let loader = scan::exports_loader(content);
        if action {
            route.actions.push("action".to_string());
        }
        route.has_form_handler = action || scan::has_form(content);

        // A module without a default export is a resource route.
        if !content.is_empty() && !scan::exports_default(content) && (loader || action) {
            route.has_api_endpoint = true;
            if loader {
                route.api_methods.push("GET".to_string());
            }
            if action {
                route.api_methods.push("POST".to_string());
            }
            route.server_files.push(module.file.clone());
        } else {
            route.page_files.push(module.file.clone());
        }
        routes.push(route);
    }

    tracing::debug!(framework, count = routes.len(), "flat routes discovered");
    Ok(defaults::finalize_routes(routes))
}

fn content_of<'a>(contents: &'a [(String, String)], file: &str) -> &'a str {
    contents
        .iter()
        .find(|(f, _)| f == file)
        .map(|(_, c)| c.as_str())
        .unwrap_or("")
}

/// Direct, root-layout and parent-module rules.
pub fn structural_matches(file: &str, routes: &[Route]) -> Vec<RouteMatch> {
    let mut out = MatchCollector::new();
    if is_root_file(file) {
        out.all(routes, ImpactReason::Layout);
        return out.into_matches();
    }
    out.owned(file, routes, ImpactReason::Direct);
    if let Some(name) = module_name_of(file) {
        for (idx, route) in routes.iter().enumerate() {
            if is_ancestor(name, paths::file_name(&route.directory)) {
                out.push(idx, ImpactReason::Layout);
            }
        }
    }
    out.into_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_names_translate_to_urls() {
        assert_eq!(module_url("_index"), "/");
        assert_eq!(module_url("blog.$slug"), "/blog/:slug");
        assert_eq!(module_url("blog._index"), "/blog");
        assert_eq!(module_url("_auth.login"), "/login");
        assert_eq!(module_url("files.$"), "/files/*");
        assert_eq!(module_url("($lang).about"), "/:lang?/about");
        assert_eq!(module_url("sitemap[.]xml"), "/sitemap.xml");
        assert_eq!(module_url("concerts_.mine"), "/concerts.mine");
        assert_eq!(module_url("users.$id.edit_"), "/users/:id/edit");
    }

    #[test]
    fn module_name_of_files_and_folders() {
        assert_eq!(module_name_of("app/routes/blog.$slug.tsx"), Some("blog.$slug"));
        assert_eq!(module_name_of("app/routes/blog.$slug/route.tsx"), Some("blog.$slug"));
        assert_eq!(module_name_of("app/routes/blog.$slug/Comments.tsx"), None);
        assert_eq!(module_name_of("app/components/Nav.tsx"), None);
    }

    #[test]
    fn ancestry_is_segment_aligned() {
        assert!(is_ancestor("blog", "blog.$slug"));
        assert!(!is_ancestor("blog", "blogs.$id"));
        assert!(!is_ancestor("blog", "blog"));
    }

    #[test]
    fn pathless_modules_are_layouts() {
        assert!(is_layout_file("app/routes/_auth.tsx"));
        assert!(!is_route_file("app/routes/_auth.tsx"));
        assert!(is_route_file("app/routes/_index.tsx"));
        assert!(is_layout_file("app/root.tsx"));
    }

    #[test]
    fn login_pattern_with_traversal_is_rejected() {
        assert!(login_candidates("../secrets").is_err());
        let c = login_candidates("auth/login").unwrap();
        assert!(c.contains(&"app/routes/auth.login.tsx".to_string()));
    }
}
