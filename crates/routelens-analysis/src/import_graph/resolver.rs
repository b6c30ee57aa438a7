//! Import specifier → project file resolution.
//!
//! Relative specifiers are joined lexically against the importing file's
//! directory; alias prefixes are rewritten; bare package names are dropped.
//! Candidates are probed concurrently but the first hit in candidate order wins.

use futures::stream::{self, StreamExt};
use routelens_core::config::ScanConfig;
use routelens_core::{paths, FileSource, FxHashSet, SourceResult};

use crate::frameworks::FrameworkAdapter;

/// Extensions appended to extension-less specifiers, in probe order.
pub const RESOLVE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "svelte", "vue", "json",
];

/// Directory index files probed after direct candidates.
const INDEX_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "svelte", "vue"];

/// ESM-style `.js` imports that may point at a TypeScript source.
const TS_SUBSTITUTES: &[(&str, &[&str])] = &[
    ("js", &["ts", "tsx"]),
    ("jsx", &["tsx"]),
    ("mjs", &["mts"]),
    ("cjs", &["cts"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Alias {
    prefix: String,
    targets: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportResolver {
    aliases: Vec<Alias>,
    internal: Vec<String>,
    concurrency: usize,
}

impl ImportResolver {
    pub fn new() -> Self {
        Self {
            concurrency: 8,
            ..Default::default()
        }
    }

    /// Resolver seeded with an adapter's aliases plus user-configured ones.
    pub fn for_adapter<A: FrameworkAdapter + ?Sized>(adapter: &A, scan: &ScanConfig) -> Self {
        let mut resolver = Self::new().with_concurrency(scan.effective_probe_concurrency());
        for (prefix, targets) in adapter.import_aliases() {
            resolver.add_alias(prefix, targets.iter().map(|t| t.to_string()).collect());
        }
        for alias in &scan.aliases {
            resolver.add_alias(&alias.prefix, vec![alias.target.clone()]);
        }
        resolver.internal = adapter
            .internal_aliases()
            .iter()
            .map(|p| p.to_string())
            .collect();
        resolver
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Register an alias. `prefix` may carry a trailing `/` or `/*`; targets
    /// are project-relative directories.
    pub fn add_alias(&mut self, prefix: &str, targets: Vec<String>) {
        let prefix = prefix.trim_end_matches('*').trim_end_matches('/').to_string();
        if prefix.is_empty() {
            return;
        }
        let targets: Vec<String> = targets
            .iter()
            .map(|t| paths::normalize(t.trim_end_matches('*')))
            .collect();
        match self.aliases.iter_mut().find(|a| a.prefix == prefix) {
            Some(existing) => {
                for t in targets {
                    if !existing.targets.contains(&t) {
                        existing.targets.push(t);
                    }
                }
            }
            None => self.aliases.push(Alias { prefix, targets }),
        }
        // Longest prefix first so `~~` is tried before `~`.
        self.aliases.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Base paths (without extension probing) a specifier could denote.
    /// Empty for bare package names and framework-internal modules.
    pub fn candidate_bases(&self, specifier: &str, from_file: &str) -> Vec<String> {
        let spec = strip_query(specifier);
        if spec.is_empty() || self.is_internal(spec) {
            return Vec::new();
        }

        if spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../") {
            return paths::join_relative(paths::parent(from_file), spec)
                .into_iter()
                .collect();
        }

        for alias in &self.aliases {
            let rest = if spec == alias.prefix {
                Some("")
            } else {
                spec.strip_prefix(alias.prefix.as_str())
                    .and_then(|r| r.strip_prefix('/'))
            };
            if let Some(rest) = rest {
                return alias
                    .targets
                    .iter()
                    .map(|t| paths::normalize(&paths::join(t, rest)))
                    .collect();
            }
        }

        if spec.starts_with('/') {
            return vec![paths::normalize(spec)];
        }
        Vec::new()
    }

    /// Resolve `specifier` as written in `from_file`.
    ///
    /// `known` is an optional set of files already known to exist; hits there
    /// skip the file source entirely.
    pub async fn resolve<S: FileSource>(
        &self,
        source: &S,
        specifier: &str,
        from_file: &str,
        known: Option<&FxHashSet<String>>,
    ) -> SourceResult<Option<String>> {
        for base in self.candidate_bases(specifier, from_file) {
            if let Some(hit) = self.first_file(source, direct_candidates(&base), known).await? {
                return Ok(Some(hit));
            }
            let index: Vec<String> = INDEX_EXTENSIONS
                .iter()
                .map(|ext| paths::join(&base, &format!("index.{ext}")))
                .collect();
            if let Some(hit) = self.first_file(source, index, known).await? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }

    fn is_internal(&self, spec: &str) -> bool {
        self.internal.iter().any(|p| {
            let p = p.trim_end_matches('/');
            spec == p || spec.strip_prefix(p).is_some_and(|r| r.starts_with('/'))
        })
    }

    async fn first_file<S: FileSource>(
        &self,
        source: &S,
        candidates: Vec<String>,
        known: Option<&FxHashSet<String>>,
    ) -> SourceResult<Option<String>> {
        if let Some(known) = known {
            if let Some(hit) = candidates.iter().find(|c| known.contains(*c)) {
                return Ok(Some(hit.clone()));
            }
        }

        let results: Vec<SourceResult<Option<String>>> = stream::iter(candidates)
            .map(|candidate| async move {
                is_file(source, &candidate)
                    .await
                    .map(|found| found.then_some(candidate))
            })
            .buffered(self.concurrency.max(1))
            .collect()
            .await;

        for result in results {
            if let Some(hit) = result? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}

/// An existing path that is not a directory.
pub async fn is_file<S: FileSource>(source: &S, path: &str) -> SourceResult<bool> {
    if path.is_empty() || !source.probe(path).await? {
        return Ok(false);
    }
    Ok(!source.probe_dir(path).await?)
}

/// `base` itself, `base.<ext>` for every known extension, then TS sources
/// for a `.js`-family specifier.
fn direct_candidates(base: &str) -> Vec<String> {
    let mut out = vec![base.to_string()];
    out.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{base}.{ext}")));
    if let Some(ext) = paths::extension(base) {
        if let Some((_, subs)) = TS_SUBSTITUTES.iter().find(|(js, _)| *js == ext) {
            let stem = paths::strip_extension(base);
            out.extend(subs.iter().map(|ts| format!("{stem}.{ts}")));
        }
    }
    out
}

/// Drop `?raw`, `?url`, `#hash` style suffixes.
fn strip_query(spec: &str) -> &str {
    spec.split(['?', '#']).next().unwrap_or(spec).trim()
}
