//! ImportGraphBuilder: enumerate source files, extract specifiers, resolve, link.

use std::time::Instant;

use routelens_core::config::ScanConfig;
use routelens_core::{paths, AnalysisResult, FileSource, FxHashMap, FxHashSet, ImportGraph};
use serde_json::Value;

use super::extract::import_specifiers;
use super::resolver::ImportResolver;
use crate::frameworks::defaults;
use crate::frameworks::FrameworkAdapter;

const TSCONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json"];

pub struct ImportGraphBuilder {
    scan: ScanConfig,
    resolver: ImportResolver,
}

impl ImportGraphBuilder {
    /// Builder with only user-configured aliases.
    pub fn new(scan: ScanConfig) -> Self {
        let mut resolver = ImportResolver::new().with_concurrency(scan.effective_probe_concurrency());
        for alias in &scan.aliases {
            resolver.add_alias(&alias.prefix, vec![alias.target.clone()]);
        }
        Self { scan, resolver }
    }

    /// Builder seeded with an adapter's aliases and virtual modules.
    pub fn for_adapter<A: FrameworkAdapter + ?Sized>(adapter: &A, scan: ScanConfig) -> Self {
        let resolver = ImportResolver::for_adapter(adapter, &scan);
        Self { scan, resolver }
    }

    pub fn resolver(&self) -> &ImportResolver {
        &self.resolver
    }

    /// Build the graph for the whole project.
    pub async fn build<S: FileSource>(&self, source: &S) -> AnalysisResult<ImportGraph> {
        let started = Instant::now();

        let mut resolver = self.resolver.clone();
        if self.scan.effective_read_tsconfig_paths() {
            for (prefix, targets) in load_tsconfig_aliases(source).await? {
                resolver.add_alias(&prefix, targets);
            }
        }

        let files = self.collect_source_files(source).await?;
        let known: FxHashSet<String> = files.iter().cloned().collect();
        let mut memo: FxHashMap<(String, String), Option<String>> = FxHashMap::default();
        let mut graph = ImportGraph::new();
        let mut unresolved = 0usize;

        for file in &files {
            graph.add_file(file);
            let Some(content) = source.read_optional(file).await? else {
                continue;
            };
            let dir = paths::parent(file).to_string();

            for spec in import_specifiers(&content) {
                let key = (dir.clone(), spec);
                let resolved = match memo.get(&key) {
                    Some(hit) => hit.clone(),
                    None => {
                        let result = match resolver.resolve(source, &key.1, file, Some(&known)).await {
                            Ok(result) => result,
                            Err(e) => {
                                tracing::warn!(file = %file, specifier = %key.1, error = %e, "import not resolvable");
                                None
                            }
                        };
                        memo.insert(key.clone(), result.clone());
                        result
                    }
                };
                match resolved {
                    Some(target) => graph.add_edge(file, &target),
                    None => unresolved += 1,
                }
            }
        }

        tracing::info!(
            files = graph.file_count(),
            edges = graph.edge_count(),
            unresolved,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "import graph built"
        );
        Ok(graph)
    }

    /// Every source file in the project, sorted, capped at `max_files`.
    pub async fn collect_source_files<S: FileSource>(&self, source: &S) -> AnalysisResult<Vec<String>> {
        let extensions = self.scan.effective_source_extensions();
        let max_files = self.scan.effective_max_files();
        let max_depth = self.scan.effective_max_depth();
        let concurrency = self.scan.effective_probe_concurrency();

        let mut files = Vec::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack: Vec<(String, usize)> = vec![(String::new(), 0)];

        'walk: while let Some((dir, depth)) = stack.pop() {
            if !visited.insert(dir.clone()) {
                continue;
            }
            let entries = defaults::list_dir(source, &dir, concurrency).await?;
            for entry in entries.iter().rev() {
                if entry.is_dir {
                    if depth < max_depth && !self.scan.is_ignored_dir(&entry.name) {
                        stack.push((entry.path.clone(), depth + 1));
                    }
                    continue;
                }
                if entry.extension().is_some_and(|x| extensions.iter().any(|e| e == x)) {
                    if files.len() >= max_files {
                        tracing::warn!(max_files, "source file cap reached, import graph truncated");
                        break 'walk;
                    }
                    files.push(entry.path.clone());
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

/// `compilerOptions.paths` from the first tsconfig/jsconfig found, as
/// (prefix, project-relative targets) pairs.
pub async fn load_tsconfig_aliases<S: FileSource>(source: &S) -> AnalysisResult<Vec<(String, Vec<String>)>> {
    for file in TSCONFIG_FILES {
        let Some(text) = source.read_optional(file).await? else {
            continue;
        };
        let value: Value = match serde_json::from_str(&strip_jsonc(&text)) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(file, error = %e, "unparseable tsconfig, aliases skipped");
                continue;
            }
        };
        return Ok(paths_aliases(&value));
    }
    Ok(Vec::new())
}

fn paths_aliases(config: &Value) -> Vec<(String, Vec<String>)> {
    let options = &config["compilerOptions"];
    let base_url = options["baseUrl"].as_str().unwrap_or(".");
    let base = paths::join_relative("", base_url).unwrap_or_default();
    let Some(entries) = options["paths"].as_object() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (key, targets) in entries {
        let prefix = key.trim_end_matches('*').trim_end_matches('/');
        if prefix.is_empty() {
            continue;
        }
        let targets: Vec<String> = targets
            .as_array()
            .map(|arr| arr.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| paths::join_relative(&base, t.trim_end_matches('*').trim_end_matches('/')))
            .collect();
        if !targets.is_empty() {
            out.push((prefix.to_string(), targets));
        }
    }
    out
}

/// Drop `//` and `/* */` comments and trailing commas outside strings.
fn strip_jsonc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(n) = chars.next() {
                        out.push(n);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => out.push(c),
        }
    }

    // Trailing commas before a closing bracket.
    let mut cleaned = String::with_capacity(out.len());
    let chars: Vec<char> = out.chars().collect();
    let mut in_string = false;
    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if c == '"' && chars.get(i.wrapping_sub(1)) != Some(&'\\') {
                in_string = false;
            }
            cleaned.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        }
        if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        cleaned.push(c);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsconfig_paths_become_aliases() {
        let text = r#"{
  // comment
  "compilerOptions": {
    "baseUrl": ".",
    /* block */
    "paths": { "@/*": ["./src/*"], "@ui/*": ["packages/ui/src/*",], },
  },
}"#;
        let value: Value = serde_json::from_str(&strip_jsonc(text)).unwrap();
        let aliases = paths_aliases(&value);
        assert!(aliases.contains(&("@".to_string(), vec!["src".to_string()])));
        assert!(aliases.contains(&("@ui".to_string(), vec!["packages/ui/src".to_string()])));
    }

    #[test]
    fn comment_markers_inside_strings_survive() {
        let text = r#"{"url": "https://example.com/*x*/"}"#;
        let value: Value = serde_json::from_str(&strip_jsonc(text)).unwrap();
        assert_eq!(value["url"], "https://example.com/*x*/");
    }
}
