//! Source-tree scanning configuration (import graph + discovery fan-out).

use serde::{Deserialize, Serialize};

/// File extensions the import graph considers source code.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "svelte", "vue",
];

/// Dependency and build-output directories never scanned.
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".svelte-kit",
    ".next",
    ".nuxt",
    ".output",
    "coverage",
    "vendor",
];

/// A user-declared import alias, e.g. `@components/` → `src/components/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    pub prefix: String,
    pub target: String,
}

/// Configuration for the import-graph scanner and discovery I/O.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Source extensions (without dot). Default: [`DEFAULT_SOURCE_EXTENSIONS`].
    pub source_extensions: Option<Vec<String>>,
    /// Additional directory names to skip beyond [`DEFAULT_IGNORES`].
    #[serde(default)]
    pub extra_ignore: Vec<String>,
    /// Maximum number of source files fed into the import graph. Default: 20_000.
    pub max_files: Option<usize>,
    /// Maximum directory depth walked. Default: 32.
    pub max_depth: Option<usize>,
    /// Concurrent I/O probes per resolution or directory listing. Default: 8.
    pub probe_concurrency: Option<usize>,
    /// Extra import aliases applied after the framework's own.
    #[serde(default)]
    pub aliases: Vec<AliasConfig>,
    /// Read `compilerOptions.paths` from tsconfig/jsconfig. Default: true.
    pub read_tsconfig_paths: Option<bool>,
}

impl ScanConfig {
    pub fn effective_source_extensions(&self) -> Vec<String> {
        match &self.source_extensions {
            Some(exts) if !exts.is_empty() => exts.clone(),
            _ => DEFAULT_SOURCE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Returns true if a directory name must not be descended into.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        name.starts_with('.')
            || DEFAULT_IGNORES.contains(&name)
            || self.extra_ignore.iter().any(|i| i == name)
    }

    pub fn effective_max_files(&self) -> usize {
        self.max_files.unwrap_or(20_000)
    }

    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(32)
    }

    /// Never zero, so a fan-out always makes progress.
    pub fn effective_probe_concurrency(&self) -> usize {
        self.probe_concurrency.unwrap_or(8).max(1)
    }

    pub fn effective_read_tsconfig_paths(&self) -> bool {
        self.read_tsconfig_paths.unwrap_or(true)
    }
}
