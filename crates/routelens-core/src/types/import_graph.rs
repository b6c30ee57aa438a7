//! Forward/reverse static-import graph over project-relative paths.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::collections::FxHashSet;

/// Directed graph: an edge A → B means "A imports B".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportGraph {
    pub imports: BTreeMap<String, BTreeSet<String>>,
    pub imported_by: BTreeMap<String, BTreeSet<String>>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `from` importing `to`. Self-imports are ignored.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        self.imports
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.imported_by
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
    }

    /// Make sure `file` appears as a node even when it imports nothing.
    pub fn add_file(&mut self, file: &str) {
        self.imports.entry(file.to_string()).or_default();
    }

    /// Files that directly import `file`.
    pub fn dependents(&self, file: &str) -> impl Iterator<Item = &str> {
        self.imported_by
            .get(file)
            .into_iter()
            .flat_map(|s| s.iter().map(String::as_str))
    }

    /// Files that `file` directly imports.
    pub fn dependencies(&self, file: &str) -> impl Iterator<Item = &str> {
        self.imports
            .get(file)
            .into_iter()
            .flat_map(|s| s.iter().map(String::as_str))
    }

    /// Every file that transitively imports `file`, in depth-first discovery order.
    ///
    /// Uses an explicit stack and visited-set, so import cycles terminate.
    /// `file` itself is never part of the result.
    pub fn transitive_dependents(&self, file: &str) -> Vec<String> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut stack: Vec<&str> = vec![file];
        let mut result = Vec::new();
        visited.insert(file);

        while let Some(current) = stack.pop() {
            // Reverse so the first dependent (lexically) is popped first.
            let mut next: Vec<&str> = self.dependents(current).collect();
            next.reverse();
            for dependent in next {
                if visited.insert(dependent) {
                    result.push(dependent.to_string());
                    stack.push(dependent);
                }
            }
        }

        result
    }

    pub fn file_count(&self) -> usize {
        let mut files: FxHashSet<&str> = self.imports.keys().map(String::as_str).collect();
        files.extend(self.imported_by.keys().map(String::as_str));
        files.len()
    }

    pub fn edge_count(&self) -> usize {
        self.imports.values().map(BTreeSet::len).sum()
    }
}
