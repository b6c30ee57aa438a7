//! Impact result types.

use routelens_core::{FxHashMap, Route};
use serde::{Deserialize, Serialize};

/// Why a changed file implicates a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactReason {
    /// The file is one of the route's own page, server or layout modules.
    Direct,
    /// The file is a layout whose scope covers the route.
    Layout,
    /// The route reaches the file through static imports.
    ImportGraph,
}

impl ImpactReason {
    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Layout => "layout",
            Self::ImportGraph => "import-graph",
        }
    }
}

/// One changed file and the reason it implicates a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub file: String,
    pub reason: ImpactReason,
}

/// An affected route and every piece of evidence against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedRoute {
    pub route: Route,
    pub evidence: Vec<Evidence>,
}

/// Affected routes keyed by URL path, in first-implicated order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImpactMap {
    entries: Vec<AffectedRoute>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl ImpactMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `file` against `route`. The first reason recorded for a
    /// (route, file) pair wins; later ones are ignored.
    pub fn record(&mut self, route: &Route, file: &str, reason: ImpactReason) {
        let idx = match self.index.get(&route.path) {
            Some(&idx) => idx,
            None => {
                self.entries.push(AffectedRoute {
                    route: route.clone(),
                    evidence: Vec::new(),
                });
                let idx = self.entries.len() - 1;
                self.index.insert(route.path.clone(), idx);
                idx
            }
        };
        let evidence = &mut self.entries[idx].evidence;
        if evidence.iter().any(|e| e.file == file) {
            return;
        }
        evidence.push(Evidence {
            file: file.to_string(),
            reason,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&AffectedRoute> {
        self.index.get(path).map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AffectedRoute> {
        self.entries.iter()
    }

    /// Affected URL paths, in first-implicated order.
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.route.path.as_str()).collect()
    }

    /// Changed files implicating `path`.
    pub fn files_for(&self, path: &str) -> Vec<&str> {
        self.get(path)
            .map(|e| e.evidence.iter().map(|ev| ev.file.as_str()).collect())
            .unwrap_or_default()
    }

    /// The distinct reasons implicating `path`, sorted.
    pub fn distinct_reasons(&self, path: &str) -> Vec<ImpactReason> {
        let mut reasons: Vec<ImpactReason> = self
            .get(path)
            .map(|e| e.evidence.iter().map(|ev| ev.reason).collect())
            .unwrap_or_default();
        reasons.sort();
        reasons.dedup();
        reasons
    }

    /// Look up the reason recorded for one (route, file) pair.
    pub fn reason_for(&self, path: &str, file: &str) -> Option<ImpactReason> {
        self.get(path)?
            .evidence
            .iter()
            .find(|e| e.file == file)
            .map(|e| e.reason)
    }
}
