//! ChangeImpactMapper: changed files → affected routes.

use routelens_core::{paths, FxHashSet, ImportGraph, Route};

use super::types::ImpactMap;
use crate::frameworks::FrameworkAdapter;

/// Maps a change set onto discovered routes through one adapter's rules.
pub struct ChangeImpactMapper<'a, A: FrameworkAdapter + ?Sized> {
    adapter: &'a A,
}

impl<'a, A: FrameworkAdapter + ?Sized> ChangeImpactMapper<'a, A> {
    pub fn new(adapter: &'a A) -> Self {
        Self { adapter }
    }

    /// Affected routes with per-file evidence. Changed paths are normalized
    /// and deduplicated; a file that matches nothing contributes nothing.
    pub fn map<P: AsRef<str>>(&self, changed: &[P], routes: &[Route], graph: &ImportGraph) -> ImpactMap {
        let mut impact = ImpactMap::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();

        for file in changed {
            let file = paths::normalize(file.as_ref());
            if file.is_empty() || !seen.insert(file.clone()) {
                continue;
            }
            let matches = self.adapter.map_file_to_routes(&file, routes, graph);
            if matches.is_empty() {
                tracing::trace!(file = %file, "change implicates no route");
            }
            for m in matches {
                if let Some(route) = routes.get(m.route) {
                    impact.record(route, &file, m.reason);
                }
            }
        }

        tracing::debug!(
            adapter = self.adapter.name(),
            changed = seen.len(),
            affected = impact.len(),
            "impact mapped"
        );
        impact
    }
}
