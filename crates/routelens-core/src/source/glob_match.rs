//! Glob matching over project-relative paths, plus subtree pruning.

use glob::{MatchOptions, Pattern, PatternError};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob with per-component patterns for pruning directory walks.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    full: Pattern,
    components: Vec<Component>,
}

#[derive(Debug, Clone)]
enum Component {
    AnyDepth,
    Segment(Pattern),
}

impl GlobMatcher {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let pattern = pattern.trim_start_matches("./").trim_start_matches('/');
        let full = Pattern::new(pattern)?;
        let components = pattern
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| {
                if c == "**" {
                    Ok(Component::AnyDepth)
                } else {
                    Pattern::new(c).map(Component::Segment)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { full, components })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.full.matches_with(path, OPTIONS)
    }

    /// Could any file underneath directory `dir` match this glob?
    pub fn could_match_under(&self, dir: &str) -> bool {
        let parts: Vec<&str> = dir.split('/').filter(|c| !c.is_empty()).collect();
        for (i, part) in parts.iter().enumerate() {
            match self.components.get(i) {
                None => return false,
                Some(Component::AnyDepth) => return true,
                Some(Component::Segment(p)) => {
                    if !p.matches_with(part, OPTIONS) {
                        return false;
                    }
                }
            }
        }
        // A file still needs at least one more component below `dir`.
        self.components.len() > parts.len()
    }

    /// Leading directory components free of glob metacharacters, joined.
    ///
    /// The final component names files, so it never joins the prefix and a
    /// fully literal pattern walks from its parent directory.
    pub fn literal_prefix(&self) -> String {
        let components: Vec<&str> = self.full.as_str().split('/').collect();
        let dirs = &components[..components.len().saturating_sub(1)];
        dirs.iter()
            .take_while(|c| !c.contains(['*', '?', '[', ']', '{', '}']))
            .copied()
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prunes_unrelated_subtrees() {
        let g = GlobMatcher::new("src/routes/**/+page.svelte").unwrap();
        assert!(g.could_match_under("src"));
        assert!(g.could_match_under("src/routes/blog/deep"));
        assert!(!g.could_match_under("node_modules"));
        assert!(!g.could_match_under("src/lib"));
        assert!(g.matches("src/routes/blog/+page.svelte"));
        assert!(g.matches("src/routes/+page.svelte"));
    }

    #[test]
    fn fixed_depth_patterns_stop_descending() {
        let g = GlobMatcher::new("app/*/page.tsx").unwrap();
        assert!(g.could_match_under("app/dashboard"));
        assert!(!g.could_match_under("app/dashboard/settings"));
        assert_eq!(g.literal_prefix(), "app");
    }

    #[test]
    fn literal_patterns_walk_from_their_parent() {
        assert_eq!(GlobMatcher::new("package.json").unwrap().literal_prefix(), "");
        assert_eq!(GlobMatcher::new("src/main.ts").unwrap().literal_prefix(), "src");
        assert_eq!(GlobMatcher::new("src/*.ts").unwrap().literal_prefix(), "src");
    }
}
