//! A discovered, navigable URL pattern and its metadata.

use serde::{Deserialize, Serialize};

/// One navigable URL pattern discovered from a file-based routing convention.
///
/// `path` always starts with `/`, never ends with `/` (except the root), and
/// never contains a parenthesized group segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub path: String,
    /// Project-relative location the route was derived from.
    pub directory: String,
    /// A layout file applies to this route (own directory or an ancestor).
    pub has_layout: bool,
    pub is_auth_protected: bool,
    pub page_files: Vec<String>,
    pub is_dynamic: bool,
    /// Innermost route group, without parentheses.
    pub group: Option<String>,
    pub server_files: Vec<String>,
    /// Named form actions.
    pub actions: Vec<String>,
    /// HTTP methods exported by an endpoint module, upper-case.
    pub api_methods: Vec<String>,
    pub has_form_handler: bool,
    pub has_api_endpoint: bool,
}

impl Route {
    pub fn new(path: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            directory: directory.into(),
            ..Default::default()
        }
    }

    /// True if `file` is one of this route's own page or server modules.
    pub fn owns_file(&self, file: &str) -> bool {
        self.page_files.iter().any(|f| f == file) || self.server_files.iter().any(|f| f == file)
    }

    /// Merge another route with the same `path` into this one.
    ///
    /// File lists are unioned; boolean flags are OR-ed.
    pub fn absorb(&mut self, other: Route) {
        extend_unique(&mut self.page_files, other.page_files);
        extend_unique(&mut self.server_files, other.server_files);
        extend_unique(&mut self.actions, other.actions);
        extend_unique(&mut self.api_methods, other.api_methods);
        self.has_layout |= other.has_layout;
        self.is_auth_protected |= other.is_auth_protected;
        self.is_dynamic |= other.is_dynamic;
        self.has_form_handler |= other.has_form_handler;
        self.has_api_endpoint |= other.has_api_endpoint;
        if self.group.is_none() {
            self.group = other.group;
        }
    }
}

fn extend_unique(into: &mut Vec<String>, from: Vec<String>) {
    for item in from {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_unions_files_without_duplicates() {
        let mut a = Route::new("/blog", "pages/blog");
        a.page_files = vec!["pages/blog.tsx".into()];
        let mut b = Route::new("/blog", "pages/blog");
        b.page_files = vec!["pages/blog.tsx".into(), "pages/blog/index.tsx".into()];
        b.has_form_handler = true;

        a.absorb(b);
        assert_eq!(a.page_files, vec!["pages/blog.tsx", "pages/blog/index.tsx"]);
        assert!(a.has_form_handler);
    }
}
