//! In-memory FileSource for fixtures and tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{SourceError, SourceResult};
use crate::paths;
use crate::traits::FileSource;

use super::glob_match::GlobMatcher;

/// A project held entirely in memory. Directories are implied by file paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSource {
    files: BTreeMap<String, String>,
    reversed_listing: bool,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(path, content)` pairs.
    pub fn from_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let mut source = Self::new();
        for (path, content) in files {
            source.insert(path.as_ref(), content);
        }
        source
    }

    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// List directory entries in reverse order, to flush out order dependence.
    pub fn with_reversed_listing(mut self, reversed: bool) -> Self {
        self.reversed_listing = reversed;
        self
    }

    pub fn insert(&mut self, path: &str, content: impl Into<String>) {
        self.files.insert(paths::normalize(path), content.into());
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn is_dir_path(&self, path: &str) -> bool {
        path.is_empty() || self.files.keys().any(|f| paths::is_within(f, path) && f != path)
    }
}

impl FileSource for MemoryFileSource {
    fn label(&self) -> String {
        format!("memory:{} files", self.files.len())
    }

    async fn exists(&self, path: &str) -> SourceResult<bool> {
        let path = paths::safe_join("", path)?;
        Ok(self.files.contains_key(&path) || self.is_dir_path(&path))
    }

    async fn read(&self, path: &str) -> SourceResult<String> {
        let path = paths::safe_join("", path)?;
        self.files
            .get(&path)
            .cloned()
            .ok_or(SourceError::NotFound { path })
    }

    async fn readdir(&self, path: &str) -> SourceResult<Vec<String>> {
        let path = paths::safe_join("", path)?;
        if !self.is_dir_path(&path) {
            return Err(SourceError::NotFound { path });
        }
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let names: BTreeSet<&str> = self
            .files
            .keys()
            .filter_map(|f| f.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.split('/').next())
            .collect();
        let mut names: Vec<String> = names.into_iter().map(str::to_string).collect();
        if self.reversed_listing {
            names.reverse();
        }
        Ok(names)
    }

    async fn is_directory(&self, path: &str) -> SourceResult<bool> {
        let path = paths::safe_join("", path)?;
        Ok(!self.files.contains_key(&path) && self.is_dir_path(&path))
    }

    async fn glob(&self, pattern: &str) -> SourceResult<Vec<String>> {
        let matcher = GlobMatcher::new(pattern).map_err(|e| SourceError::Decode {
            path: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(self
            .files
            .keys()
            .filter(|f| matcher.matches(f))
            .cloned()
            .collect())
    }
}
