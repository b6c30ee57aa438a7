//! Local-disk FileSource backed by `tokio::fs`.

use std::path::{Path, PathBuf};

use crate::config::scan_config::DEFAULT_IGNORES;
use crate::errors::{SourceError, SourceResult};
use crate::paths;
use crate::traits::FileSource;

use super::glob_match::GlobMatcher;

/// Files under a directory on the local machine.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    root: PathBuf,
}

impl LocalFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a project-relative path onto disk, refusing to leave the root.
    fn resolve(&self, path: &str) -> SourceResult<PathBuf> {
        let rel = paths::safe_join("", path)?;
        Ok(if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        })
    }
}

impl FileSource for LocalFileSource {
    fn label(&self) -> String {
        format!("local:{}", self.root.display())
    }

    async fn exists(&self, path: &str) -> SourceResult<bool> {
        let full = self.resolve(path)?;
        tokio::fs::try_exists(&full)
            .await
            .map_err(|e| SourceError::io(path, e))
    }

    async fn read(&self, path: &str) -> SourceResult<String> {
        let full = self.resolve(path)?;
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| SourceError::io(path, e))
    }

    async fn readdir(&self, path: &str) -> SourceResult<Vec<String>> {
        let full = self.resolve(path)?;
        let mut entries = tokio::fs::read_dir(&full)
            .await
            .map_err(|e| SourceError::io(path, e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SourceError::io(path, e))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn is_directory(&self, path: &str) -> SourceResult<bool> {
        let full = self.resolve(path)?;
        match tokio::fs::metadata(&full).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SourceError::io(path, e)),
        }
    }

    /// Walks with the `ignore` crate on the blocking pool.
    ///
    /// Hidden entries, `.gitignore`d paths and dependency directories never match.
    async fn glob(&self, pattern: &str) -> SourceResult<Vec<String>> {
        let matcher = GlobMatcher::new(pattern).map_err(|e| SourceError::Decode {
            path: pattern.to_string(),
            message: e.to_string(),
        })?;
        let start = self.resolve(&matcher.literal_prefix())?;
        let root = self.root.clone();

        let walked = tokio::task::spawn_blocking(move || walk_matching(&root, &start, &matcher))
            .await
            .map_err(|e| SourceError::Request {
                path: pattern.to_string(),
                message: format!("glob worker failed: {e}"),
            })?;
        Ok(walked)
    }
}

fn walk_matching(root: &Path, start: &Path, matcher: &GlobMatcher) -> Vec<String> {
    if !start.exists() {
        return Vec::new();
    }

    let mut builder = ignore::WalkBuilder::new(start);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .follow_links(false)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && DEFAULT_IGNORES.iter().any(|i| entry.file_name() == *i))
        });

    let mut files: Vec<String> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let rel = entry.path().strip_prefix(root).ok()?;
            let rel = paths::normalize(&rel.to_string_lossy());
            matcher.matches(&rel).then_some(rel)
        })
        .collect();
    files.sort();
    files
}
