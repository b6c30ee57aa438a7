//! Remote FileSource over the GitHub contents API.
//!
//! The API has no recursive listing, so every operation is one
//! `GET /repos/{owner}/{repo}/contents/{path}?ref={ref}` at most, and results
//! are kept in four independent caches keyed by `(repo, ref, path)`. Reading a
//! directory seeds existence and is-directory for all of its children.
//! Caches are never time-evicted: one pass always reads one fixed ref.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use moka::sync::Cache;
use serde::Deserialize;

use crate::config::RemoteConfig;
use crate::errors::{SourceError, SourceResult};
use crate::paths;
use crate::traits::FileSource;
use crate::types::collections::FxHashSet;

use super::glob_match::GlobMatcher;

/// Repository coordinates for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub git_ref: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, git_ref: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            git_ref: git_ref.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks and submodules: listed, never descended into.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// One decoded contents-API answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentsResponse {
    File { content: String },
    Directory { entries: Vec<RemoteEntry> },
    Missing,
}

/// The single network seam of the remote source.
#[allow(async_fn_in_trait)]
pub trait ContentsTransport: Send + Sync {
    async fn fetch(&self, repo: &RepoRef, path: &str) -> SourceResult<ContentsResponse>;
}

type CacheKey = (String, String, String);

/// The four caches of a remote source. Share one `Arc<RemoteCaches>` between
/// sources to keep results for the whole process lifetime.
pub struct RemoteCaches {
    content: Cache<CacheKey, String>,
    listing: Cache<CacheKey, Arc<Vec<RemoteEntry>>>,
    exists: Cache<CacheKey, bool>,
    is_dir: Cache<CacheKey, bool>,
}

impl RemoteCaches {
    pub fn new(capacity: u64) -> Self {
        Self {
            content: Cache::new(capacity),
            listing: Cache::new(capacity),
            exists: Cache::new(capacity),
            is_dir: Cache::new(capacity),
        }
    }

    pub fn invalidate_all(&self) {
        self.content.invalidate_all();
        self.listing.invalidate_all();
        self.exists.invalidate_all();
        self.is_dir.invalidate_all();
    }
}

impl Default for RemoteCaches {
    fn default() -> Self {
        Self::new(50_000)
    }
}

/// `reqwest`-backed transport for the GitHub REST contents endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Build a transport from config; the token is read from `config.token_env`.
    pub fn from_config(config: &RemoteConfig) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.effective_user_agent())
            .connect_timeout(Duration::from_secs(config.effective_connect_timeout_secs()))
            .build()
            .map_err(|e| SourceError::Request {
                path: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        let token = std::env::var(config.effective_token_env())
            .ok()
            .filter(|t| !t.is_empty());
        Ok(Self {
            client,
            api_base: config.effective_api_base_url(),
            token,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn contents_url(&self, repo: &RepoRef, path: &str) -> SourceResult<reqwest::Url> {
        let request_error = |message: String| SourceError::Request {
            path: path.to_string(),
            message,
        };
        let mut url = reqwest::Url::parse(&format!(
            "{}/repos/{}/{}/contents",
            self.api_base, repo.owner, repo.repo
        ))
        .map_err(|e| request_error(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| request_error("API base URL cannot take path segments".to_string()))?
            .extend(path.split('/').filter(|c| !c.is_empty()));
        url.query_pairs_mut().append_pair("ref", &repo.git_ref);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    Directory(Vec<ApiEntry>),
    File(ApiEntry),
}

impl ContentsTransport for HttpTransport {
    async fn fetch(&self, repo: &RepoRef, path: &str) -> SourceResult<ContentsResponse> {
        let url = self.contents_url(repo, path)?;
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| SourceError::Request {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(ContentsResponse::Missing);
        }
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body: ApiResponse = response.json().await.map_err(|e| SourceError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        decode_response(path, body)
    }
}

fn decode_response(path: &str, body: ApiResponse) -> SourceResult<ContentsResponse> {
    match body {
        ApiResponse::Directory(items) => Ok(ContentsResponse::Directory {
            entries: items
                .into_iter()
                .map(|item| RemoteEntry {
                    kind: match item.kind.as_str() {
                        "file" => EntryKind::File,
                        "dir" => EntryKind::Dir,
                        _ => EntryKind::Other,
                    },
                    name: item.name,
                })
                .collect(),
        }),
        ApiResponse::File(item) => {
            let decode_error = |message: String| SourceError::Decode {
                path: path.to_string(),
                message,
            };
            let raw = item
                .content
                .ok_or_else(|| decode_error(format!("{} has no inline content", item.name)))?;
            if item.encoding.as_deref().is_some_and(|enc| enc != "base64") {
                return Err(decode_error(format!("unsupported encoding {:?}", item.encoding)));
            }
            let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| decode_error(e.to_string()))?;
            let content = String::from_utf8(bytes).map_err(|e| decode_error(e.to_string()))?;
            Ok(ContentsResponse::File { content })
        }
    }
}

/// Files of one repository at one ref, read through the contents API.
pub struct GitHubFileSource<T: ContentsTransport = HttpTransport> {
    repo: RepoRef,
    transport: T,
    caches: Arc<RemoteCaches>,
    max_glob_depth: usize,
    requests: AtomicUsize,
}

impl GitHubFileSource<HttpTransport> {
    /// Build an HTTP-backed source with fresh caches.
    pub fn from_config(repo: RepoRef, config: &RemoteConfig) -> SourceResult<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(repo, transport)
            .with_caches(Arc::new(RemoteCaches::new(config.effective_cache_capacity())))
            .with_max_glob_depth(config.effective_max_glob_depth()))
    }
}

impl<T: ContentsTransport> GitHubFileSource<T> {
    pub fn with_transport(repo: RepoRef, transport: T) -> Self {
        Self {
            repo,
            transport,
            caches: Arc::new(RemoteCaches::default()),
            max_glob_depth: 12,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_caches(mut self, caches: Arc<RemoteCaches>) -> Self {
        self.caches = caches;
        self
    }

    pub fn with_max_glob_depth(mut self, depth: usize) -> Self {
        self.max_glob_depth = depth;
        self
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn caches(&self) -> &Arc<RemoteCaches> {
        &self.caches
    }

    /// Number of transport round-trips issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn key(&self, path: &str) -> CacheKey {
        (self.repo.full_name(), self.repo.git_ref.clone(), path.to_string())
    }

    fn clean(path: &str) -> SourceResult<String> {
        Ok(paths::safe_join("", path)?)
    }

    /// Fetch `path` once and seed every cache the answer informs.
    async fn fetch_and_seed(&self, path: &str) -> SourceResult<ContentsResponse> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(repo = %self.repo.full_name(), git_ref = %self.repo.git_ref, path, "contents fetch");
        let response = self.transport.fetch(&self.repo, path).await?;
        let key = self.key(path);
        match &response {
            ContentsResponse::Missing => {
                self.caches.exists.insert(key.clone(), false);
                self.caches.is_dir.insert(key, false);
            }
            ContentsResponse::File { content } => {
                self.caches.exists.insert(key.clone(), true);
                self.caches.is_dir.insert(key.clone(), false);
                self.caches.content.insert(key, content.clone());
            }
            ContentsResponse::Directory { entries } => {
                self.seed_listing(path, entries.clone());
            }
        }
        Ok(response)
    }

    fn seed_listing(&self, path: &str, entries: Vec<RemoteEntry>) {
        let key = self.key(path);
        self.caches.exists.insert(key.clone(), true);
        self.caches.is_dir.insert(key.clone(), true);
        for entry in &entries {
            let child = self.key(&paths::join(path, &entry.name));
            self.caches.exists.insert(child.clone(), true);
            self.caches.is_dir.insert(child, entry.kind == EntryKind::Dir);
        }
        self.caches.listing.insert(key, Arc::new(entries));
    }

    /// Answer existence from the parent's cached listing, when there is one.
    fn exists_from_parent_listing(&self, path: &str) -> Option<bool> {
        let listing = self.caches.listing.get(&self.key(paths::parent(path)))?;
        let name = paths::file_name(path);
        Some(listing.iter().any(|e| e.name == name))
    }

    async fn listing(&self, path: &str) -> SourceResult<Arc<Vec<RemoteEntry>>> {
        if let Some(listing) = self.caches.listing.get(&self.key(path)) {
            return Ok(listing);
        }
        if self.caches.exists.get(&self.key(path)) == Some(false) {
            return Err(SourceError::NotFound {
                path: path.to_string(),
            });
        }
        match self.fetch_and_seed(path).await? {
            ContentsResponse::Directory { entries } => Ok(Arc::new(entries)),
            ContentsResponse::Missing => Err(SourceError::NotFound {
                path: path.to_string(),
            }),
            ContentsResponse::File { .. } => Err(SourceError::Decode {
                path: path.to_string(),
                message: "not a directory".to_string(),
            }),
        }
    }
}

impl<T: ContentsTransport> FileSource for GitHubFileSource<T> {
    fn label(&self) -> String {
        format!("github:{}@{}", self.repo.full_name(), self.repo.git_ref)
    }

    async fn exists(&self, path: &str) -> SourceResult<bool> {
        let path = Self::clean(path)?;
        if path.is_empty() {
            return Ok(true);
        }
        if let Some(found) = self.caches.exists.get(&self.key(&path)) {
            return Ok(found);
        }
        if let Some(found) = self.exists_from_parent_listing(&path) {
            self.caches.exists.insert(self.key(&path), found);
            return Ok(found);
        }
        let response = self.fetch_and_seed(&path).await?;
        Ok(!matches!(response, ContentsResponse::Missing))
    }

    async fn read(&self, path: &str) -> SourceResult<String> {
        let path = Self::clean(path)?;
        let key = self.key(&path);
        if let Some(content) = self.caches.content.get(&key) {
            return Ok(content);
        }
        let known_absent = self.caches.exists.get(&key) == Some(false)
            || self.exists_from_parent_listing(&path) == Some(false);
        let known_dir = self.caches.is_dir.get(&key) == Some(true);
        if known_absent {
            return Err(SourceError::NotFound { path });
        }
        if known_dir {
            return Err(SourceError::Decode {
                path,
                message: "is a directory".to_string(),
            });
        }
        match self.fetch_and_seed(&path).await? {
            ContentsResponse::File { content } => Ok(content),
            ContentsResponse::Missing => Err(SourceError::NotFound { path }),
            ContentsResponse::Directory { .. } => Err(SourceError::Decode {
                path,
                message: "is a directory".to_string(),
            }),
        }
    }

    async fn readdir(&self, path: &str) -> SourceResult<Vec<String>> {
        let path = Self::clean(path)?;
        let listing = self.listing(&path).await?;
        Ok(listing.iter().map(|e| e.name.clone()).collect())
    }

    async fn is_directory(&self, path: &str) -> SourceResult<bool> {
        let path = Self::clean(path)?;
        if path.is_empty() {
            return Ok(true);
        }
        let key = self.key(&path);
        if let Some(is_dir) = self.caches.is_dir.get(&key) {
            return Ok(is_dir);
        }
        if self.caches.exists.get(&key) == Some(false)
            || self.exists_from_parent_listing(&path) == Some(false)
        {
            return Ok(false);
        }
        let response = self.fetch_and_seed(&path).await?;
        Ok(matches!(response, ContentsResponse::Directory { .. }))
    }

    /// Depth-bounded directory walk from the pattern's literal prefix.
    ///
    /// Subtrees that cannot contain a match are never listed.
    async fn glob(&self, pattern: &str) -> SourceResult<Vec<String>> {
        let matcher = GlobMatcher::new(pattern).map_err(|e| SourceError::Decode {
            path: pattern.to_string(),
            message: e.to_string(),
        })?;
        let start = Self::clean(&matcher.literal_prefix())?;

        let mut results = Vec::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack: Vec<(String, usize)> = vec![(start, 0)];

        while let Some((dir, depth)) = stack.pop() {
            if !visited.insert(dir.clone()) {
                continue;
            }
            let entries = match self.listing(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::debug!(dir = %dir, error = %e, "remote glob skipped directory");
                    continue;
                }
            };
            for entry in entries.iter() {
                let child = paths::join(&dir, &entry.name);
                match entry.kind {
                    EntryKind::Dir => {
                        if depth < self.max_glob_depth && matcher.could_match_under(&child) {
                            stack.push((child, depth + 1));
                        }
                    }
                    EntryKind::File => {
                        if matcher.matches(&child) {
                            results.push(child);
                        }
                    }
                    EntryKind::Other => {}
                }
            }
        }

        results.sort();
        Ok(results)
    }
}
