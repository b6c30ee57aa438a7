//! FileSource backends: local disk, GitHub contents API (fake transport), memory.

use std::collections::BTreeMap;

use routelens_core::errors::{PathError, SourceError, SourceResult};
use routelens_core::source::{
    ContentsResponse, ContentsTransport, EntryKind, GitHubFileSource, LocalFileSource,
    MemoryFileSource, RemoteEntry, RepoRef,
};
use routelens_core::FileSource;
use tempfile::TempDir;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn write(root: &TempDir, rel: &str, content: &str) {
    let path = root.path().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Serves a fixed file map the way the contents API would.
struct FakeTransport {
    files: BTreeMap<String, String>,
}

impl FakeTransport {
    fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        }
    }
}

impl ContentsTransport for FakeTransport {
    async fn fetch(&self, _repo: &RepoRef, path: &str) -> SourceResult<ContentsResponse> {
        if let Some(content) = self.files.get(path) {
            return Ok(ContentsResponse::File {
                content: content.clone(),
            });
        }
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let mut entries: BTreeMap<String, EntryKind> = BTreeMap::new();
        for file in self.files.keys() {
            if let Some(rest) = file.strip_prefix(&prefix) {
                let mut parts = rest.splitn(2, '/');
                let name = parts.next().unwrap().to_string();
                let kind = if parts.next().is_some() {
                    EntryKind::Dir
                } else {
                    EntryKind::File
                };
                entries.insert(name, kind);
            }
        }
        if entries.is_empty() {
            return Ok(ContentsResponse::Missing);
        }
        Ok(ContentsResponse::Directory {
            entries: entries
                .into_iter()
                .map(|(name, kind)| RemoteEntry { name, kind })
                .collect(),
        })
    }
}

fn remote(files: &[(&str, &str)]) -> GitHubFileSource<FakeTransport> {
    GitHubFileSource::with_transport(RepoRef::new("acme", "shop", "main"), FakeTransport::new(files))
}

// ─── Local ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn local_source_reads_lists_and_classifies() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/routes/+page.svelte", "<h1>home</h1>");
    write(&dir, "src/routes/blog/[slug]/+page.svelte", "<h1>post</h1>");

    let source = LocalFileSource::new(dir.path());
    assert!(source.exists("src/routes/+page.svelte").await.unwrap());
    assert!(!source.exists("src/routes/missing.svelte").await.unwrap());
    assert_eq!(source.read("src/routes/+page.svelte").await.unwrap(), "<h1>home</h1>");
    assert_eq!(source.readdir("src/routes").await.unwrap(), vec!["+page.svelte", "blog"]);
    assert!(source.is_directory("src/routes/blog/[slug]").await.unwrap());
    assert!(!source.is_directory("src/routes/+page.svelte").await.unwrap());
    assert!(!source.is_directory("nowhere").await.unwrap());
}

#[tokio::test]
async fn local_glob_matches_recursively_and_skips_dependencies() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/routes/+page.svelte", "");
    write(&dir, "src/routes/about/+page.svelte", "");
    write(&dir, "src/routes/about/+page.ts", "");
    write(&dir, "node_modules/pkg/src/routes/+page.svelte", "");

    let source = LocalFileSource::new(dir.path());
    let found = source.glob("src/routes/**/+page.svelte").await.unwrap();
    assert_eq!(found, vec!["src/routes/+page.svelte", "src/routes/about/+page.svelte"]);

    let none = source.glob("**/+page.svelte").await.unwrap();
    assert!(none.iter().all(|f| !f.starts_with("node_modules")));
}

#[tokio::test]
async fn local_glob_finds_literal_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "package.json", "{}");
    write(&dir, "src/main.ts", "");
    let source = LocalFileSource::new(dir.path());
    assert_eq!(source.glob("package.json").await.unwrap(), vec!["package.json"]);
    assert_eq!(source.glob("src/main.ts").await.unwrap(), vec!["src/main.ts"]);
}

#[tokio::test]
async fn local_source_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    let source = LocalFileSource::new(dir.path());
    let err = source.read("../etc/passwd").await.unwrap_err();
    assert!(matches!(err, SourceError::Path(PathError::Traversal { .. })));
    assert!(err.is_fatal());

    let err = source.probe("%2e%2e/secret").await.unwrap_err();
    assert!(matches!(err, SourceError::Path(PathError::EncodedTraversal { .. })));
}

#[tokio::test]
async fn local_read_optional_maps_missing_to_none() {
    let dir = TempDir::new().unwrap();
    let source = LocalFileSource::new(dir.path());
    assert_eq!(source.read_optional("package.json").await.unwrap(), None);
}

// ─── Remote ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remote_directory_read_seeds_child_existence() {
    let source = remote(&[
        ("src/routes/+page.svelte", "home"),
        ("src/routes/about/+page.svelte", "about"),
    ]);

    let names = source.readdir("src/routes").await.unwrap();
    assert_eq!(names, vec!["+page.svelte", "about"]);
    assert_eq!(source.request_count(), 1);

    // Both answered from the seeded caches.
    assert!(source.exists("src/routes/about").await.unwrap());
    assert!(source.is_directory("src/routes/about").await.unwrap());
    assert!(!source.is_directory("src/routes/+page.svelte").await.unwrap());
    assert!(!source.exists("src/routes/contact").await.unwrap());
    assert_eq!(source.request_count(), 1);

    // Content still needs one fetch, then is cached.
    assert_eq!(source.read("src/routes/+page.svelte").await.unwrap(), "home");
    assert_eq!(source.read("src/routes/+page.svelte").await.unwrap(), "home");
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn remote_missing_paths_are_cached() {
    let source = remote(&[("package.json", "{}")]);
    assert!(!source.exists("svelte.config.js").await.unwrap());
    assert!(!source.exists("svelte.config.js").await.unwrap());
    assert_eq!(source.request_count(), 1);
    assert!(matches!(
        source.read("svelte.config.js").await,
        Err(SourceError::NotFound { .. })
    ));
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn remote_glob_prunes_unrelated_subtrees() {
    let source = remote(&[
        ("app/routes/_index.tsx", ""),
        ("app/routes/blog.$slug.tsx", ""),
        ("app/root.tsx", ""),
        ("docs/a/b/c.md", ""),
        ("public/img/logo.svg", ""),
    ]);

    let found = source.glob("app/routes/*.tsx").await.unwrap();
    assert_eq!(found, vec!["app/routes/_index.tsx", "app/routes/blog.$slug.tsx"]);
    // Only app/routes was listed: the walk starts at the literal prefix.
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn remote_glob_respects_depth_limit() {
    let source = remote(&[("a/b/c/d/e.ts", ""), ("a/x.ts", "")]).with_max_glob_depth(1);
    let found = source.glob("**/*.ts").await.unwrap();
    assert_eq!(found, vec!["a/x.ts"]);
}

#[tokio::test]
async fn literal_glob_patterns_agree_across_backends() {
    let files = [("package.json", "{}"), ("src/main.ts", ""), ("src/lib/util.ts", "")];
    let remote = remote(&files);
    let memory = MemoryFileSource::from_files(files);

    for pattern in ["package.json", "src/main.ts", "src/missing.ts"] {
        let from_remote = remote.glob(pattern).await.unwrap();
        let from_memory = memory.glob(pattern).await.unwrap();
        assert_eq!(from_remote, from_memory, "pattern {pattern}");
    }
    assert_eq!(remote.glob("package.json").await.unwrap(), vec!["package.json"]);
    assert_eq!(remote.glob("src/main.ts").await.unwrap(), vec!["src/main.ts"]);
}

#[tokio::test]
async fn remote_rejects_traversal_before_any_request() {
    let source = remote(&[("a.ts", "")]);
    assert!(source.read("src/../../secret").await.unwrap_err().is_fatal());
    assert_eq!(source.request_count(), 0);
}

// ─── Memory ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn memory_source_implies_directories() {
    let source = MemoryFileSource::new()
        .with_file("pages/index.vue", "")
        .with_file("pages/blog/[slug].vue", "");
    assert!(source.is_directory("pages/blog").await.unwrap());
    assert!(!source.is_directory("pages/index.vue").await.unwrap());
    assert_eq!(source.readdir("pages").await.unwrap(), vec!["blog", "index.vue"]);

    let reversed = source.clone().with_reversed_listing(true);
    assert_eq!(reversed.readdir("pages").await.unwrap(), vec!["index.vue", "blog"]);
    assert!(reversed.readdir("nope").await.is_err());
}
