//! Framework detection, the adapter registry and the login-page locator.

use routelens_analysis::frameworks::{
    NextJsAdapter, NuxtAdapter, RemixAdapter, SvelteKitAdapter, DETECTION_ORDER,
};
use routelens_analysis::{AdapterContext, FrameworkAdapter, FrameworkDetector, FrameworkRegistry};
use routelens_core::config::DetectionConfig;
use routelens_core::errors::{AnalysisError, PathError, RegistryError, SourceError, SourceResult};
use routelens_core::source::MemoryFileSource;
use routelens_core::{Confidence, FileSource, RouterType};

// ─── Helpers ───────────────────────────────────────────────────────────────

fn project(files: &[(&str, &str)]) -> MemoryFileSource {
    MemoryFileSource::from_files(files.iter().copied())
}

async fn detected(source: &MemoryFileSource) -> Option<(String, Confidence)> {
    let registry = FrameworkRegistry::with_builtins();
    let ctx = AdapterContext::new(source);
    FrameworkDetector::new(&registry)
        .detect(&ctx)
        .await
        .map(|d| (d.adapter.name().to_string(), d.result.confidence))
}

/// Memory project whose backend fails fatally on one path.
struct PoisonedSource {
    inner: MemoryFileSource,
    poisoned: &'static str,
}

impl PoisonedSource {
    fn check(&self, path: &str) -> SourceResult<()> {
        if path == self.poisoned {
            return Err(PathError::Traversal {
                segment: path.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl FileSource for PoisonedSource {
    fn label(&self) -> String {
        "poisoned".to_string()
    }

    async fn exists(&self, path: &str) -> SourceResult<bool> {
        self.check(path)?;
        self.inner.exists(path).await
    }

    async fn read(&self, path: &str) -> SourceResult<String> {
        self.check(path)?;
        self.inner.read(path).await
    }

    async fn readdir(&self, path: &str) -> SourceResult<Vec<String>> {
        self.check(path)?;
        self.inner.readdir(path).await
    }

    async fn is_directory(&self, path: &str) -> SourceResult<bool> {
        self.check(path)?;
        self.inner.is_directory(path).await
    }

    async fn glob(&self, pattern: &str) -> SourceResult<Vec<String>> {
        self.inner.glob(pattern).await
    }
}

// ─── Detection ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn three_indicators_is_high_confidence() {
    let source = project(&[
        ("package.json", r#"{"devDependencies": {"@sveltejs/kit": "^2.1.0"}}"#),
        ("svelte.config.js", ""),
        ("src/routes/+page.svelte", ""),
    ]);
    let ctx = AdapterContext::new(&source);
    let result = SvelteKitAdapter::new().detect(&ctx).await.unwrap();
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.framework.as_deref(), Some("sveltekit"));
    assert_eq!(result.version.as_deref(), Some("2.1.0"));
    assert_eq!(result.router_type, Some(RouterType::FileBased));
}

#[tokio::test]
async fn two_indicators_is_medium_confidence() {
    let source = project(&[
        ("package.json", r#"{"dependencies": {"nuxt": "3.10.0"}}"#),
        ("pages/index.vue", ""),
    ]);
    assert_eq!(detected(&source).await, Some(("nuxt".to_string(), Confidence::Medium)));
}

#[tokio::test]
async fn nothing_recognisable_detects_nothing() {
    let source = project(&[("README.md", ""), ("src/main.rs", "fn main() {}")]);
    assert_eq!(detected(&source).await, None);

    let ctx = AdapterContext::new(&source);
    let result = NextJsAdapter::new().detect(&ctx).await.unwrap();
    assert_eq!(result.confidence, Confidence::None);
    assert!(result.framework.is_none());
}

#[tokio::test]
async fn next_router_type_reflects_directories() {
    let app = project(&[("app/layout.tsx", ""), ("app/page.tsx", ""), ("next.config.js", "")]);
    let pages = project(&[("pages/index.tsx", ""), ("next.config.js", "")]);
    let hybrid = project(&[("app/page.tsx", ""), ("pages/old.tsx", ""), ("next.config.js", "")]);

    for (source, expected) in [
        (app, RouterType::App),
        (pages, RouterType::Pages),
        (hybrid, RouterType::Hybrid),
    ] {
        let ctx = AdapterContext::new(&source);
        let result = NextJsAdapter::new().detect(&ctx).await.unwrap();
        assert_eq!(result.router_type, Some(expected));
        assert_eq!(result.confidence, Confidence::Medium);
    }
}

#[tokio::test]
async fn remix_app_is_not_claimed_by_react_router() {
    let source = project(&[
        ("package.json", r#"{"dependencies": {"@remix-run/react": "2.8.0", "react-router": "6.22.0"}}"#),
        ("app/root.tsx", ""),
        ("app/routes/_index.tsx", ""),
    ]);
    assert_eq!(detected(&source).await, Some(("remix".to_string(), Confidence::Medium)));

    let registry = FrameworkRegistry::with_builtins();
    let ctx = AdapterContext::new(&source);
    let all = FrameworkDetector::new(&registry).detect_all(&ctx).await;
    assert!(all.iter().all(|d| d.adapter.name() != "react-router"));
}

#[tokio::test]
async fn react_router_framework_mode_is_detected() {
    let source = project(&[
        ("package.json", r#"{"devDependencies": {"@react-router/dev": "7.1.0"}}"#),
        ("react-router.config.ts", "export default {};"),
        ("app/routes.ts", "export default [];"),
        ("app/root.tsx", ""),
    ]);
    assert_eq!(
        detected(&source).await,
        Some(("react-router".to_string(), Confidence::High))
    );
}

#[tokio::test]
async fn remix_app_dir_does_not_look_like_next() {
    let source = project(&[("app/root.tsx", ""), ("app/routes/_index.tsx", "")]);
    let ctx = AdapterContext::new(&source);
    let next = NextJsAdapter::new().detect(&ctx).await.unwrap();
    assert_eq!(next.confidence, Confidence::None);
}

#[tokio::test]
async fn ties_keep_detection_order() {
    // One indicator each for SvelteKit and Nuxt.
    let source = project(&[("svelte.config.js", ""), ("nuxt.config.ts", "")]);
    assert_eq!(detected(&source).await, Some(("sveltekit".to_string(), Confidence::Low)));
}

#[tokio::test]
async fn disabled_frameworks_are_never_probed() {
    let source = project(&[
        ("package.json", r#"{"devDependencies": {"@sveltejs/kit": "2.0.0"}}"#),
        ("svelte.config.js", ""),
        ("src/routes/+page.svelte", ""),
    ]);
    let registry = FrameworkRegistry::with_builtins();
    let ctx = AdapterContext::new(&source);
    let detector = FrameworkDetector::new(&registry).with_config(DetectionConfig {
        disabled: vec!["sveltekit".to_string()],
        ..DetectionConfig::default()
    });
    assert!(detector.detect(&ctx).await.is_none());
}

#[tokio::test]
async fn failing_adapter_is_skipped_and_others_still_run() {
    let source = PoisonedSource {
        inner: project(&[
            ("package.json", r#"{"dependencies": {"@sveltejs/kit": "2.0.0", "nuxt": "3.10.0"}}"#),
            ("svelte.config.js", ""),
            ("src/routes/+page.svelte", ""),
            ("nuxt.config.ts", ""),
            ("pages/index.vue", ""),
        ]),
        poisoned: "svelte.config.js",
    };
    let registry = FrameworkRegistry::with_builtins();
    let ctx = AdapterContext::new(&source);
    let detector = FrameworkDetector::new(&registry);

    let err = SvelteKitAdapter::new().detect(&ctx).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Source(SourceError::Path(_))));

    let best = detector.detect(&ctx).await.unwrap();
    assert_eq!(best.adapter.name(), "nuxt");
    assert_eq!(best.result.confidence, Confidence::High);

    let all = detector.detect_all(&ctx).await;
    let names: Vec<&str> = all.iter().map(|d| d.adapter.name()).collect();
    assert_eq!(names, vec!["nuxt"]);
}

#[tokio::test]
async fn next_route_groups_without_root_layout_are_app_router() {
    let source = project(&[
        ("next.config.js", ""),
        ("package.json", r#"{"dependencies": {"next": "14.2.0"}}"#),
        ("app/(marketing)/layout.tsx", ""),
        ("app/(marketing)/page.tsx", ""),
        ("app/(shop)/layout.tsx", ""),
        ("app/(shop)/cart/page.tsx", ""),
    ]);
    let ctx = AdapterContext::new(&source);
    let result = NextJsAdapter::new().detect(&ctx).await.unwrap();
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.router_type, Some(RouterType::App));
}

#[tokio::test]
async fn nuxt_page_directories_are_not_next_pages() {
    let source = project(&[
        ("package.json", r#"{"dependencies": {"nuxt": "3.10.0"}}"#),
        ("nuxt.config.ts", ""),
        ("pages/index.vue", ""),
        ("pages/blog/[slug].vue", ""),
    ]);
    let registry = FrameworkRegistry::with_builtins();
    let ctx = AdapterContext::new(&source);
    let all = FrameworkDetector::new(&registry).detect_all(&ctx).await;
    let names: Vec<&str> = all.iter().map(|d| d.adapter.name()).collect();
    assert_eq!(names, vec!["nuxt"]);
}

// ─── Registry ──────────────────────────────────────────────────────────────

#[test]
fn builtins_are_registered_in_detection_order_set() {
    let registry = FrameworkRegistry::with_builtins();
    let mut expected: Vec<String> = DETECTION_ORDER.iter().map(|n| n.to_string()).collect();
    expected.sort();
    assert_eq!(registry.names(), expected);
    assert_eq!(registry.instantiated(), 0);
}

#[test]
fn unknown_framework_error_lists_registered_names() {
    let registry = FrameworkRegistry::with_builtins();
    let err = registry.get("astro").unwrap_err();
    let RegistryError::NotFound { name, registered } = &err;
    assert_eq!(name, "astro");
    assert!(registered.contains(&"nuxt".to_string()));
    let message = err.to_string();
    assert!(message.contains("astro"));
    assert!(message.contains("sveltekit"));
}

#[test]
fn instances_are_cached_until_reregistered() {
    let mut registry = FrameworkRegistry::with_builtins();
    let first = registry.get("nuxt").unwrap();
    let again = registry.get("nuxt").unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &again));
    assert_eq!(registry.instantiated(), 1);

    registry.register("nuxt", || NuxtAdapter::new().into());
    assert_eq!(registry.instantiated(), 0);
    let fresh = registry.get("nuxt").unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &fresh));
}

#[test]
fn custom_names_can_alias_builtins() {
    let mut registry = FrameworkRegistry::new();
    registry.register("svelte", || SvelteKitAdapter::new().into());
    assert!(registry.contains("svelte"));
    assert!(!registry.contains("sveltekit"));
    assert_eq!(registry.get("svelte").unwrap().name(), "sveltekit");
}

// ─── Login pages ───────────────────────────────────────────────────────────

#[tokio::test]
async fn login_pages_are_found_with_content() {
    let source = project(&[
        ("src/routes/login/+page.svelte", "<form method=\"POST\"></form>"),
        ("src/routes/(auth)/signin/+page.svelte", "<h1>sign in</h1>"),
        ("src/routes/about/+page.svelte", ""),
    ]);
    let ctx = AdapterContext::new(&source);
    let pages = SvelteKitAdapter::new().find_login_pages(&ctx).await.unwrap();
    let found: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        found,
        vec!["src/routes/login/+page.svelte", "src/routes/(auth)/signin/+page.svelte"]
    );
    assert!(pages[0].content.contains("<form"));
}

#[tokio::test]
async fn flat_login_modules_are_found() {
    let source = project(&[
        ("app/routes/_auth.login.tsx", "export default function Login() {}"),
        ("app/routes/auth.signin.tsx", "export default function SignIn() {}"),
    ]);
    let ctx = AdapterContext::new(&source);
    let pages = RemixAdapter::new().find_login_pages(&ctx).await.unwrap();
    let found: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(found, vec!["app/routes/_auth.login.tsx", "app/routes/auth.signin.tsx"]);
}

#[tokio::test]
async fn no_login_pages_is_empty_not_error() {
    let source = project(&[("pages/index.vue", "")]);
    let ctx = AdapterContext::new(&source);
    assert!(NuxtAdapter::new().find_login_pages(&ctx).await.unwrap().is_empty());
}

#[test]
fn traversal_in_login_pattern_is_rejected() {
    let adapters = [
        SvelteKitAdapter::new().login_candidates("../../etc/passwd"),
        NextJsAdapter::new().login_candidates("../secrets"),
        NuxtAdapter::new().login_candidates("%2e%2e/secrets"),
        RemixAdapter::new().login_candidates("/etc/passwd"),
    ];
    for result in adapters {
        assert!(result.is_err());
    }

    let err: AnalysisError = PathError::Traversal {
        segment: "..".to_string(),
    }
    .into();
    assert!(matches!(err, AnalysisError::Source(SourceError::Path(_))));
}

#[test]
fn bracket_segments_survive_login_expansion() {
    let candidates = NextJsAdapter::new().login_candidates("auth/[...rest]").unwrap();
    assert!(candidates.contains(&"app/auth/[...rest]/page.tsx".to_string()));
}
