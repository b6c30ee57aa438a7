//! Route discovery across the five routing conventions.

use routelens_analysis::frameworks::{
    NextJsAdapter, NuxtAdapter, ReactRouterAdapter, RemixAdapter, SvelteKitAdapter,
};
use routelens_analysis::{AdapterContext, FrameworkAdapter};
use routelens_core::config::ScanConfig;
use routelens_core::source::MemoryFileSource;
use routelens_core::Route;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn project(files: &[(&str, &str)]) -> MemoryFileSource {
    MemoryFileSource::from_files(files.iter().copied())
}

async fn discover<A: FrameworkAdapter>(adapter: &A, source: &MemoryFileSource) -> Vec<Route> {
    let ctx = AdapterContext::new(source);
    adapter.discover_routes(&ctx).await.unwrap()
}

fn paths(routes: &[Route]) -> Vec<&str> {
    routes.iter().map(|r| r.path.as_str()).collect()
}

fn route<'a>(routes: &'a [Route], path: &str) -> &'a Route {
    routes
        .iter()
        .find(|r| r.path == path)
        .unwrap_or_else(|| panic!("no route {path} in {:?}", paths(routes)))
}

fn assert_path_invariants(routes: &[Route]) {
    for r in routes {
        assert!(r.path.starts_with('/'), "{} lacks leading slash", r.path);
        assert!(r.path == "/" || !r.path.ends_with('/'), "{} has trailing slash", r.path);
        assert!(!r.path.contains('(') || r.path.contains('?'), "{} leaks a group", r.path);
    }
    let p = paths(routes);
    let mut sorted = p.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(p, sorted, "routes must be sorted and unique");
}

// ─── SvelteKit ─────────────────────────────────────────────────────────────

fn sveltekit_project() -> MemoryFileSource {
    project(&[
        ("src/routes/+layout.svelte", "<slot />"),
        ("src/routes/+page.svelte", "<h1>home</h1>"),
        ("src/routes/about/+page.svelte", "<h1>about</h1>"),
        ("src/routes/blog/[slug]/+page.svelte", "<article />"),
        (
            "src/routes/(app)/+layout.server.ts",
            "export const load = ({ locals }) => { if (!locals.user) throw redirect(303, '/login'); };",
        ),
        (
            "src/routes/(app)/settings/+page.svelte",
            "<form method=\"POST\" use:enhance></form>",
        ),
        (
            "src/routes/(app)/settings/+page.server.ts",
            "export const actions = { default: async () => {}, rename: async () => {} };",
        ),
        (
            "src/routes/api/health/+server.ts",
            "export async function GET() {}\nexport const POST = async () => {};",
        ),
        ("src/routes/.hidden/+page.svelte", ""),
    ])
}

#[tokio::test]
async fn sveltekit_directories_become_routes() {
    let routes = discover(&SvelteKitAdapter::new(), &sveltekit_project()).await;
    assert_eq!(
        paths(&routes),
        vec!["/", "/about", "/api/health", "/blog/[slug]", "/settings"]
    );
    assert_path_invariants(&routes);

    let blog = route(&routes, "/blog/[slug]");
    assert!(blog.is_dynamic);
    assert!(blog.has_layout);
    assert_eq!(blog.directory, "src/routes/blog/[slug]");
}

#[tokio::test]
async fn sveltekit_group_layout_carries_auth_and_actions() {
    let routes = discover(&SvelteKitAdapter::new(), &sveltekit_project()).await;

    let settings = route(&routes, "/settings");
    assert_eq!(settings.group.as_deref(), Some("app"));
    assert!(settings.is_auth_protected);
    assert!(settings.has_form_handler);
    assert_eq!(settings.actions, vec!["default", "rename"]);
    assert_eq!(settings.server_files, vec!["src/routes/(app)/settings/+page.server.ts"]);

    assert!(!route(&routes, "/about").is_auth_protected);
}

#[tokio::test]
async fn sveltekit_endpoint_lists_methods() {
    let routes = discover(&SvelteKitAdapter::new(), &sveltekit_project()).await;
    let health = route(&routes, "/api/health");
    assert!(health.has_api_endpoint);
    assert!(health.page_files.is_empty());
    assert_eq!(health.api_methods, vec!["GET", "POST"]);
}

#[tokio::test]
async fn missing_routes_directory_yields_no_routes() {
    let source = project(&[("package.json", "{}")]);
    assert!(discover(&SvelteKitAdapter::new(), &source).await.is_empty());
    assert!(discover(&NuxtAdapter::new(), &source).await.is_empty());
    assert!(discover(&RemixAdapter::new(), &source).await.is_empty());
}

#[tokio::test]
async fn discovery_ignores_listing_order() {
    let forward = sveltekit_project();
    let reversed = sveltekit_project().with_reversed_listing(true);
    let a = discover(&SvelteKitAdapter::new(), &forward).await;
    let b = discover(&SvelteKitAdapter::new(), &reversed).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn max_depth_stops_descent() {
    let source = project(&[
        ("src/routes/+page.svelte", ""),
        ("src/routes/a/+page.svelte", ""),
        ("src/routes/a/b/+page.svelte", ""),
        ("src/routes/a/b/c/+page.svelte", ""),
    ]);
    let scan = ScanConfig {
        max_depth: Some(2),
        ..ScanConfig::default()
    };
    let ctx = AdapterContext::new(&source).with_scan(scan);
    let routes = SvelteKitAdapter::new().discover_routes(&ctx).await.unwrap();
    assert_eq!(paths(&routes), vec!["/", "/a", "/a/b"]);
}

// ─── Next.js ───────────────────────────────────────────────────────────────

fn next_app_project() -> MemoryFileSource {
    project(&[
        ("app/layout.tsx", "export default function Root() {}"),
        ("app/page.tsx", "export default function Home() {}"),
        ("app/blog/[slug]/page.tsx", "export default function Post() {}"),
        ("app/(marketing)/pricing/page.tsx", "export default function Pricing() {}"),
        (
            "app/dashboard/layout.tsx",
            "const session = await getServerSession(options);",
        ),
        ("app/dashboard/page.tsx", "export default function Dash() {}"),
        ("app/dashboard/settings/page.tsx", "<form action={save}></form>"),
        (
            "app/api/users/route.ts",
            "export async function GET() {}\nexport async function DELETE() {}",
        ),
        ("app/_components/Nav.tsx", "export function Nav() {}"),
        ("app/@modal/login/page.tsx", ""),
        ("app/(.)photo/page.tsx", ""),
    ])
}

#[tokio::test]
async fn next_app_router_routes() {
    let routes = discover(&NextJsAdapter::new(), &next_app_project()).await;
    assert_eq!(
        paths(&routes),
        vec![
            "/",
            "/api/users",
            "/blog/[slug]",
            "/dashboard",
            "/dashboard/settings",
            "/pricing",
        ]
    );
    assert_path_invariants(&routes);

    assert_eq!(route(&routes, "/blog/[slug]").directory, "app/blog/[slug]");
    assert_eq!(route(&routes, "/pricing").group.as_deref(), Some("marketing"));
}

#[tokio::test]
async fn next_app_router_flags() {
    let routes = discover(&NextJsAdapter::new(), &next_app_project()).await;

    let settings = route(&routes, "/dashboard/settings");
    assert!(settings.is_auth_protected, "auth inherited from dashboard layout");
    assert!(settings.has_form_handler);
    assert_eq!(settings.actions, vec!["save"]);

    let api = route(&routes, "/api/users");
    assert!(api.has_api_endpoint);
    assert_eq!(api.api_methods, vec!["GET", "DELETE"]);
    assert_eq!(api.server_files, vec!["app/api/users/route.ts"]);

    assert!(!route(&routes, "/").is_auth_protected);
}

#[tokio::test]
async fn next_pages_router_routes() {
    let source = project(&[
        ("pages/_app.tsx", "export default function App() {}"),
        ("pages/index.tsx", ""),
        ("pages/about.tsx", ""),
        ("pages/blog/[slug].tsx", ""),
        ("pages/blog/index.tsx", ""),
        ("pages/api/hello.ts", ""),
        ("pages/Card.test.tsx", ""),
    ]);
    let routes = discover(&NextJsAdapter::new(), &source).await;
    assert_eq!(paths(&routes), vec!["/", "/about", "/blog", "/blog/[slug]"]);
    assert!(routes.iter().all(|r| r.has_layout));
    assert_eq!(route(&routes, "/about").directory, "pages/about");
    assert_eq!(route(&routes, "/blog").directory, "pages/blog");
}

#[tokio::test]
async fn next_multiple_root_layouts_are_discovered() {
    let source = project(&[
        ("next.config.js", ""),
        ("package.json", r#"{"dependencies": {"next": "14.2.0"}}"#),
        ("app/(marketing)/layout.tsx", ""),
        ("app/(marketing)/page.tsx", ""),
        ("app/(shop)/layout.tsx", ""),
        ("app/(shop)/cart/page.tsx", ""),
    ]);
    let routes = discover(&NextJsAdapter::new(), &source).await;
    assert_eq!(paths(&routes), vec!["/", "/cart"]);
    assert_eq!(route(&routes, "/cart").group.as_deref(), Some("shop"));
    assert!(routes.iter().all(|r| r.has_layout));
    assert_path_invariants(&routes);
}

// ─── Nuxt ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn nuxt_pages_translate_brackets() {
    let source = project(&[
        ("layouts/default.vue", "<slot />"),
        ("pages/index.vue", ""),
        ("pages/blog/[...slug].vue", ""),
        ("pages/users/[id].vue", ""),
        ("pages/users.vue", "<NuxtPage />"),
        ("pages/docs/[[section]].vue", ""),
        ("pages/account.vue", "definePageMeta({ middleware: ['auth'] })"),
    ]);
    let routes = discover(&NuxtAdapter::new(), &source).await;
    assert_eq!(
        paths(&routes),
        vec!["/", "/account", "/blog/:slug*", "/docs/:section?", "/users", "/users/:id"]
    );
    assert_path_invariants(&routes);
    assert!(route(&routes, "/blog/:slug*").is_dynamic);
    assert!(route(&routes, "/account").is_auth_protected);
    assert!(routes.iter().all(|r| r.has_layout));
}

// ─── Remix / React Router ──────────────────────────────────────────────────

fn flat_project() -> MemoryFileSource {
    project(&[
        ("app/root.tsx", "export default function App() {}"),
        ("app/routes/_index.tsx", "export default function Index() {}"),
        ("app/routes/blog.tsx", "export default function Blog() {}"),
        ("app/routes/blog.$slug.tsx", "export default function Post() {}"),
        ("app/routes/_auth.tsx", "export default function AuthLayout() {}"),
        (
            "app/routes/_auth.login.tsx",
            "export async function action() {}\nexport default function Login() {}",
        ),
        (
            "app/routes/sitemap[.]xml.ts",
            "export async function loader() { return new Response(''); }",
        ),
        ("app/routes/dashboard/route.tsx", "export default function Dashboard() {}"),
        ("app/routes/dashboard/Chart.tsx", "export function Chart() {}"),
    ])
}

#[tokio::test]
async fn remix_flat_routes() {
    let routes = discover(&RemixAdapter::new(), &flat_project()).await;
    assert_eq!(
        paths(&routes),
        vec!["/", "/blog", "/blog/:slug", "/dashboard", "/login", "/sitemap.xml"]
    );
    assert_path_invariants(&routes);

    let login = route(&routes, "/login");
    assert_eq!(login.actions, vec!["action"]);
    assert!(login.has_form_handler);

    let sitemap = route(&routes, "/sitemap.xml");
    assert!(sitemap.has_api_endpoint);
    assert_eq!(sitemap.api_methods, vec!["GET"]);

    assert_eq!(route(&routes, "/dashboard").directory, "app/routes/dashboard");
}

#[tokio::test]
async fn react_router_shares_flat_conventions() {
    let remix = discover(&RemixAdapter::new(), &flat_project()).await;
    let rr = discover(&ReactRouterAdapter::new(), &flat_project()).await;
    assert_eq!(paths(&remix), paths(&rr));
}
