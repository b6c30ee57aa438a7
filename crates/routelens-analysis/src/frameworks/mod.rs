//! Framework adapters: one per file-based routing convention.
//!
//! Architecture:
//! - `adapter.rs`: the `FrameworkAdapter` capability trait, `AdapterContext`, and the closed `Adapter` set
//! - `defaults.rs`: shared default behaviour (impact rules, import resolution, directory listing)
//! - `segments.rs`: pure filesystem-name → URL-segment translation
//! - `scan.rs`: best-effort lexical scanners (HTTP methods, actions, forms, auth markers)
//! - `manifest.rs`: `package.json` dependency lookup
//! - `sveltekit.rs`, `nextjs.rs`, `nuxt.rs`, `remix.rs`, `react_router.rs`: concrete adapters
//! - `flat_routes.rs`: dot-delimited flat-file routing shared by Remix and React Router
//! - `registry.rs`: name → lazily constructed, cached adapter
//! - `detector.rs`: specificity-ordered detection

pub mod adapter;
pub mod defaults;
pub mod detector;
pub mod flat_routes;
pub mod manifest;
pub mod nextjs;
pub mod nuxt;
pub mod react_router;
pub mod registry;
pub mod remix;
pub mod scan;
pub mod segments;
pub mod sveltekit;

pub use adapter::{Adapter, AdapterContext, AliasTable, FrameworkAdapter, RouteMatch};
pub use detector::{Detection, FrameworkDetector, DETECTION_ORDER};
pub use nextjs::NextJsAdapter;
pub use nuxt::NuxtAdapter;
pub use react_router::ReactRouterAdapter;
pub use registry::FrameworkRegistry;
pub use remix::RemixAdapter;
pub use sveltekit::SvelteKitAdapter;
