//! Login-page locator.
//!
//! Each common login URL pattern is expanded by the active adapter into the
//! files that would serve it; the ones that exist come back with content.

use routelens_core::{AnalysisResult, FileSource, FxHashSet};
use serde::Serialize;

use crate::frameworks::defaults;
use crate::frameworks::{AdapterContext, FrameworkAdapter};

pub const LOGIN_PATTERNS: &[&str] = &[
    "login",
    "signin",
    "sign-in",
    "auth/login",
    "auth/signin",
    "account/login",
    "user/login",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginPage {
    pub path: String,
    pub content: String,
}

/// Existing login page files in candidate order, deduplicated.
///
/// A candidate that escapes the project is a hard error.
pub async fn find_login_pages<A, S>(adapter: &A, ctx: &AdapterContext<'_, S>) -> AnalysisResult<Vec<LoginPage>>
where
    A: FrameworkAdapter + ?Sized,
    S: FileSource,
{
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut candidates = Vec::new();
    for pattern in LOGIN_PATTERNS {
        for candidate in adapter.login_candidates(pattern)? {
            if seen.insert(candidate.clone()) {
                candidates.push(candidate);
            }
        }
    }

    let existing = defaults::existing_files(ctx.file_source, &candidates, ctx.concurrency()).await?;
    let pages: Vec<LoginPage> = defaults::read_all(ctx.file_source, &existing)
        .await?
        .into_iter()
        .map(|(path, content)| LoginPage { path, content })
        .collect();

    tracing::debug!(
        adapter = adapter.name(),
        candidates = candidates.len(),
        found = pages.len(),
        "login pages located"
    );
    Ok(pages)
}
