//! Installs a `tracing-subscriber` fmt layer filtered by `ROUTELENS_LOG`.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV_VAR: &str = "ROUTELENS_LOG";

const DEFAULT_FILTER: &str = "routelens_core=info,routelens_analysis=info";

/// Initialize the global subscriber from `ROUTELENS_LOG`.
///
/// Safe to call more than once; later calls are no-ops and return false.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

/// Initialize with an explicit filter directive, ignoring the environment.
pub fn init_tracing_with_filter(directive: &str) -> bool {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
