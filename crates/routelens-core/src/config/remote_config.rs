//! Remote (GitHub contents API) file-source configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemoteConfig {
    /// API base URL. Default: `https://api.github.com`.
    pub api_base_url: Option<String>,
    /// Environment variable holding the access token. Default: `GITHUB_TOKEN`.
    pub token_env: Option<String>,
    /// Maximum directory depth a remote glob walks. Default: 12.
    pub max_glob_depth: Option<usize>,
    /// Connect timeout for the HTTP client, in seconds. Default: 20.
    pub connect_timeout_secs: Option<u64>,
    /// Per-cache entry capacity. Default: 50_000.
    pub cache_capacity: Option<u64>,
    /// User-Agent header. Default: `routelens/<version>`.
    pub user_agent: Option<String>,
}

impl RemoteConfig {
    pub fn effective_api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| "https://api.github.com".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn effective_token_env(&self) -> &str {
        self.token_env.as_deref().unwrap_or("GITHUB_TOKEN")
    }

    pub fn effective_max_glob_depth(&self) -> usize {
        self.max_glob_depth.unwrap_or(12)
    }

    pub fn effective_connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs.unwrap_or(20)
    }

    pub fn effective_cache_capacity(&self) -> u64 {
        self.cache_capacity.unwrap_or(50_000)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("routelens/{}", env!("CARGO_PKG_VERSION")))
    }
}
