//! `package.json` dependency lookup used by detection.

use std::collections::BTreeMap;

use routelens_core::{AnalysisResult, FileSource};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawManifest {
    dependencies: BTreeMap<String, String>,
    dev_dependencies: BTreeMap<String, String>,
    peer_dependencies: BTreeMap<String, String>,
}

/// Every declared dependency, runtime and dev merged.
#[derive(Debug, Clone, Default)]
pub struct PackageManifest {
    deps: BTreeMap<String, String>,
}

impl PackageManifest {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawManifest = serde_json::from_str(json)?;
        let mut deps = raw.peer_dependencies;
        deps.extend(raw.dev_dependencies);
        deps.extend(raw.dependencies);
        Ok(Self { deps })
    }

    /// Read `package.json` at the project root. Missing or malformed
    /// manifests read as empty.
    pub async fn load<S: FileSource>(source: &S) -> AnalysisResult<Self> {
        let Some(text) = source.read_optional("package.json").await? else {
            return Ok(Self::default());
        };
        match Self::parse(&text) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                tracing::warn!(error = %e, "package.json is not valid JSON, ignoring");
                Ok(Self::default())
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.deps.contains_key(name)
    }

    pub fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has(n))
    }

    /// True if any dependency name starts with `prefix` (e.g. `@remix-run/`).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.deps.keys().any(|k| k.starts_with(prefix))
    }

    /// Declared version range with a leading `^`/`~`/`=`/`v` stripped.
    pub fn version(&self, name: &str) -> Option<String> {
        self.deps
            .get(name)
            .map(|v| v.trim_start_matches(['^', '~', '=', 'v', ' ']).to_string())
    }

    /// First declared version among `names`.
    pub fn first_version(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.version(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_dependency_tables() {
        let m = PackageManifest::parse(
            r#"{"dependencies":{"next":"^14.2.3"},"devDependencies":{"@remix-run/dev":"2.9.0"}}"#,
        )
        .unwrap();
        assert!(m.has("next"));
        assert!(m.has_prefix("@remix-run/"));
        assert_eq!(m.version("next").as_deref(), Some("14.2.3"));
        assert_eq!(m.version("react"), None);
    }

    #[test]
    fn tolerates_missing_tables() {
        let m = PackageManifest::parse(r#"{"name":"x"}"#).unwrap();
        assert!(!m.has_any(&["next", "nuxt"]));
    }
}
