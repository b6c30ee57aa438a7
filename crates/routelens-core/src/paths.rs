//! Project-relative path helpers.
//!
//! All paths inside routelens are `/`-separated and relative to the project
//! root. [`safe_join`] is the only joiner that accepts untrusted segments.

use crate::errors::PathError;

/// Normalize a user- or VCS-supplied path: `\` → `/`, strip `./` and leading `/`,
/// collapse duplicate separators and drop `.` components.
pub fn normalize(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    replaced
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Join untrusted `segment` onto `base`, rejecting any attempt to leave `base`.
///
/// A `..` component, a percent-encoded dot or separator sequence that decodes
/// to traversal, or an absolute path are hard errors. Bracket syntax such as
/// `[...slug]` or `[[...rest]]` is a normal name and is accepted unchanged.
pub fn safe_join(base: &str, segment: &str) -> Result<String, PathError> {
    if segment.starts_with('/') || segment.starts_with('\\') || has_drive_prefix(segment) {
        return Err(PathError::Absolute {
            segment: segment.to_string(),
        });
    }

    let mut parts: Vec<&str> = Vec::new();
    for component in segment.split(['/', '\\']) {
        if component == ".." {
            return Err(PathError::Traversal {
                segment: segment.to_string(),
            });
        }
        if is_encoded_traversal(component) {
            return Err(PathError::EncodedTraversal {
                segment: segment.to_string(),
            });
        }
        if component.is_empty() || component == "." {
            continue;
        }
        parts.push(component);
    }

    let base = normalize(base);
    let tail = parts.join("/");
    Ok(match (base.is_empty(), tail.is_empty()) {
        (true, _) => tail,
        (false, true) => base,
        (false, false) => format!("{base}/{tail}"),
    })
}

/// Join each segment in turn with [`safe_join`].
pub fn safe_join_all(base: &str, segments: &[&str]) -> Result<String, PathError> {
    segments
        .iter()
        .try_fold(normalize(base), |acc, seg| safe_join(&acc, seg))
}

/// Resolve a relative import specifier against a directory, lexically.
///
/// `..` is legitimate here; the result is `None` only when it would climb
/// above the project root.
pub fn join_relative(dir: &str, spec: &str) -> Option<String> {
    let mut parts: Vec<&str> = dir.split('/').filter(|c| !c.is_empty()).collect();
    for component in spec.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Parent directory of a project-relative path (`""` for top-level files).
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final component of a path.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// File name without its final extension (`+page.server.ts` → `+page.server`).
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Final extension without the dot, if any.
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

/// Path with its final extension removed (`pages/a/b.vue` → `pages/a/b`).
pub fn strip_extension(path: &str) -> &str {
    match extension(path) {
        Some(ext) => &path[..path.len() - ext.len() - 1],
        None => path,
    }
}

/// True if `path` equals `dir` or lies underneath it. The empty dir contains everything.
pub fn is_within(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return true;
    }
    path == dir || (path.starts_with(dir) && path.as_bytes().get(dir.len()) == Some(&b'/'))
}

/// Join two already-trusted relative paths.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{name}")
    }
}

fn has_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn is_encoded_traversal(component: &str) -> bool {
    if !component.contains('%') {
        return false;
    }
    let decoded = percent_decode(component);
    decoded == ".."
        || decoded.split(['/', '\\']).any(|c| c == "..")
        || decoded.starts_with('/')
}

/// Lossy `%XX` decoding, used only by the encoded-traversal check. Paths
/// themselves are never decoded.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(b) = decoded {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_join_accepts_bracket_syntax() {
        assert_eq!(safe_join("src/routes", "[...slug]").unwrap(), "src/routes/[...slug]");
        assert_eq!(safe_join("pages", "[[...rest]].vue").unwrap(), "pages/[[...rest]].vue");
    }

    #[test]
    fn safe_join_rejects_parent_components() {
        assert!(matches!(safe_join("src", "../etc"), Err(PathError::Traversal { .. })));
        assert!(matches!(safe_join("src", "a/../../b"), Err(PathError::Traversal { .. })));
        assert!(matches!(
            safe_join("src", "%2e%2e/secret"),
            Err(PathError::EncodedTraversal { .. })
        ));
        assert!(matches!(
            safe_join("src", "a%2F..%2Fb"),
            Err(PathError::EncodedTraversal { .. })
        ));
        assert!(matches!(safe_join("src", "/etc/passwd"), Err(PathError::Absolute { .. })));
    }

    #[test]
    fn join_relative_resolves_parents() {
        assert_eq!(join_relative("src/routes/blog", "../../lib/x").as_deref(), Some("src/lib/x"));
        assert_eq!(join_relative("src", "../../x"), None);
    }

    #[test]
    fn stem_and_extension() {
        assert_eq!(file_stem("src/routes/+page.server.ts"), "+page.server");
        assert_eq!(extension("a/b.vue"), Some("vue"));
        assert_eq!(extension("a/.env"), None);
        assert_eq!(strip_extension("pages/a/[id].vue"), "pages/a/[id]");
    }

    #[test]
    fn within_respects_component_boundaries() {
        assert!(is_within("app/dashboard/page.tsx", "app/dashboard"));
        assert!(!is_within("app/dashboards/page.tsx", "app/dashboard"));
        assert!(is_within("anything", ""));
    }
}
