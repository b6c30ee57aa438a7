//! Lexical import-specifier extraction.
//!
//! Best-effort: full-line and block comments are stripped first, then static
//! `import`/`export … from`, side-effect imports and literal dynamic
//! `import()` calls are collected. Template-literal or computed specifiers
//! are ignored.

use std::sync::OnceLock;

use regex::Regex;

fn static_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?:^|[;\s}>])(?:import|export)\s+(?:type\s+)?(?:[\w*${}\s,]+?\s+from\s+)?['"]([^'"\n]+)['"]"#,
        )
        .expect("static import regex")
    })
}

fn dynamic_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"import\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("dynamic import regex")
    })
}

fn block_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment regex"))
}

fn line_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*//.*$").expect("line comment regex"))
}

/// Import specifiers in source order, deduplicated.
pub fn import_specifiers(content: &str) -> Vec<String> {
    let without_blocks = block_comment_re().replace_all(content, "");
    let code = line_comment_re().replace_all(&without_blocks, "");

    let mut found: Vec<(usize, &str)> = static_import_re()
        .captures_iter(&code)
        .chain(dynamic_import_re().captures_iter(&code))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);

    let mut out: Vec<String> = Vec::with_capacity(found.len());
    for (_, spec) in found {
        let spec = spec.trim();
        if !spec.is_empty() && !out.iter().any(|s| s == spec) {
            out.push(spec.to_string());
        }
    }
    out
}
