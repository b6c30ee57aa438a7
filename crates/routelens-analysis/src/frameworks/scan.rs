//! Best-effort lexical scanners over route module source.
//!
//! None of these parse JavaScript. They look for the export shapes and
//! markers each framework documents, and err on the side of reporting nothing.

use std::sync::OnceLock;

use regex::Regex;

/// HTTP methods in the order they are reported.
pub const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

fn method_export_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"export\s+(?:async\s+)?(?:function\s*\*?\s*|const\s+|let\s+|var\s+)(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\b",
        )
        .expect("method export regex")
    })
}

fn export_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"export\s*\{([^}]*)\}").expect("export list regex"))
}

fn actions_export_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export\s+const\s+actions\s*(?::\s*[\w.<>\s]+)?=\s*\{").expect("actions regex")
    })
}

fn named_fn_export_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export\s+(?:async\s+)?(?:function\s+(\w+)|const\s+(\w+)\s*=)").expect("named export regex")
    })
}

fn form_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<(?:form|Form|fetcher\.Form)\b|use:enhance|useFetcher\s*\(|useSubmit\s*\(|@submit(?:\.prevent)?\s*=|onSubmit\s*=")
            .expect("form regex")
    })
}

fn auth_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"locals\.(?:user|session|auth)\b",
            r"|\b(?:getServerSession|getSession|requireAuth|requireUser|requireUserId|withAuth|authGuard|isAuthenticated|currentUser|useSession)\s*\(",
            r"|\bauth\(\)",
            r#"|redirect\(\s*(?:30[1237]\s*,\s*)?['"`]/(?:login|signin|sign-in|auth)\b"#,
            r#"|middleware\s*:\s*(?:\[[^\]]*)?['"](?:auth|authenticated|auth-only|sidebase-auth)['"]"#,
        ))
        .expect("auth marker regex")
    })
}

/// HTTP methods exported by an endpoint module, in canonical order.
pub fn http_methods(content: &str) -> Vec<String> {
    let mut found: Vec<&str> = method_export_re()
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    for caps in export_list_re().captures_iter(content) {
        let Some(list) = caps.get(1) else { continue };
        for item in list.as_str().split(',') {
            // `handler as GET` exports under the alias.
            let exported = item.rsplit(" as ").next().unwrap_or(item).trim();
            if let Some(m) = HTTP_METHODS.iter().find(|m| **m == exported) {
                found.push(*m);
            }
        }
    }

    HTTP_METHODS
        .iter()
        .filter(|m| found.contains(m))
        .map(|m| m.to_string())
        .collect()
}

/// Keys of a SvelteKit `export const actions = { ... }` object, in source order.
pub fn sveltekit_actions(content: &str) -> Vec<String> {
    let Some(m) = actions_export_re().find(content) else {
        return Vec::new();
    };
    object_keys(&content[m.end()..])
}

/// Named server actions: exported functions of a `'use server'` module, or
/// functions bound with `action={fn}`.
pub fn server_actions(content: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let head = content.trim_start();
    if head.starts_with("'use server'") || head.starts_with("\"use server\"") {
        for caps in named_fn_export_re().captures_iter(content) {
            if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
                push_unique(&mut out, name.as_str());
            }
        }
    }
    static BOUND: OnceLock<Regex> = OnceLock::new();
    let bound = BOUND.get_or_init(|| Regex::new(r"\b(?:action|formAction)=\{(\w+)\}").expect("bound action regex"));
    for caps in bound.captures_iter(content) {
        if let Some(name) = caps.get(1) {
            push_unique(&mut out, name.as_str());
        }
    }
    out
}

/// True if the module exports a named `action` (Remix, React Router).
pub fn exports_action(content: &str) -> bool {
    exports_named(content, "action")
}

pub fn exports_loader(content: &str) -> bool {
    exports_named(content, "loader")
}

pub fn exports_default(content: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"export\s+default\b").expect("default export regex"))
        .is_match(content)
}

fn exports_named(content: &str, name: &str) -> bool {
    named_fn_export_re().captures_iter(content).any(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .is_some_and(|m| m.as_str() == name)
    })
}

pub fn has_form(content: &str) -> bool {
    form_re().is_match(content)
}

pub fn has_auth_marker(content: &str) -> bool {
    auth_re().is_match(content)
}

/// Top-level keys of the object literal whose body starts at `body`
/// (just past the opening brace).
fn object_keys(body: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut depth = 0usize;
    let mut expect_key = true;
    let mut chars = body.char_indices().peekable();
    let mut quote: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '/' if body[i..].starts_with("//") => {
                for (_, n) in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            ',' if depth == 0 => expect_key = true,
            c if depth == 0 && expect_key && (c.is_alphabetic() || c == '_' || c == '$') => {
                let mut ident = String::from(c);
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '$' {
                        ident.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if ident == "async" {
                    continue;
                }
                push_unique(&mut keys, &ident);
                expect_key = false;
            }
            _ => {}
        }
    }
    keys
}

fn push_unique(into: &mut Vec<String>, item: &str) {
    if !into.iter().any(|s| s == item) {
        into.push(item.to_string());
    }
}
