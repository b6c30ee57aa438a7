//! Filesystem name → URL segment translation.
//!
//! Pure functions; every adapter composes these with its own walk.

/// How bracketed dynamic segments are rendered in URL paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicStyle {
    /// Kept verbatim: `[slug]`, `[...rest]`, `[[opt]]` (SvelteKit, Next.js).
    Bracket,
    /// `:slug`, `:rest*`, `:opt?` (Nuxt).
    Nuxt,
    /// `:slug`, `*`, `:opt?` (Remix, React Router).
    Colon,
}

/// Group name of a `(group)` segment. Intercepting markers like `(.)` are not groups.
pub fn group_name(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('(')?.strip_suffix(')')?;
    if inner.is_empty() || inner.starts_with('.') || inner.contains(['(', ')', '/']) {
        return None;
    }
    Some(inner)
}

/// Next.js intercepting-route prefixes: `(.)`, `(..)`, `(...)`, `(..)(..)`.
pub fn is_intercepting(segment: &str) -> bool {
    segment.starts_with("(.)") || segment.starts_with("(..)") || segment.starts_with("(...)")
}

/// Translate every bracket token inside `segment` (mixed segments such as
/// `user-[id]` are supported).
pub fn translate_brackets(segment: &str, style: DynamicStyle) -> String {
    if style == DynamicStyle::Bracket || !segment.contains('[') {
        return segment.to_string();
    }

    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let parsed = if let Some(body) = tail.strip_prefix("[[") {
            body.find("]]").map(|end| (&body[..end], true, end + 4))
        } else {
            tail.find(']').map(|end| (&tail[1..end], false, end + 1))
        };
        let Some((inner, optional, consumed)) = parsed else {
            out.push_str(tail);
            return out;
        };

        out.push_str(&render_param(inner, optional, style));
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    out
}

fn render_param(inner: &str, optional: bool, style: DynamicStyle) -> String {
    if inner == "." && style == DynamicStyle::Colon {
        return ".".to_string();
    }
    match (inner.strip_prefix("..."), style) {
        (Some(name), DynamicStyle::Nuxt) => format!(":{name}*"),
        (Some(_), _) => "*".to_string(),
        (None, _) if optional => format!(":{inner}?"),
        (None, _) => format!(":{inner}"),
    }
}

/// True if a URL path carries any parameter syntax.
pub fn is_dynamic_path(path: &str) -> bool {
    path.contains('[') || path.contains(':') || path.contains('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_recognised() {
        assert_eq!(group_name("(marketing)"), Some("marketing"));
        assert_eq!(group_name("(.)photo"), None);
        assert_eq!(group_name("(..)"), None);
        assert_eq!(group_name("blog"), None);
        assert!(is_intercepting("(..)(..)feed"));
    }

    #[test]
    fn nuxt_brackets() {
        assert_eq!(translate_brackets("[id]", DynamicStyle::Nuxt), ":id");
        assert_eq!(translate_brackets("[...slug]", DynamicStyle::Nuxt), ":slug*");
        assert_eq!(translate_brackets("[[lang]]", DynamicStyle::Nuxt), ":lang?");
        assert_eq!(translate_brackets("[[...all]]", DynamicStyle::Nuxt), ":all*");
        assert_eq!(translate_brackets("user-[id]", DynamicStyle::Nuxt), "user-:id");
    }

    #[test]
    fn colon_brackets() {
        assert_eq!(translate_brackets("[id]", DynamicStyle::Colon), ":id");
        assert_eq!(translate_brackets("[...rest]", DynamicStyle::Colon), "*");
        assert_eq!(translate_brackets("[[lang]]", DynamicStyle::Colon), ":lang?");
        assert_eq!(translate_brackets("sitemap[.]xml", DynamicStyle::Colon), "sitemap.xml");
    }

    #[test]
    fn bracket_style_is_verbatim() {
        assert_eq!(translate_brackets("[[...slug]]", DynamicStyle::Bracket), "[[...slug]]");
    }

    #[test]
    fn unterminated_bracket_is_kept() {
        assert_eq!(translate_brackets("a[b", DynamicStyle::Nuxt), "a[b");
    }
}
