//! Identifier normalization shared by every generated artifact.
//!
//! Table names, column names, URL path segments and record field names are
//! all derived from the schema's mixed-case identifiers through
//! [`normalize`], so the three artifact kinds always agree on spelling.

/// Convert a mixed-case identifier into lower-case, `_`-separated form.
///
/// A separator is inserted before an upper-case ASCII letter that is neither
/// the first nor the last byte, unless both of its neighbours are upper-case
/// too. Acronym runs therefore stay together while the word after them is
/// split off:
///
/// ```rust
/// use entitygen::naming::normalize;
///
/// assert_eq!(normalize("UserID"), "user_id");
/// assert_eq!(normalize("HTTPServer"), "http_server");
/// assert_eq!(normalize("UUID"), "uuid");
/// ```
///
/// Bytes other than ASCII upper-case letters pass through unchanged.
pub fn normalize(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.char_indices() {
        if !c.is_ascii_uppercase() {
            out.push(c);
            continue;
        }
        let interior = i > 0 && i + 1 < bytes.len();
        if interior
            && (!bytes[i - 1].is_ascii_uppercase() || !bytes[i + 1].is_ascii_uppercase())
        {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Make a normalized name usable as a Rust identifier in generated code.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit is
/// prefixed with `_`, and keywords are emitted as raw identifiers.
pub fn rust_ident(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
        "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
        "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where",
        "while", "async", "await", "dyn",
    ];
    let mut s: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.is_empty() {
        s.push('_');
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    // `self`, `super` and `Self` cannot be raw identifiers.
    if matches!(s.as_str(), "self" | "super" | "Self") {
        s.push('_');
    } else if KEYWORDS.contains(&s.as_str()) {
        s.insert_str(0, "r#");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize("UUID"), "uuid");
        assert_eq!(normalize("UserID"), "user_id");
        assert_eq!(normalize("HTTPServer"), "http_server");
        assert_eq!(normalize("a"), "a");
        assert_eq!(normalize("FirstName"), "first_name");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_passes_non_letters() {
        assert_eq!(normalize("Address2Line"), "address2_line");
        assert_eq!(normalize("already_snake"), "already_snake");
        assert_eq!(normalize("Größe"), "größe");
        assert_eq!(normalize("a<B>&\"C\""), "a<_b>&\"_c\"");
    }

    #[test]
    fn test_normalize_trailing_upper_has_no_separator() {
        assert_eq!(normalize("aB"), "ab");
        assert_eq!(normalize("PostID"), "post_id");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["UUID", "UserID", "HTTPServer", "a", "someMixedValue", "X1Y2", "ÄpfelBaum"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn test_rust_ident() {
        assert_eq!(rust_ident("first_name"), "first_name");
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("2fa"), "_2fa");
        assert_eq!(rust_ident("a-b"), "a_b");
        assert_eq!(rust_ident(""), "_");
    }
}
