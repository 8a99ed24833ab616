//! JWCC → canonical JSON standardisation (C8 step 1, §4.8).
//!
//! Strips `//` line comments, `/* ... */` block comments, and trailing
//! commas before `]`/`}`, while leaving string contents untouched. Every
//! surviving character keeps its original byte offset so the node parser
//! can translate canonical positions straight back to the source document
//! without a second offset-fixup pass (§9: "never attempt to fix up
//! positions after parsing" — we simply never lose the mapping).

/// The canonical-JSON character stream: each entry is `(original_byte_offset, char)`.
pub struct Standardized {
    pub chars: Vec<(usize, char)>,
}

impl Standardized {
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.chars.iter().map(|(_, c)| *c).collect()
    }
}

pub fn standardize(src: &str) -> Standardized {
    let mut out: Vec<(usize, char)> = Vec::with_capacity(src.len());
    let mut chars = src.char_indices().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut pending: Option<Vec<(usize, char)>> = None;

    macro_rules! flush_pending {
        () => {
            if let Some(buf) = pending.take() {
                out.extend(buf);
            }
        };
    }

    while let Some((idx, ch)) = chars.next() {
        if in_string {
            out.push((idx, ch));
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                flush_pending!();
                in_string = true;
                out.push((idx, ch));
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                chars.next();
                for (_, c2) in chars.by_ref() {
                    if c2 == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev_star = false;
                for (_, c2) in chars.by_ref() {
                    if prev_star && c2 == '/' {
                        break;
                    }
                    prev_star = c2 == '*';
                }
            }
            ',' => {
                flush_pending!();
                pending = Some(vec![(idx, ch)]);
            }
            c if c.is_whitespace() => {
                if let Some(buf) = pending.as_mut() {
                    buf.push((idx, c));
                } else {
                    out.push((idx, c));
                }
            }
            ']' | '}' => {
                // a pending comma directly before a closing bracket is a
                // trailing comma: drop it and its intervening whitespace.
                pending = None;
                out.push((idx, ch));
            }
            other => {
                flush_pending!();
                out.push((idx, other));
            }
        }
    }
    flush_pending!();

    Standardized { chars: out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comment() {
        let s = standardize("{\n  \"a\": 1 // trailing\n}");
        assert_eq!(s.to_string(), "{\n  \"a\": 1 \n}");
    }

    #[test]
    fn strips_block_comment() {
        let s = standardize("{ /* c */ \"a\": 1 }");
        assert_eq!(s.to_string(), "{  \"a\": 1 }");
    }

    #[test]
    fn strips_trailing_comma_in_object() {
        let s = standardize(r#"{"a": 1,}"#);
        assert_eq!(s.to_string(), r#"{"a": 1}"#);
    }

    #[test]
    fn strips_trailing_comma_in_array() {
        let s = standardize("[1, 2, ]");
        assert_eq!(s.to_string(), "[1, 2 ]");
    }

    #[test]
    fn preserves_comma_like_text_inside_strings() {
        let s = standardize(r#"{"a": "x, ]"}"#);
        assert_eq!(s.to_string(), r#"{"a": "x, ]"}"#);
    }
}
