//! Interpolation splitter (C5, §4.5): turns a host string into a sequence
//! of literal/expression [`StringSegment`]s, honouring nested quoted
//! strings inside `${ ... }` so that `${ "contains ${embedded}" }` is one
//! expression, not two (§8 boundary behaviour).

use crate::base::{Position, Range};
use crate::subst::errors::{BodyError, SubstitutionError};
use crate::subst::lexer::Lexer;
use crate::subst::parser::Parser as SubstParser;
use crate::value::mapping::StringSegment;

/// Host-offset context the splitter needs to seed its starting position
/// (§9 "host-offset arithmetic"). `preceding_chars` accounts for an opening
/// quote that sits before the scalar's content on the same line (1 for a
/// quoted YAML/JSON scalar, 0 for a bare/unquoted one).
#[derive(Debug, Clone, Copy)]
pub struct HostOffset {
    pub start: Position,
    pub preceding_chars: usize,
}

impl HostOffset {
    pub fn new(start: Position) -> Self {
        Self { start, preceding_chars: 0 }
    }

    pub fn with_preceding_chars(mut self, n: usize) -> Self {
        self.preceding_chars = n;
        self
    }

    fn initial_position(&self) -> Position {
        let mut p = self.start;
        for _ in 0..self.preceding_chars {
            p = p.advance('x');
        }
        p
    }
}

/// Splits `text` into literal and expression segments, starting at `host`.
/// On any lex/parse failure inside an embedded expression, that failure is
/// collected; the caller receives either a complete `InterpolatedString`'s
/// worth of segments or the grouped error (§4.5 step 6: partial output for
/// the failing string field is discarded).
pub fn split(text: &str, host: HostOffset) -> Result<(Vec<StringSegment>, Range), SubstitutionError> {
    let mut segments = Vec::new();
    let mut errors: Vec<BodyError> = Vec::new();

    let doc_start = host.initial_position();
    let mut pos = doc_start;
    let mut byte_pos = 0usize;

    let mut literal_start_byte = 0usize;
    let mut literal_start_pos = pos;

    let mut in_expression = false;
    let mut in_quoted_string = false;
    let mut expr_start_byte = 0usize;
    let mut expr_start_pos = pos;
    let mut expr_outer_start = pos;

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte_idx, ch) = chars[i];

        if !in_expression {
            if ch == '$' && chars.get(i + 1).map(|(_, c)| *c) == Some('{') {
                if byte_idx > literal_start_byte {
                    segments.push(StringSegment::Literal {
                        text: text[literal_start_byte..byte_idx].to_string(),
                        range: Range::new(literal_start_pos, pos),
                    });
                }
                expr_outer_start = pos;
                // consume '$' and '{'
                pos = pos.advance(ch);
                byte_pos = byte_idx + ch.len_utf8();
                i += 1;
                let (next_byte, next_ch) = chars[i];
                pos = pos.advance(next_ch);
                byte_pos = next_byte + next_ch.len_utf8();
                i += 1;
                in_expression = true;
                expr_start_byte = byte_pos;
                expr_start_pos = pos;
                continue;
            }
            pos = pos.advance(ch);
            byte_pos = byte_idx + ch.len_utf8();
            i += 1;
            continue;
        }

        // in_expression
        if in_quoted_string {
            if ch == '\\' {
                pos = pos.advance(ch);
                byte_pos = byte_idx + ch.len_utf8();
                i += 1;
                if i < chars.len() {
                    let (eb, ec) = chars[i];
                    pos = pos.advance(ec);
                    byte_pos = eb + ec.len_utf8();
                    i += 1;
                }
                continue;
            }
            if ch == '"' {
                in_quoted_string = false;
            }
            pos = pos.advance(ch);
            byte_pos = byte_idx + ch.len_utf8();
            i += 1;
            continue;
        }

        if ch == '"' {
            in_quoted_string = true;
            pos = pos.advance(ch);
            byte_pos = byte_idx + ch.len_utf8();
            i += 1;
            continue;
        }

        if ch == '}' {
            let body = &text[expr_start_byte..byte_idx];
            let body_start_pos = expr_start_pos;
            pos = pos.advance(ch);
            byte_pos = byte_idx + ch.len_utf8();
            i += 1;

            match parse_body(body, body_start_pos) {
                Ok(subst) => {
                    segments.push(StringSegment::Expression {
                        subst,
                        range: Range::new(expr_outer_start, pos),
                    });
                }
                Err(mut body_errors) => errors.append(&mut body_errors),
            }

            in_expression = false;
            literal_start_byte = byte_pos;
            literal_start_pos = pos;
            continue;
        }

        pos = pos.advance(ch);
        byte_pos = byte_idx + ch.len_utf8();
        i += 1;
    }

    if !errors.is_empty() {
        return Err(SubstitutionError {
            outer_position: doc_start,
            children: errors,
        });
    }

    if byte_pos > literal_start_byte {
        segments.push(StringSegment::Literal {
            text: text[literal_start_byte..byte_pos].to_string(),
            range: Range::new(literal_start_pos, pos),
        });
    }

    let overall_range = Range::new(doc_start, pos);
    Ok((segments, overall_range))
}

fn parse_body(body: &str, start: Position) -> Result<crate::subst::ast::Substitution, Vec<BodyError>> {
    let (tokens, lex_errors) = Lexer::new(body, start).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors.into_iter().map(BodyError::Lex).collect());
    }
    SubstParser::new(tokens)
        .parse()
        .map_err(|errs| errs.into_iter().map(BodyError::Parse).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_literal_single_segment() {
        let (segs, _) = split("hello world", HostOffset::new(Position::start())).unwrap();
        assert_eq!(segs.len(), 1);
        assert!(matches!(&segs[0], StringSegment::Literal { text, .. } if text == "hello world"));
    }

    #[test]
    fn embedded_quoted_expression_is_single_segment() {
        let (segs, _) = split(
            r#"${ "contains ${embedded}" }"#,
            HostOffset::new(Position::start()),
        )
        .unwrap();
        assert_eq!(segs.len(), 1);
        assert!(matches!(&segs[0], StringSegment::Expression { .. }));
    }

    #[test]
    fn literal_then_expression() {
        let (segs, _) = split("env is ${variables.env}", HostOffset::new(Position::start())).unwrap();
        assert_eq!(segs.len(), 2);
        assert!(matches!(&segs[0], StringSegment::Literal { text, .. } if text == "env is "));
        assert!(matches!(&segs[1], StringSegment::Expression { .. }));
    }
}
