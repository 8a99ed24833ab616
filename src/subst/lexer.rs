//! Rune-oriented lexer for `${ ... }` expression bodies (C3).
//!
//! Hand-rolled rather than built on a table-driven crate like `logos`: the
//! lexer is handed the *host* starting [`Position`] directly and advances
//! it one rune at a time, so every token range is already in host
//! coordinates with no post-hoc fix-up (§9 "Host-offset arithmetic").

use crate::base::{Position, Range};
use crate::subst::errors::LexError;
use crate::subst::token::{Keyword, Token, TokenKind};

pub struct Lexer<'a> {
    src: &'a str,
    byte_pos: usize,
    pos: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, start: Position) -> Self {
        Self {
            src,
            byte_pos: 0,
            pos: start,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.byte_pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut chars = self.src[self.byte_pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.byte_pos += ch.len_utf8();
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Tokenize the entire body, collecting every token and every lex
    /// error (§4.3: multiple errors per body are accumulated).
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, Range::point(start)));
                break;
            };

            match ch {
                '.' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::Period, Range::new(start, self.pos)));
                }
                '[' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::LBracket, Range::new(start, self.pos)));
                }
                ']' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::RBracket, Range::new(start, self.pos)));
                }
                '(' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::LParen, Range::new(start, self.pos)));
                }
                ')' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::RParen, Range::new(start, self.pos)));
                }
                ',' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::Comma, Range::new(start, self.pos)));
                }
                '=' => {
                    self.bump();
                    tokens.push(Token::new(TokenKind::Equals, Range::new(start, self.pos)));
                }
                '"' => match self.scan_string(start) {
                    Ok(tok) => tokens.push(tok),
                    Err(e) => errors.push(e),
                },
                '-' if self.peek2().is_some_and(|c| c.is_ascii_digit()) => {
                    if let Some(tok) = self.scan_number(start, &mut errors) {
                        tokens.push(tok);
                    }
                }
                c if c.is_ascii_digit() => {
                    if let Some(tok) = self.scan_number(start, &mut errors) {
                        tokens.push(tok);
                    }
                }
                c if c.is_alphabetic() || c == '_' => {
                    tokens.push(self.scan_name(start));
                }
                other => {
                    self.bump();
                    errors.push(LexError::new(
                        format!("unexpected character '{other}'"),
                        start,
                    ));
                }
            }
        }

        (tokens, errors)
    }

    fn scan_string(&mut self, start: Position) -> Result<Token, LexError> {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::new("unterminated string literal", start));
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some('"') => {
                            value.push('"');
                            self.bump();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.bump();
                        }
                        Some(c) => {
                            value.push('\\');
                            value.push(c);
                            self.bump();
                        }
                        None => return Err(LexError::new("unterminated string literal", start)),
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
        Ok(Token::new(TokenKind::Str(value), Range::new(start, self.pos)))
    }

    fn scan_number(&mut self, start: Position, errors: &mut Vec<LexError>) -> Option<Token> {
        if self.peek() == Some('-') {
            self.bump();
        }
        let mut digits = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            digits.push(self.bump().unwrap());
        }

        let mut is_float = false;
        let mut frac = String::new();
        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump(); // '.'
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                frac.push(self.bump().unwrap());
            }
        }

        let range = Range::new(start, self.pos);
        let token = if is_float {
            let combined = format!("{digits}.{frac}");
            match combined.parse::<f64>() {
                Ok(v) => Some(Token::new(TokenKind::Float(v), range)),
                Err(_) => {
                    errors.push(LexError::new("invalid float literal", start));
                    None
                }
            }
        } else {
            match digits.parse::<i64>() {
                Ok(v) => Some(Token::new(TokenKind::Int(v), range)),
                Err(_) => {
                    errors.push(LexError::new("invalid integer literal", start));
                    None
                }
            }
        };

        // A digit run immediately followed by a letter is invalid — this is
        // how hex/binary literals like `0x23` are rejected (§8 scenario 6).
        // The offending rune is the letter itself, not the leading digits,
        // which still lex as a valid Int/Float token alongside the error.
        if matches!(self.peek(), Some(c) if c.is_alphabetic() || c == '_') {
            let bad_pos = self.pos;
            let bad = self.bump().unwrap();
            errors.push(LexError::new(format!("unexpected character '{bad}'"), bad_pos));
        }

        token
    }

    fn scan_name(&mut self, start: Position) -> Token {
        let mut text = String::new();
        text.push(self.bump().unwrap());
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '-') {
            text.push(self.bump().unwrap());
        }
        let range = Range::new(start, self.pos);
        if text == "true" {
            Token::new(TokenKind::Bool(true), range)
        } else if text == "false" {
            Token::new(TokenKind::Bool(false), range)
        } else if let Some(kw) = Keyword::from_text(&text) {
            Token::new(TokenKind::Keyword(kw), range)
        } else {
            Token::new(TokenKind::Ident(text), range)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(src, Position::start()).tokenize();
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_variables_path() {
        let kinds = toks("variables.env");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Variables),
                TokenKind::Period,
                TokenKind::Ident("env".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_bracketed_name() {
        let kinds = toks(r#"datasources["coreInfra.v1"]["topic.v2"][0]"#);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::DataSources),
                TokenKind::LBracket,
                TokenKind::Str("coreInfra.v1".into()),
                TokenKind::RBracket,
                TokenKind::LBracket,
                TokenKind::Str("topic.v2".into()),
                TokenKind::RBracket,
                TokenKind::LBracket,
                TokenKind::Int(0),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_hex_rejected() {
        let (tokens, errors) = Lexer::new("format(0x23)", Position::start()).tokenize();
        assert_eq!(errors.len(), 1);
        // `x` is the 8th rune: f,o,r,m,a,t,(,0 precede it -> column 9
        assert_eq!(errors[0].position, Position::new(1, 9));
        // the digit run before it still lexed as an Int token.
        assert!(tokens.iter().any(|t| matches!(t.kind, TokenKind::Int(0))));
    }

    #[test]
    fn lex_negative_int() {
        let kinds = toks("-3");
        assert_eq!(kinds, vec![TokenKind::Int(-3), TokenKind::Eof]);
    }

    #[test]
    fn lex_float() {
        let kinds = toks("3.5");
        assert_eq!(kinds, vec![TokenKind::Float(3.5), TokenKind::Eof]);
    }

    #[test]
    fn lex_string_with_escaped_quote() {
        let kinds = toks(r#""a\"b""#);
        assert_eq!(kinds, vec![TokenKind::Str("a\"b".into()), TokenKind::Eof]);
    }
}
