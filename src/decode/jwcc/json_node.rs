//! Position-preserving JSON node parser (C8 step 2, §4.8).
//!
//! A small hand-rolled recursive-descent parser over the canonical
//! character stream produced by [`super::standardize`] — not
//! `serde_json::Value`, which discards source positions just as
//! `serde_yaml::Value` does.

use crate::base::{LineIndex, Position, Range};
use crate::schema::decode_node::{DecodeNode, NodeKind};
use crate::subst::HostOffset;

#[derive(Debug, Clone, PartialEq)]
enum ScalarValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone)]
enum Payload {
    Scalar(ScalarValue),
    Sequence(Vec<JwccNode>),
    Mapping(Vec<(String, JwccNode, Range)>),
}

/// One node of the decoded JWCC tree.
#[derive(Debug, Clone)]
pub struct JwccNode {
    payload: Payload,
    range: Range,
}

impl DecodeNode for JwccNode {
    fn kind(&self) -> NodeKind {
        match &self.payload {
            Payload::Scalar(_) => NodeKind::Scalar,
            Payload::Sequence(_) => NodeKind::Sequence,
            Payload::Mapping(_) => NodeKind::Mapping,
        }
    }

    fn range(&self) -> Range {
        self.range
    }

    fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Scalar(ScalarValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match &self.payload {
            Payload::Scalar(ScalarValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match &self.payload {
            Payload::Scalar(ScalarValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match &self.payload {
            Payload::Scalar(ScalarValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    fn field(&self, name: &str) -> Option<&Self> {
        match &self.payload {
            Payload::Mapping(entries) => entries.iter().find(|(k, _, _)| k == name).map(|(_, v, _)| v),
            _ => None,
        }
    }

    fn key_range(&self, name: &str) -> Option<Range> {
        match &self.payload {
            Payload::Mapping(entries) => entries.iter().find(|(k, _, _)| k == name).map(|(_, _, r)| *r),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<String> {
        match &self.payload {
            Payload::Mapping(entries) => entries.iter().map(|(k, _, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }

    fn items(&self) -> Option<Vec<&Self>> {
        match &self.payload {
            Payload::Sequence(items) => Some(items.iter().collect()),
            _ => None,
        }
    }

    fn host_offset(&self) -> HostOffset {
        // every JSON string is quoted; the splitter must start past the
        // opening quote (§4.5).
        HostOffset::new(self.range.start).with_preceding_chars(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct JsonParseError {
    message: String,
    offset: usize,
}

struct Tokenizer<'a> {
    chars: &'a [(usize, char)],
    pos: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Eof,
}

struct Token {
    tok: Tok,
    start_offset: usize,
    end_offset: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(chars: &'a [(usize, char)]) -> Self {
        Self { chars, pos: 0 }
    }

    fn peek_char(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn end_offset_after(&self, idx: usize) -> usize {
        // original byte offset just past the char at canonical index `idx`
        if idx + 1 < self.chars.len() {
            self.chars[idx + 1].0
        } else {
            self.chars[idx].0 + self.chars[idx].1.len_utf8()
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some((_, c)) if c.is_whitespace()) {
            self.next_char();
        }
    }

    fn next_token(&mut self) -> Result<Token, JsonParseError> {
        self.skip_whitespace();
        let Some((offset, ch)) = self.peek_char() else {
            let end = self.chars.last().map(|(o, c)| o + c.len_utf8()).unwrap_or(0);
            return Ok(Token { tok: Tok::Eof, start_offset: end, end_offset: end });
        };
        let start_idx = self.pos;
        match ch {
            '{' => {
                self.next_char();
                Ok(Token { tok: Tok::LBrace, start_offset: offset, end_offset: self.end_offset_after(start_idx) })
            }
            '}' => {
                self.next_char();
                Ok(Token { tok: Tok::RBrace, start_offset: offset, end_offset: self.end_offset_after(start_idx) })
            }
            '[' => {
                self.next_char();
                Ok(Token { tok: Tok::LBracket, start_offset: offset, end_offset: self.end_offset_after(start_idx) })
            }
            ']' => {
                self.next_char();
                Ok(Token { tok: Tok::RBracket, start_offset: offset, end_offset: self.end_offset_after(start_idx) })
            }
            ':' => {
                self.next_char();
                Ok(Token { tok: Tok::Colon, start_offset: offset, end_offset: self.end_offset_after(start_idx) })
            }
            ',' => {
                self.next_char();
                Ok(Token { tok: Tok::Comma, start_offset: offset, end_offset: self.end_offset_after(start_idx) })
            }
            '"' => self.scan_string(offset),
            c if c == '-' || c.is_ascii_digit() => self.scan_number(offset),
            't' => self.scan_literal("true", Tok::Bool(true), offset),
            'f' => self.scan_literal("false", Tok::Bool(false), offset),
            'n' => self.scan_literal("null", Tok::Null, offset),
            other => Err(JsonParseError { message: format!("unexpected character '{other}'"), offset }),
        }
    }

    fn scan_literal(&mut self, word: &str, tok: Tok, offset: usize) -> Result<Token, JsonParseError> {
        for expect in word.chars() {
            match self.next_char() {
                Some((_, c)) if c == expect => {}
                _ => return Err(JsonParseError { message: format!("expected '{word}'"), offset }),
            }
        }
        let end_idx = self.pos - 1;
        Ok(Token { tok, start_offset: offset, end_offset: self.end_offset_after(end_idx) })
    }

    fn scan_string(&mut self, offset: usize) -> Result<Token, JsonParseError> {
        self.next_char(); // opening quote
        let mut text = String::new();
        loop {
            match self.next_char() {
                None => return Err(JsonParseError { message: "unterminated string".into(), offset }),
                Some((_, '"')) => break,
                Some((_, '\\')) => match self.next_char() {
                    Some((_, '"')) => text.push('"'),
                    Some((_, '\\')) => text.push('\\'),
                    Some((_, '/')) => text.push('/'),
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, 'r')) => text.push('\r'),
                    Some((_, 'b')) => text.push('\u{8}'),
                    Some((_, 'f')) => text.push('\u{c}'),
                    Some((_, 'u')) => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let (_, c) = self.next_char().ok_or(JsonParseError {
                                message: "truncated \\u escape".into(),
                                offset,
                            })?;
                            let digit = c.to_digit(16).ok_or(JsonParseError {
                                message: "invalid \\u escape".into(),
                                offset,
                            })?;
                            code = code * 16 + digit;
                        }
                        if let Some(c) = char::from_u32(code) {
                            text.push(c);
                        }
                    }
                    _ => return Err(JsonParseError { message: "invalid escape sequence".into(), offset }),
                },
                Some((_, c)) => text.push(c),
            }
        }
        let end_idx = self.pos - 1;
        Ok(Token { tok: Tok::Str(text), start_offset: offset, end_offset: self.end_offset_after(end_idx) })
    }

    fn scan_number(&mut self, offset: usize) -> Result<Token, JsonParseError> {
        let mut text = String::new();
        if matches!(self.peek_char(), Some((_, '-'))) {
            text.push(self.next_char().unwrap().1);
        }
        while matches!(self.peek_char(), Some((_, c)) if c.is_ascii_digit()) {
            text.push(self.next_char().unwrap().1);
        }
        let mut is_float = false;
        if matches!(self.peek_char(), Some((_, '.'))) {
            is_float = true;
            text.push(self.next_char().unwrap().1);
            while matches!(self.peek_char(), Some((_, c)) if c.is_ascii_digit()) {
                text.push(self.next_char().unwrap().1);
            }
        }
        if matches!(self.peek_char(), Some((_, 'e' | 'E'))) {
            is_float = true;
            text.push(self.next_char().unwrap().1);
            if matches!(self.peek_char(), Some((_, '+' | '-'))) {
                text.push(self.next_char().unwrap().1);
            }
            while matches!(self.peek_char(), Some((_, c)) if c.is_ascii_digit()) {
                text.push(self.next_char().unwrap().1);
            }
        }
        let end_idx = self.pos - 1;
        let end_offset = self.end_offset_after(end_idx);
        if is_float {
            text.parse::<f64>()
                .map(|v| Token { tok: Tok::Float(v), start_offset: offset, end_offset })
                .map_err(|_| JsonParseError { message: "invalid number literal".into(), offset })
        } else {
            text.parse::<i64>()
                .map(|v| Token { tok: Tok::Int(v), start_offset: offset, end_offset })
                .map_err(|_| JsonParseError { message: "invalid number literal".into(), offset })
        }
    }
}

struct NodeParser<'a> {
    tokenizer: Tokenizer<'a>,
    lookahead: Option<Token>,
    line_index: &'a LineIndex,
    source: &'a str,
}

impl<'a> NodeParser<'a> {
    fn new(chars: &'a [(usize, char)], line_index: &'a LineIndex, source: &'a str) -> Self {
        Self { tokenizer: Tokenizer::new(chars), lookahead: None, line_index, source }
    }

    fn peek(&mut self) -> Result<&Token, JsonParseError> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.tokenizer.next_token()?);
        }
        Ok(self.lookahead.as_ref().unwrap())
    }

    fn bump(&mut self) -> Result<Token, JsonParseError> {
        if let Some(t) = self.lookahead.take() {
            return Ok(t);
        }
        self.tokenizer.next_token()
    }

    fn pos_at(&self, offset: usize) -> Position {
        self.line_index.position_from_offset(self.source, offset)
    }

    fn parse_value(&mut self) -> Result<JwccNode, JsonParseError> {
        let tok = self.bump()?;
        let start = self.pos_at(tok.start_offset);
        match tok.tok {
            Tok::Str(s) => {
                let end = self.pos_at(tok.end_offset);
                Ok(JwccNode { payload: Payload::Scalar(ScalarValue::Str(s)), range: Range::new(start, end) })
            }
            Tok::Int(v) => {
                let end = self.pos_at(tok.end_offset);
                Ok(JwccNode { payload: Payload::Scalar(ScalarValue::Int(v)), range: Range::new(start, end) })
            }
            Tok::Float(v) => {
                let end = self.pos_at(tok.end_offset);
                Ok(JwccNode { payload: Payload::Scalar(ScalarValue::Float(v)), range: Range::new(start, end) })
            }
            Tok::Bool(v) => {
                let end = self.pos_at(tok.end_offset);
                Ok(JwccNode { payload: Payload::Scalar(ScalarValue::Bool(v)), range: Range::new(start, end) })
            }
            Tok::Null => {
                let end = self.pos_at(tok.end_offset);
                Ok(JwccNode { payload: Payload::Scalar(ScalarValue::Null), range: Range::new(start, end) })
            }
            Tok::LBracket => self.parse_array(start),
            Tok::LBrace => self.parse_object(start),
            other => Err(JsonParseError { message: format!("unexpected token {other:?}"), offset: tok.start_offset }),
        }
    }

    fn parse_array(&mut self, start: Position) -> Result<JwccNode, JsonParseError> {
        let mut items = Vec::new();
        if self.peek()?.tok != Tok::RBracket {
            loop {
                items.push(self.parse_value()?);
                if self.peek()?.tok == Tok::Comma {
                    self.bump()?;
                    continue;
                }
                break;
            }
        }
        let close = self.bump()?;
        if close.tok != Tok::RBracket {
            return Err(JsonParseError { message: "expected ']'".into(), offset: close.start_offset });
        }
        let end = self.pos_at(close.end_offset);
        Ok(JwccNode { payload: Payload::Sequence(items), range: Range::new(start, end) })
    }

    fn parse_object(&mut self, start: Position) -> Result<JwccNode, JsonParseError> {
        let mut entries = Vec::new();
        if self.peek()?.tok != Tok::RBrace {
            loop {
                let key_tok = self.bump()?;
                let key = match key_tok.tok {
                    Tok::Str(s) => s,
                    other => {
                        return Err(JsonParseError {
                            message: format!("expected string key, found {other:?}"),
                            offset: key_tok.start_offset,
                        })
                    }
                };
                let key_range = Range::new(self.pos_at(key_tok.start_offset), self.pos_at(key_tok.end_offset));
                let colon = self.bump()?;
                if colon.tok != Tok::Colon {
                    return Err(JsonParseError { message: "expected ':'".into(), offset: colon.start_offset });
                }
                let value = self.parse_value()?;
                entries.push((key, value, key_range));
                if self.peek()?.tok == Tok::Comma {
                    self.bump()?;
                    continue;
                }
                break;
            }
        }
        let close = self.bump()?;
        if close.tok != Tok::RBrace {
            return Err(JsonParseError { message: "expected '}'".into(), offset: close.start_offset });
        }
        let end = self.pos_at(close.end_offset);
        Ok(JwccNode { payload: Payload::Mapping(entries), range: Range::new(start, end) })
    }
}

pub fn parse(chars: &[(usize, char)], line_index: &LineIndex, source: &str) -> Result<JwccNode, String> {
    let mut parser = NodeParser::new(chars, line_index, source);
    parser.parse_value().map_err(|e| {
        let pos = parser.pos_at(e.offset);
        format!("{} at {}:{}", e.message, pos.line, pos.column)
    })
}
