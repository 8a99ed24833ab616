//! Recursive-descent parser for the substitution grammar (C4, §4.4).
//!
//! Backtracking is implemented with an explicit position stack rather than
//! a parser-combinator library: productions that can fail after partial
//! consumption save `self.pos` on entry and restore it on failure.

use crate::base::Range;
use crate::subst::ast::{
    Argument, ChildRef, DataSourceRef, ElemRef, FunctionCall, Literal, Path, PathItem,
    ResourceRef, Substitution, SubstitutionKind, ValueRef, VariableRef,
};
use crate::subst::errors::ParseError;
use crate::subst::token::{Keyword, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Substitution, Vec<ParseError>> {
        let result = self.parse_substitution();
        match result {
            Some(s) if self.errors.is_empty() => {
                if !self.at(&TokenKind::Eof) {
                    let tok = self.current();
                    self.error(format!("unexpected trailing token {:?}", tok.kind), tok.range.start);
                }
                if self.errors.is_empty() {
                    Ok(s)
                } else {
                    Err(self.errors)
                }
            }
            _ => {
                if self.errors.is_empty() {
                    let tok = self.current();
                    self.error("expected a substitution expression", tok.range.start);
                }
                Err(self.errors)
            }
        }
    }

    // --- token plumbing -----------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        matches!(&self.current().kind, TokenKind::Keyword(k) if *k == kw)
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn save(&self) -> usize {
        self.pos
    }

    fn restore(&mut self, mark: usize) {
        self.pos = mark;
    }

    fn error(&mut self, message: impl Into<String>, at: crate::base::Position) {
        self.errors.push(ParseError::new(message, at));
    }

    // --- top-level dispatch ---------------------------------------------

    fn parse_substitution(&mut self) -> Option<Substitution> {
        match self.current().kind.clone() {
            TokenKind::Keyword(Keyword::Variables) => self.parse_var_ref(),
            TokenKind::Keyword(Keyword::Values) => self.parse_val_ref(),
            TokenKind::Keyword(Keyword::DataSources) => self.parse_ds_ref(),
            TokenKind::Keyword(Keyword::Children) => self.parse_child_ref(),
            TokenKind::Keyword(Keyword::Elem) => self.parse_elem_ref(),
            TokenKind::Keyword(Keyword::I) => {
                let tok = self.bump();
                Some(Substitution::new(SubstitutionKind::ElemIndex, tok.range))
            }
            TokenKind::Keyword(Keyword::Resources) => self.parse_resource_ref(),
            TokenKind::Ident(_) => self.parse_func_call_or_resource_ref(),
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Bool(_) | TokenKind::Str(_) => {
                self.parse_literal()
            }
            other => {
                let at = self.current().range.start;
                self.error(format!("unexpected token {other:?}"), at);
                None
            }
        }
    }

    fn parse_literal(&mut self) -> Option<Substitution> {
        let tok = self.bump();
        let kind = match tok.kind {
            TokenKind::Int(v) => Literal::Int(v),
            TokenKind::Float(v) => Literal::Float(v),
            TokenKind::Bool(v) => Literal::Bool(v),
            TokenKind::Str(v) => Literal::Str(v),
            _ => unreachable!("guarded by caller"),
        };
        Some(Substitution::new(SubstitutionKind::Literal(kind), tok.range))
    }

    // --- name / path accessors ------------------------------------------

    /// Consumes a bare `name` token (identifier, or a keyword spelled out as
    /// an ordinary word where the grammar accepts a generic `name`).
    fn expect_name(&mut self) -> Option<(String, Range)> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Ident(ref s) => {
                self.bump();
                Some((s.clone(), tok.range))
            }
            TokenKind::Keyword(kw) => {
                self.bump();
                Some((kw.as_str().to_string(), tok.range))
            }
            _ => {
                self.error("expected a name", tok.range.start);
                None
            }
        }
    }

    /// `nameAccessor = "." , name | "[" , nameStringLit , "]" ;`
    fn try_name_accessor(&mut self) -> Option<(String, Range)> {
        let mark = self.save();
        match self.current().kind.clone() {
            TokenKind::Period => {
                let start = self.bump().range.start;
                match self.expect_name() {
                    Some((name, r)) => Some((name, Range::new(start, r.end.unwrap_or(start)))),
                    None => {
                        self.restore(mark);
                        None
                    }
                }
            }
            TokenKind::LBracket => {
                // only claim this as a nameAccessor if a string literal follows;
                // otherwise this bracket belongs to an indexAccessor.
                if !matches!(self.peek_kind(1), TokenKind::Str(_)) {
                    return None;
                }
                let start = self.bump().range.start;
                let name = match self.current().kind.clone() {
                    TokenKind::Str(s) => {
                        self.bump();
                        s
                    }
                    _ => {
                        self.restore(mark);
                        return None;
                    }
                };
                if !self.at(&TokenKind::RBracket) {
                    self.error("expected ']'", self.current().range.start);
                    self.restore(mark);
                    return None;
                }
                let end = self.bump().range.end.unwrap_or(start);
                Some((name, Range::new(start, end)))
            }
            _ => None,
        }
    }

    fn peek_kind(&self, ahead: usize) -> TokenKind {
        let idx = (self.pos + ahead).min(self.tokens.len() - 1);
        self.tokens[idx].kind.clone()
    }

    /// `indexAccessor = "[" , [ intLit ] , "]" ;` — empty brackets default
    /// to index 0 (§8 boundary behaviour), and on mismatch the bracket is
    /// not consumed at all (§9 open question 3: explicit backtrack).
    fn try_index_accessor(&mut self) -> Option<(i64, Range)> {
        let mark = self.save();
        if !self.at(&TokenKind::LBracket) {
            return None;
        }
        // reserve brackets holding a string for try_name_accessor.
        if matches!(self.peek_kind(1), TokenKind::Str(_)) {
            return None;
        }
        let start = self.bump().range.start;
        let value = if let TokenKind::Int(v) = self.current().kind {
            self.bump();
            v
        } else {
            0
        };
        if !self.at(&TokenKind::RBracket) {
            self.error("expected ']'", self.current().range.start);
            self.restore(mark);
            return None;
        }
        let end = self.bump().range.end.unwrap_or(start);
        Some((value, Range::new(start, end)))
    }

    fn try_path_item(&mut self) -> Option<PathItem> {
        if let Some((name, _)) = self.try_name_accessor() {
            return Some(PathItem::Field(name));
        }
        if let Some((idx, _)) = self.try_index_accessor() {
            return Some(PathItem::Index(idx));
        }
        None
    }

    fn parse_path_rest(&mut self) -> Path {
        let mut path = Vec::new();
        while let Some(item) = self.try_path_item() {
            path.push(item);
        }
        path
    }

    // --- reference productions ------------------------------------------

    fn parse_var_ref(&mut self) -> Option<Substitution> {
        let start = self.bump().range.start; // "variables"
        let (name, name_range) = self.try_name_accessor().or_else(|| {
            self.error("expected a variable name", self.current().range.start);
            None
        })?;
        let end = name_range.end.unwrap_or(start);
        Some(Substitution::new(
            SubstitutionKind::Variable(VariableRef { name, path: Vec::new() }),
            Range::new(start, end),
        ))
    }

    fn parse_val_ref(&mut self) -> Option<Substitution> {
        let start = self.bump().range.start; // "values"
        let (name, name_range) = self.try_name_accessor().or_else(|| {
            self.error("expected a value name", self.current().range.start);
            None
        })?;
        let path = self.parse_path_rest();
        let end = self.last_consumed_end().unwrap_or(name_range.end.unwrap_or(start));
        Some(Substitution::new(
            SubstitutionKind::Value(ValueRef { name, path }),
            Range::new(start, end),
        ))
    }

    fn parse_ds_ref(&mut self) -> Option<Substitution> {
        let start = self.bump().range.start; // "datasources"
        let (data_source_name, _) = self.try_name_accessor().or_else(|| {
            self.error("expected a data source name", self.current().range.start);
            None
        })?;
        let (field_name, field_range) = self.try_name_accessor().or_else(|| {
            self.error("expected a data source field name", self.current().range.start);
            None
        })?;
        let idx = self.try_index_accessor();
        let end = idx
            .as_ref()
            .and_then(|(_, r)| r.end)
            .unwrap_or(field_range.end.unwrap_or(start));
        Some(Substitution::new(
            SubstitutionKind::DataSource(DataSourceRef {
                data_source_name,
                field_name,
                primitive_arr_index: idx.map(|(v, _)| v),
            }),
            Range::new(start, end),
        ))
    }

    fn parse_child_ref(&mut self) -> Option<Substitution> {
        let start = self.bump().range.start; // "children"
        let (name, _) = self.try_name_accessor().or_else(|| {
            self.error("expected a child blueprint name", self.current().range.start);
            None
        })?;
        let (first, first_range) = self.try_name_accessor().or_else(|| {
            self.error("expected a child blueprint field", self.current().range.start);
            None
        })?;
        let mut path = vec![PathItem::Field(first)];
        path.extend(self.parse_path_rest());
        let end = self.last_consumed_end().unwrap_or(first_range.end.unwrap_or(start));
        Some(Substitution::new(
            SubstitutionKind::Child(ChildRef { name, path }),
            Range::new(start, end),
        ))
    }

    fn parse_elem_ref(&mut self) -> Option<Substitution> {
        let start = self.bump().range.start; // "elem"
        let path = self.parse_path_rest();
        let end = self.last_consumed_end().unwrap_or(start);
        Some(Substitution::new(
            SubstitutionKind::Elem(ElemRef { path }),
            Range::new(start, end),
        ))
    }

    /// `resourceRef = ( "resources" , nameAccessor | name ) , [ nameAccessor , { nameAccessor | indexAccessor } ] ;`
    ///
    /// The leading index directly after the resource name (as in
    /// `resources.contentBuckets[2].state...`) is the `each`-template index;
    /// it is lifted out of the generic path list rather than treated as an
    /// ordinary path segment.
    fn parse_resource_ref(&mut self) -> Option<Substitution> {
        let start = self.current().range.start;
        self.bump(); // "resources"
        let (name, name_range) = self.try_name_accessor().or_else(|| {
            self.error("expected a resource name", self.current().range.start);
            None
        })?;
        self.finish_resource_ref(name, start, name_range.end.unwrap_or(start))
    }

    fn parse_func_call_or_resource_ref(&mut self) -> Option<Substitution> {
        let mark = self.save();
        let (name, name_range) = self.expect_name()?;
        if self.at(&TokenKind::LParen) {
            return self.finish_func_call(name, name_range.start);
        }
        self.restore(mark);
        let (name, name_range) = self.expect_name()?;
        self.finish_resource_ref(name, name_range.start, name_range.end.unwrap_or(name_range.start))
    }

    fn finish_resource_ref(&mut self, name: String, start: crate::base::Position, fallback_end: crate::base::Position) -> Option<Substitution> {
        let mut raw = Vec::new();
        while let Some(item) = self.try_path_item() {
            raw.push(item);
        }
        let (each_index, path) = match raw.first() {
            Some(PathItem::Index(n)) => (Some(*n), raw[1..].to_vec()),
            _ => (None, raw),
        };
        let end = self.last_consumed_end().unwrap_or(fallback_end);
        Some(Substitution::new(
            SubstitutionKind::Resource(ResourceRef { name, each_index, path }),
            Range::new(start, end),
        ))
    }

    fn finish_func_call(&mut self, name: String, start: crate::base::Position) -> Option<Substitution> {
        self.bump(); // "("
        let mut args = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                let arg = self.parse_func_arg()?;
                args.push(arg);
                if self.at(&TokenKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        if !self.at(&TokenKind::RParen) {
            self.error("expected ')'", self.current().range.start);
            return None;
        }
        let paren_end = self.bump().range.end.unwrap_or(start);
        let path = self.parse_path_rest();
        let end = self.last_consumed_end().unwrap_or(paren_end);
        Some(Substitution::new(
            SubstitutionKind::FunctionCall(FunctionCall { name, args, path }),
            Range::new(start, end),
        ))
    }

    /// Peeks for a bare name without recording an error on mismatch — used
    /// by speculative probes (`funcArg`'s `name =` prefix) where failure to
    /// match is an ordinary, expected outcome, not a parse error.
    fn peek_name(&self) -> Option<(String, Range)> {
        let tok = self.current();
        match &tok.kind {
            TokenKind::Ident(s) => Some((s.clone(), tok.range)),
            TokenKind::Keyword(kw) => Some((kw.as_str().to_string(), tok.range)),
            _ => None,
        }
    }

    /// `funcArg = [ name , "=" ] , substitution ;`
    fn parse_func_arg(&mut self) -> Option<Argument> {
        if let Some((name, _)) = self.peek_name() {
            let mark = self.save();
            self.bump();
            if self.at(&TokenKind::Equals) {
                self.bump();
                let value = self.parse_substitution()?;
                return Some(Argument { name: Some(name), value });
            }
            self.restore(mark);
        }
        let value = self.parse_substitution()?;
        Some(Argument { name: None, value })
    }

    fn last_consumed_end(&self) -> Option<crate::base::Position> {
        if self.pos == 0 {
            return None;
        }
        self.tokens[self.pos - 1].range.end
    }
}
