//! Lex and parse errors for the substitution language (§4.3, §4.4, §7).

use crate::base::{ColumnAccuracy, Position};

/// A token-level error from the substitution lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
    pub accuracy: ColumnAccuracy,
}

impl LexError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
            accuracy: ColumnAccuracy::Exact,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.message, self.position.line, self.position.column
        )
    }
}

/// A syntax error from the substitution parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
    pub accuracy: ColumnAccuracy,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
            accuracy: ColumnAccuracy::Exact,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.message, self.position.line, self.position.column
        )
    }
}

/// One lex or parse failure inside a single `${ ... }` body.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyError {
    Lex(LexError),
    Parse(ParseError),
}

impl BodyError {
    pub fn position(&self) -> Position {
        match self {
            BodyError::Lex(e) => e.position,
            BodyError::Parse(e) => e.position,
        }
    }

    pub fn accuracy(&self) -> ColumnAccuracy {
        match self {
            BodyError::Lex(e) => e.accuracy,
            BodyError::Parse(e) => e.accuracy,
        }
    }

    /// Downgrades this error's reported column to [`ColumnAccuracy::Approximate`]
    /// — used when the embedding host node (e.g. a YAML block literal, §4.7)
    /// only gives an approximate position to begin with, so a nested
    /// lex/parse error can't claim more precision than its anchor has.
    pub fn with_approximate_accuracy(mut self) -> Self {
        match &mut self {
            BodyError::Lex(e) => e.accuracy = ColumnAccuracy::Approximate,
            BodyError::Parse(e) => e.accuracy = ColumnAccuracy::Approximate,
        }
        self
    }

    pub fn message(&self) -> &str {
        match self {
            BodyError::Lex(e) => &e.message,
            BodyError::Parse(e) => &e.message,
        }
    }
}

impl std::fmt::Display for BodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyError::Lex(e) => e.fmt(f),
            BodyError::Parse(e) => e.fmt(f),
        }
    }
}

/// All failures accumulated while parsing one expression body (§4.4:
/// "Multiple errors per expression body are accumulated and returned as a
/// group"). The outer position is the `${` that opened the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionError {
    pub outer_position: Position,
    pub children: Vec<BodyError>,
}

impl std::fmt::Display for SubstitutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid substitution at {}:{} ({} error(s))",
            self.outer_position.line,
            self.outer_position.column,
            self.children.len()
        )
    }
}

impl std::error::Error for SubstitutionError {}
