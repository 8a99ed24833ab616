//! Primitive scalar values (C2).

use crate::base::Range;

/// The kind of a [`Scalar`], used in error messages and schema validators
/// without re-matching the full enum everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Boolean => "boolean",
        };
        f.write_str(s)
    }
}

/// A scalar literal: string, integer, float, or boolean, with its source
/// range attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String, Range),
    Int(i64, Range),
    Float(f64, Range),
    Bool(bool, Range),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Str(..) => ScalarKind::String,
            Scalar::Int(..) => ScalarKind::Integer,
            Scalar::Float(..) => ScalarKind::Float,
            Scalar::Bool(..) => ScalarKind::Boolean,
        }
    }

    pub fn range(&self) -> Range {
        match self {
            Scalar::Str(_, r) | Scalar::Int(_, r) | Scalar::Float(_, r) | Scalar::Bool(_, r) => *r,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s, _) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v, _) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(v, _) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v, _) => Some(*v),
            _ => None,
        }
    }

    /// Structural equality ignoring source ranges — used by the test-only
    /// normaliser (§9 "Normalisation for tests").
    pub fn eq_ignoring_range(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Str(a, _), Scalar::Str(b, _)) => a == b,
            (Scalar::Int(a, _), Scalar::Int(b, _)) => a == b,
            (Scalar::Float(a, _), Scalar::Float(b, _)) => a == b,
            (Scalar::Bool(a, _), Scalar::Bool(b, _)) => a == b,
            _ => false,
        }
    }
}
