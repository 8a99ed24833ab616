//! Schema-level error taxonomy (§4.6, §7).

use crate::base::Position;
use crate::subst::errors::BodyError;

/// Stable reason codes for schema-shape failures (§4.6). Kept as an enum
/// rather than bare strings so callers can match exhaustively; `as_str()`
/// gives the stable wire-form identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaReason {
    InvalidDataSourceFieldType,
    InvalidValueType,
    InvalidDataSourceFilterOperator,
    InvalidTransformType,
    InvalidDependencyType,
    InvalidMap,
    InvalidArray,
    InvalidArrayOrString,
    InvalidResourceCondition,
    InvalidReferenceSubstitution,
    General,
}

impl SchemaReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaReason::InvalidDataSourceFieldType => "invalid_data_source_field_type",
            SchemaReason::InvalidValueType => "invalid_value_type",
            SchemaReason::InvalidDataSourceFilterOperator => "invalid_data_source_filter_operator",
            SchemaReason::InvalidTransformType => "invalid_transform_type",
            SchemaReason::InvalidDependencyType => "invalid_dependency_type",
            SchemaReason::InvalidMap => "invalid_map",
            SchemaReason::InvalidArray => "invalid_array",
            SchemaReason::InvalidArrayOrString => "invalid_array_or_string",
            SchemaReason::InvalidResourceCondition => "invalid_resource_condition",
            SchemaReason::InvalidReferenceSubstitution => "invalid_reference_substitution",
            SchemaReason::General => "general",
        }
    }
}

impl std::fmt::Display for SchemaReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single schema-shape failure, fatal to the entity it's attached to but
/// not to its siblings (§7 propagation policy).
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub reason: SchemaReason,
    pub message: String,
    pub position: Position,
    /// Populated only for `invalid_reference_substitution`: the lex/parse
    /// errors bubbled up from an embedded `${ ... }` expression.
    pub children: Vec<BodyError>,
}

impl SchemaError {
    pub fn new(reason: SchemaReason, message: impl Into<String>, position: Position) -> Self {
        Self {
            reason,
            message: message.into(),
            position,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<BodyError>) -> Self {
        self.children = children;
        self
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.reason, self.position.line, self.position.column, self.message
        )
    }
}

impl std::error::Error for SchemaError {}
