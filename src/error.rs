//! The top-level error taxonomy (§7): lex, parse (substitution), schema,
//! cancelled, io. Each decode entry point returns either a `Blueprint` or
//! this error — never both (§7 "returns a Blueprint only if there were
//! zero errors").

use thiserror::Error;

use crate::schema::errors::SchemaError;
use crate::subst::errors::SubstitutionError;

#[derive(Debug, Error)]
pub enum BlueprintError {
    /// A token-level failure in the host document itself (malformed YAML
    /// or JWCC), as opposed to inside an embedded `${ ... }` body.
    #[error("lex error: {0}")]
    Lex(String),

    /// A substitution-body lex/parse failure that escaped schema
    /// attribution (most are instead wrapped as
    /// `Schema(reason = invalid_reference_substitution)`; this variant
    /// exists for callers that parse a bare expression directly).
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),

    /// One or more schema-shape failures, collected together (§7
    /// propagation policy: siblings keep decoding after one fails).
    #[error("{} schema error(s)", .0.len())]
    Schema(Vec<SchemaError>),

    /// The caller's `CancellationToken` was cancelled mid-decode; any
    /// partial AST is discarded (§5).
    #[error("decode cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<SchemaError> for BlueprintError {
    fn from(e: SchemaError) -> Self {
        BlueprintError::Schema(vec![e])
    }
}

impl From<Vec<SchemaError>> for BlueprintError {
    fn from(es: Vec<SchemaError>) -> Self {
        BlueprintError::Schema(es)
    }
}

pub type Result<T> = std::result::Result<T, BlueprintError>;
