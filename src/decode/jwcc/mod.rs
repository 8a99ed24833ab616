//! JWCC decoder (C8): standardise to canonical JSON, then parse a
//! position-preserving node tree (§4.8).

mod json_node;
mod standardize;

pub use json_node::JwccNode;

use crate::base::LineIndex;
use crate::error::BlueprintError;

/// Parses `src` (a JWCC document: JSON plus comments and trailing commas)
/// into a root [`JwccNode`], with every node's `Range` anchored to the
/// *original* source text.
pub fn parse(src: &str) -> Result<JwccNode, BlueprintError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let standardized = standardize::standardize(src);
    let line_index = LineIndex::new(src.as_bytes());
    json_node::parse(&standardized.chars, &line_index, src).map_err(BlueprintError::Lex)
}
