//! The generic recursive value container used inside `metadata`, `spec`,
//! and other free-form fields (C2).

use indexmap::IndexMap;

use crate::base::Range;
use crate::subst::ast::Substitution;
use crate::value::scalar::Scalar;

/// One piece of an interpolated string: either a run of literal text, or a
/// parsed `${ ... }` expression (C5).
#[derive(Debug, Clone, PartialEq)]
pub enum StringSegment {
    Literal { text: String, range: Range },
    Expression { subst: Substitution, range: Range },
}

impl StringSegment {
    pub fn range(&self) -> Range {
        match self {
            StringSegment::Literal { range, .. } => *range,
            StringSegment::Expression { range, .. } => *range,
        }
    }

    pub fn eq_ignoring_range(&self, other: &StringSegment) -> bool {
        match (self, other) {
            (StringSegment::Literal { text: a, .. }, StringSegment::Literal { text: b, .. }) => a == b,
            (StringSegment::Expression { subst: a, .. }, StringSegment::Expression { subst: b, .. }) => {
                a.eq_ignoring_range(b)
            }
            _ => false,
        }
    }
}

/// A host string decomposed into literal and expression segments (C5
/// output). A string field with no `${ }` inside decodes to a single
/// `Literal` segment.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedString {
    pub segments: Vec<StringSegment>,
    pub range: Range,
}

impl InterpolatedString {
    /// True if this string contains no substitution expressions at all.
    pub fn is_plain(&self) -> bool {
        matches!(self.segments.as_slice(), [StringSegment::Literal { .. }] | [])
    }

    /// The concatenation of every literal segment, ignoring expressions —
    /// useful for fields that are schema-typed as plain strings but still
    /// run through the splitter (so `${` appearing inside an unexpected
    /// field is still reported rather than silently ignored).
    pub fn plain_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [StringSegment::Literal { text, .. }] => Some(text),
            [] => Some(""),
            _ => None,
        }
    }

    /// Structural equality ignoring ranges (§9 "Normalisation for tests").
    pub fn eq_ignoring_range(&self, other: &InterpolatedString) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a.eq_ignoring_range(b))
    }
}

/// The generic, recursive value container (§3.2). Exactly one of its four
/// shapes is populated for any given node.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingNode {
    Scalar(Scalar),
    Interpolated(InterpolatedString),
    /// An ordered set of named fields. Key order is insertion order from
    /// the source document (§8 invariant 3); `key_ranges` tracks the
    /// source range of each key token separately from its value.
    Fields {
        entries: IndexMap<String, MappingNode>,
        key_ranges: IndexMap<String, Range>,
        range: Range,
    },
    Items {
        items: Vec<MappingNode>,
        range: Range,
    },
}

impl MappingNode {
    pub fn range(&self) -> Range {
        match self {
            MappingNode::Scalar(s) => s.range(),
            MappingNode::Interpolated(i) => i.range,
            MappingNode::Fields { range, .. } => *range,
            MappingNode::Items { range, .. } => *range,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            MappingNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&IndexMap<String, MappingNode>> {
        match self {
            MappingNode::Fields { entries, .. } => Some(entries),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&[MappingNode]> {
        match self {
            MappingNode::Items { items, .. } => Some(items),
            _ => None,
        }
    }

    pub fn is_fields(&self) -> bool {
        matches!(self, MappingNode::Fields { .. })
    }

    pub fn is_items(&self) -> bool {
        matches!(self, MappingNode::Items { .. })
    }

    /// Convenience used by polymorphic decoders: a node is "string-like" if
    /// it's a scalar string or an interpolated string.
    pub fn is_string_like(&self) -> bool {
        matches!(self, MappingNode::Scalar(Scalar::Str(..)) | MappingNode::Interpolated(_))
    }

    /// Structural equality ignoring ranges (§9 "Normalisation for tests"):
    /// lets a YAML-decoded and a JSON-decoded tree compare equal even
    /// though only the former carries meaningful positions everywhere.
    pub fn eq_ignoring_range(&self, other: &MappingNode) -> bool {
        match (self, other) {
            (MappingNode::Scalar(a), MappingNode::Scalar(b)) => a.eq_ignoring_range(b),
            (MappingNode::Interpolated(a), MappingNode::Interpolated(b)) => a.eq_ignoring_range(b),
            (MappingNode::Fields { entries: a, .. }, MappingNode::Fields { entries: b, .. }) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.eq_ignoring_range(vb))
            }
            (MappingNode::Items { items: a, .. }, MappingNode::Items { items: b, .. }) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_ignoring_range(y))
            }
            _ => false,
        }
    }

    /// Re-emits this node as canonical JSON (§6.3 escape table; §8 invariant
    /// 4 "round-trip normalisation"). An `Interpolated` node is re-emitted
    /// with its expression segments printed back through
    /// [`crate::subst::Substitution`]'s `Display` impl, so the resulting
    /// JSON string is re-decodable into a structurally equal `MappingNode`.
    pub fn to_json_string(&self) -> String {
        match self {
            MappingNode::Scalar(Scalar::Str(s, _)) => format!("\"{}\"", crate::render::escape_json_string(s)),
            MappingNode::Scalar(Scalar::Int(v, _)) => v.to_string(),
            MappingNode::Scalar(Scalar::Float(v, _)) => v.to_string(),
            MappingNode::Scalar(Scalar::Bool(v, _)) => v.to_string(),
            MappingNode::Interpolated(interp) => {
                let mut raw = String::new();
                for seg in &interp.segments {
                    match seg {
                        StringSegment::Literal { text, .. } => raw.push_str(text),
                        StringSegment::Expression { subst, .. } => {
                            raw.push_str("${");
                            raw.push_str(&subst.to_string());
                            raw.push('}');
                        }
                    }
                }
                format!("\"{}\"", crate::render::escape_json_string(&raw))
            }
            MappingNode::Fields { entries, .. } => {
                let body: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("\"{}\":{}", crate::render::escape_json_string(k), v.to_json_string()))
                    .collect();
                format!("{{{}}}", body.join(","))
            }
            MappingNode::Items { items, .. } => {
                let body: Vec<String> = items.iter().map(MappingNode::to_json_string).collect();
                format!("[{}]", body.join(","))
            }
        }
    }
}
