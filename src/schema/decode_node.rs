//! The `DecodeNode` seam (§9 "polymorphic decoding"): one trait, two
//! implementations (`crate::decode::yaml::YamlNode`, `crate::decode::jwcc::JwccNode`).
//! Every schema entity constructor is written once against this trait and
//! shared by both surface formats (C6, C7, C8).

use crate::base::{ColumnAccuracy, Range};
use crate::subst::HostOffset;

/// The three shapes a decoded node can take — used to resolve polymorphic
/// fields ("scalar or sequence", "map or `\"*\"`") by peeking at the kind
/// before dispatching to a typed helper (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// A position-tagged node from either surface syntax. Implementors own
/// their own node-tree representation; this trait exposes only what the
/// schema decoders need.
pub trait DecodeNode: Sized {
    fn kind(&self) -> NodeKind;
    fn range(&self) -> Range;

    fn as_str(&self) -> Option<&str>;
    fn as_int(&self) -> Option<i64>;
    fn as_float(&self) -> Option<f64>;
    fn as_bool(&self) -> Option<bool>;

    /// `true` if this is precisely the sentinel string `"*"` (DataSource
    /// `exports`, §4.6).
    fn is_star_sentinel(&self) -> bool {
        self.as_str() == Some("*")
    }

    /// Look up a field of a mapping node by name, in whatever order the
    /// implementor stores it; returns `None` for non-mapping nodes or a
    /// missing key.
    fn field(&self, name: &str) -> Option<&Self>;

    /// The key range of `name` in this mapping, if present.
    fn key_range(&self, name: &str) -> Option<Range>;

    /// Field names of a mapping node, in source insertion order (§8
    /// invariant 3).
    fn field_names(&self) -> Vec<String>;

    /// The elements of a sequence node, in source order.
    fn items(&self) -> Option<Vec<&Self>>;

    /// The host-offset context used to seed the interpolation splitter for
    /// this node's own text (accounts for the opening quote of quoted
    /// scalars, and YAML block-scalar approximate-column handling; §4.5,
    /// §4.7).
    fn host_offset(&self) -> HostOffset;

    /// The raw scalar text to run the splitter over — `None` for
    /// non-scalar nodes.
    fn raw_text(&self) -> Option<&str> {
        self.as_str()
    }

    /// Whether this node's own range has exactly-known columns. YAML block
    /// literal/folded scalars (`|`, `>`) only give an approximate position
    /// for their content (§4.7); every other node is exact.
    fn column_accuracy(&self) -> ColumnAccuracy {
        ColumnAccuracy::Exact
    }
}
