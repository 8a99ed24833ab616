//! # blueprint-core
//!
//! Loader, schema-aware parser, and substitution-expression compiler for the
//! Blueprint infrastructure-as-code document format. Blueprint documents may
//! be authored in YAML or in JWCC (JSON With Commas and Comments); both
//! surface syntaxes decode into the same schema-typed AST, with every node
//! anchored to an exact source [`base::Range`].
//!
//! ## Module structure (dependency order)
//!
//! ```text
//! loader   → public entry points, DecodeOptions, cancellation wiring
//!   ↓
//! treeview → source-sequential TreeNode rebuild for position queries
//!   ↓
//! decode   → yaml.rs, jwcc (standardize + json_node) — surface syntax walkers
//!   ↓
//! schema   → Blueprint/Variable/Value/Include/Resource/... + DecodeNode decoders
//!   ↓
//! subst    → lexer, token, ast, parser, splitter — the `${ ... }` language
//!   ↓
//! value    → Scalar, MappingNode generic value tree
//!   ↓
//! base     → Position, Range, ColumnAccuracy, LineIndex
//! ```

/// Foundation types: source positions, ranges, the line index (C1).
pub mod base;

/// Scalar and mapping value model (C2).
pub mod value;

/// The substitution expression language: lexer, parser, splitter (C3-C5).
pub mod subst;

/// The typed Blueprint schema AST and its generic decoders (C6).
pub mod schema;

/// Surface-syntax decoders: YAML (C7) and JWCC (C8).
pub mod decode;

/// Source-sequential tree view for downstream tooling (C9).
pub mod treeview;

/// Cooperative cancellation for in-flight decodes.
pub mod cancel;

/// The crate-wide error taxonomy.
pub mod error;

/// Normalisation helpers for range-insensitive equality in tests.
pub mod normalize;

/// JSON re-emission / escaping helpers.
pub mod render;

/// Public loading API: `Format`, `DecodeOptions`, `load`, and the `from_*` entry points.
pub mod loader;

pub use base::{ColumnAccuracy, LineIndex, Position, Range};
pub use error::{BlueprintError, Result};
pub use loader::{from_jwcc_path, from_jwcc_str, from_yaml_path, from_yaml_str, load, DecodeOptions, Format, LoadResult};
pub use schema::ast::Blueprint;
pub use treeview::TreeNode;
