//! The typed Blueprint schema AST (C6) and the generic `DecodeNode`-based
//! decoders shared by the YAML and JWCC surface formats.

pub mod ast;
pub mod decode;
pub mod decode_node;
pub mod errors;

pub use ast::*;
pub use decode_node::{DecodeNode, NodeKind};
pub use errors::{SchemaError, SchemaReason};
