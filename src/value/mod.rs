//! Scalar and mapping value model (C2) — the generic value container used
//! wherever a blueprint field accepts free-form shape (metadata, `spec`,
//! filter values, ...).

pub mod mapping;
pub mod scalar;

pub use mapping::{InterpolatedString, MappingNode, StringSegment};
pub use scalar::{Scalar, ScalarKind};
