//! Normalisation for tests (§9): deep-equality between a YAML-decoded and
//! a JWCC-decoded `Blueprint` that ignores source `Range`s entirely.
//!
//! Rather than cloning the AST with every `Range` zeroed out and then
//! relying on derived `PartialEq`, each entity carries its own
//! `eq_ignoring_range` comparison next to its derived `PartialEq` — the
//! comparison walks exactly the structure `PartialEq` would, just without
//! the range fields. This avoids needing a sentinel "cleared" `Range`
//! value that every type would have to agree on.

use crate::schema::ast::Blueprint;

/// Compares two `Blueprint`s for structural equality, ignoring every
/// source range in both trees (§8 invariant 4: "round-trip normalisation").
pub fn blueprints_equal(a: &Blueprint, b: &Blueprint) -> bool {
    a.eq_ignoring_range(b)
}
