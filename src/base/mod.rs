//! Foundation types shared by every layer of the crate: source positions,
//! ranges, and the line index that translates between them (C1).
//!
//! This module has no dependency on any other module in the crate.

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{ColumnAccuracy, Position, Range};
