//! Byte-offset → [`Position`] translation for one source document (C1).
//!
//! Built once per document and shared by reference across every [`Range`]
//! produced while decoding it — there is exactly one `LineIndex` per
//! document, never one per node.

use super::position::{Position, Range};

/// Byte offsets of every line start in a document, plus the EOF offset.
///
/// Immutable once built; decoding never mutates it. Shared via `Arc` by
/// everything that needs to turn a byte offset into a line/column pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line. Always starts with `0`.
    line_starts: Vec<usize>,
    eof: usize,
}

impl LineIndex {
    /// Scan `bytes` for line starts (`\n`-delimited; a line start following
    /// `\r\n` is still the byte right after `\n`).
    pub fn new(bytes: &[u8]) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in bytes.iter().enumerate() {
            if *b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            eof: bytes.len(),
        }
    }

    pub fn eof_offset(&self) -> usize {
        self.eof
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        }
    }

    /// Translate a byte offset into a (line, column) position.
    ///
    /// The column is a count of Unicode scalar values (runes) from the
    /// start of the line to `offset`, not a byte count — invariant I-2 in
    /// §8 depends on this for every non-ASCII source string.
    pub fn position_from_offset(&self, source: &str, offset: usize) -> Position {
        let offset = offset.min(self.eof);
        let line_idx = self.line_of_offset(offset);
        let line_start = self.line_starts[line_idx];
        let column = source
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            + 1;
        Position::new(line_idx + 1, column)
    }

    /// For constructs whose end offset would land on a later line than the
    /// start (JWCC objects spanning multiple lines), clamp the end to the
    /// last column of the start line — callers asking for a per-key range
    /// want that key's own line, not the whole block.
    pub fn end_position_on_same_line(&self, source: &str, start: Position, end_offset: usize) -> Position {
        let line_idx = start.line - 1;
        if line_idx + 1 >= self.line_starts.len() {
            return self.position_from_offset(source, end_offset.min(self.eof));
        }
        let next_line_start = self.line_starts[line_idx + 1];
        let clamped = end_offset.min(next_line_start.saturating_sub(1)).max(self.line_starts[line_idx]);
        self.position_from_offset(source, clamped)
    }

    /// Build a [`Range`] directly from a pair of byte offsets.
    pub fn range_from_offsets(&self, source: &str, start: usize, end: usize) -> Range {
        Range::new(
            self.position_from_offset(source, start),
            self.position_from_offset(source, end),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let idx = LineIndex::new(b"hello");
        assert_eq!(idx.position_from_offset("hello", 0), Position::new(1, 1));
        assert_eq!(idx.position_from_offset("hello", 5), Position::new(1, 6));
    }

    #[test]
    fn multi_line() {
        let src = "abc\ndef\nghi";
        let idx = LineIndex::new(src.as_bytes());
        assert_eq!(idx.position_from_offset(src, 0), Position::new(1, 1));
        assert_eq!(idx.position_from_offset(src, 4), Position::new(2, 1));
        assert_eq!(idx.position_from_offset(src, 9), Position::new(3, 2));
    }

    #[test]
    fn rune_accurate_columns() {
        // "íÄÅ" — three non-ASCII runes, each multiple bytes in UTF-8.
        let src = "x = \"íÄÅ\"";
        let idx = LineIndex::new(src.as_bytes());
        let byte_offset_of_last_quote = src.rfind('"').unwrap();
        let pos = idx.position_from_offset(src, byte_offset_of_last_quote);
        // 9 runes precede the closing quote: x, space, =, space, ", í, Ä, Å
        assert_eq!(pos, Position::new(1, 9));
    }
}
