//! Offset <-> line/column conversion.
//!
//! Diagnostics are located by byte offset; reports want lines and columns.
//! Scripts embedded in HTML are mapped with an *anchor*: the position of
//! their first character inside the enclosing document, so that offset 0 of
//! the fragment reports the line and column of the `<script>` content.

use memchr::memchr2_iter;
use serde::{Deserialize, Serialize};

/// A 0-based line/column position. Columns count code points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub const fn new(line: u32, col: u32) -> Self {
        Position { line, col }
    }
}

/// Line map over a piece of source text.
///
/// `\r\n`, lone `\n` and lone `\r` each terminate one line.
#[derive(Clone, Debug)]
pub struct PositionMapper {
    text: String,
    /// Starting offset of each line (`line_starts[0]` is always 0)
    line_starts: Vec<u32>,
    anchor: Position,
}

impl PositionMapper {
    pub fn new(text: &str) -> Self {
        Self::with_anchor(text, Position::default())
    }

    pub fn with_anchor(text: &str, anchor: Position) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0u32];
        for i in memchr2_iter(b'\n', b'\r', bytes) {
            // \r\n: the \n creates the line start
            if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                continue;
            }
            line_starts.push((i + 1) as u32);
        }
        PositionMapper {
            text: text.to_string(),
            line_starts,
            anchor,
        }
    }

    pub fn source(&self) -> &str {
        &self.text
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Starting offset of a (local, unanchored) line.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }

    /// Convert an offset into the mapped text to a position.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn from_offset(&self, offset: u32) -> Position {
        let offset = offset.min(self.text.len() as u32);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts[line] as usize;
        let col = count_code_points(&self.text.as_bytes()[line_start..offset as usize]);

        if line == 0 {
            Position::new(self.anchor.line, self.anchor.col + col)
        } else {
            Position::new(self.anchor.line + line as u32, col)
        }
    }

    /// Convert a position back to an offset into the mapped text.
    ///
    /// Returns `None` for positions before the anchor, past the last line,
    /// or past the end of their line. The end of the text is addressable as
    /// the column after the last character of the last line.
    pub fn to_offset(&self, position: Position) -> Option<u32> {
        let line = position.line.checked_sub(self.anchor.line)? as usize;
        let col = if line == 0 {
            position.col.checked_sub(self.anchor.col)?
        } else {
            position.col
        };

        let line_start = *self.line_starts.get(line)? as usize;
        let is_last = line + 1 == self.line_starts.len();
        let limit = if is_last {
            self.text.len()
        } else {
            self.line_starts[line + 1] as usize
        };

        let mut seen = 0u32;
        for (idx, _) in self.text[line_start..limit].char_indices() {
            if seen == col {
                return Some((line_start + idx) as u32);
            }
            seen += 1;
        }
        (is_last && seen == col).then_some(limit as u32)
    }

    /// The text between two positions, including the character at `end`.
    pub fn text(&self, start: Position, end: Position) -> Option<&str> {
        let from = self.to_offset(start)? as usize;
        let to = self.to_offset(end)? as usize;
        if to < from {
            return None;
        }
        let width = self.text[to..].chars().next().map_or(0, char::len_utf8);
        self.text.get(from..to + width)
    }
}

/// Count code points in a byte slice, tolerating a slice that ends inside a
/// multi-byte character.
fn count_code_points(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_map_simple() {
        let mapper = PositionMapper::new("line1\nline2\nline3");
        assert_eq!(mapper.line_count(), 3);
        assert_eq!(mapper.from_offset(0), Position::new(0, 0));
        assert_eq!(mapper.from_offset(4), Position::new(0, 4));
        assert_eq!(mapper.from_offset(6), Position::new(1, 0));
        assert_eq!(mapper.from_offset(12), Position::new(2, 0));
    }

    #[test]
    fn test_mixed_line_endings_count_once() {
        let mapper = PositionMapper::new("a\r\nb\nc\rd");
        assert_eq!(mapper.line_count(), 4);
        assert_eq!(mapper.from_offset(3), Position::new(1, 0));
        assert_eq!(mapper.from_offset(5), Position::new(2, 0));
        assert_eq!(mapper.from_offset(7), Position::new(3, 0));
    }

    #[test]
    fn test_roundtrip_every_offset() {
        let source = "var a;\r\nvar b;\nvar c;\rvar \u{e9}d;\r\n\r\n";
        let mapper = PositionMapper::new(source);
        for (offset, _) in source.char_indices() {
            let pos = mapper.from_offset(offset as u32);
            assert_eq!(
                mapper.to_offset(pos),
                Some(offset as u32),
                "roundtrip failed at offset {offset} ({pos:?})"
            );
        }
        let end = mapper.from_offset(source.len() as u32);
        assert_eq!(mapper.to_offset(end), Some(source.len() as u32));
    }

    #[test]
    fn test_columns_count_code_points() {
        let mapper = PositionMapper::new("\u{e9}\u{e9}x");
        assert_eq!(mapper.from_offset(4), Position::new(0, 2));
    }

    #[test]
    fn test_anchor_shifts_first_line_only() {
        let mapper = PositionMapper::with_anchor("ab\ncd", Position::new(4, 10));
        assert_eq!(mapper.from_offset(0), Position::new(4, 10));
        assert_eq!(mapper.from_offset(1), Position::new(4, 11));
        assert_eq!(mapper.from_offset(3), Position::new(5, 0));
        assert_eq!(mapper.to_offset(Position::new(4, 10)), Some(0));
        assert_eq!(mapper.to_offset(Position::new(5, 1)), Some(4));
        assert_eq!(mapper.to_offset(Position::new(3, 0)), None);
        assert_eq!(mapper.to_offset(Position::new(4, 9)), None);
    }

    #[test]
    fn test_text_is_inclusive() {
        let mapper = PositionMapper::new("var x;\nvar y;");
        assert_eq!(
            mapper.text(Position::new(0, 4), Position::new(1, 4)),
            Some("x;\nvar y")
        );
        assert_eq!(mapper.text(Position::new(1, 4), Position::new(0, 4)), None);
    }

    #[test]
    fn test_to_offset_rejects_out_of_line() {
        let mapper = PositionMapper::new("ab\ncd");
        assert_eq!(mapper.to_offset(Position::new(0, 5)), None);
        assert_eq!(mapper.to_offset(Position::new(2, 0)), None);
    }
}
