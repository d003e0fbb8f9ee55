//! Byte offset → line/column conversion.

use std::fmt;

/// A 1-based line/column position. Columns count characters, not bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// Precomputed line starts for one source text.
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Index a source text.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { text, line_starts }
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: u32) -> Position {
        let offset = (offset as usize).min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        Position {
            line: u32::try_from(line + 1).unwrap_or(u32::MAX),
            column: u32::try_from(column + 1).unwrap_or(u32::MAX),
        }
    }

    /// Position of `offset` measured from `origin` instead of the start of
    /// the text: the line containing `origin` becomes line 1 and `origin`
    /// itself becomes column 1. Offsets before `origin` report `(1,1)`.
    pub fn position_from(&self, origin: u32, offset: u32) -> Position {
        if offset < origin {
            return Position { line: 1, column: 1 };
        }
        let base = self.position(origin);
        let here = self.position(offset);
        if here.line == base.line {
            Position {
                line: 1,
                column: here.column - base.column + 1,
            }
        } else {
            Position {
                line: here.line - base.line + 1,
                column: here.column,
            }
        }
    }
}
