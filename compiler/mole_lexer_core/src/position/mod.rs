//! Line, column and offset bookkeeping.
//!
//! Lines and columns are 1-based; columns count Unicode scalar values, not
//! bytes. Offsets are absolute byte offsets from the start of the first
//! chunk the scanner saw, so they keep growing across buffer refills.
//!
//! Line tracking is opt-in per match. A match that may contain `\n` must be
//! advanced with `track_line_breaks = true`; otherwise the whole match is
//! assumed to sit on one line and only the column moves.

use std::fmt;

/// A resumable point in the input stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
    /// Absolute byte offset.
    pub offset: usize,
}

impl Position {
    /// The position before any input has been read.
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Move past `text`, returning the number of line breaks it contained.
    ///
    /// With `track_line_breaks` off the returned count is always zero and
    /// the column simply advances by the character count of `text`.
    pub fn advance(&mut self, text: &str, track_line_breaks: bool) -> u32 {
        self.offset += text.len();

        if track_line_breaks {
            let bytes = text.as_bytes();
            if let Some(last) = memchr::memrchr(b'\n', bytes) {
                let breaks = saturate(memchr::memchr_iter(b'\n', bytes).count());
                self.line = self.line.saturating_add(breaks);
                // Column restarts after the final newline.
                self.column = saturate(text[last + 1..].chars().count()).saturating_add(1);
                return breaks;
            }
        }

        self.column = self.column.saturating_add(saturate(text.chars().count()));
        0
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[inline]
fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
