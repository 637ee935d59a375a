//! Line-start table for a single buffer.
//!
//! Pre-computes the byte offset of every line start so snippet rendering
//! can pull out the lines around an error without rescanning the buffer
//! from the top for each one.

/// Byte offset of each line start in a buffer.
///
/// # Example
///
/// ```
/// use mole_diagnostic::LineIndex;
///
/// let source = "one\ntwo\nthree";
/// let index = LineIndex::build(source);
///
/// assert_eq!(index.line_count(), 3);
/// assert_eq!(index.line_text(source, 1), Some("two"));
/// assert_eq!(index.line_of_offset(5), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// `starts[0] = 0`; `starts[i]` is the byte after the `i`-th `\n`.
    starts: Vec<usize>,
}

impl LineIndex {
    /// Scan `source` once for newlines.
    pub fn build(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|nl| nl + 1));
        LineIndex { starts }
    }

    /// Number of lines. A trailing newline opens one final empty line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// 0-based line containing byte `offset`.
    ///
    /// Offsets past the end of the buffer map to the last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Text of 0-based line `line`, without its terminator.
    ///
    /// A `\r` before the `\n` is stripped too. Returns `None` when the line
    /// does not exist.
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> Option<&'a str> {
        let start = *self.starts.get(line)?;
        let end = self
            .starts
            .get(line + 1)
            .map_or(source.len(), |next| next - 1);
        let text = source.get(start..end)?;
        Some(text.strip_suffix('\r').unwrap_or(text))
    }
}
