//! The token handed to callers by the scanner.

use std::fmt;
use std::sync::Arc;

use crate::Position;

/// One matched span of input.
///
/// Tokens are immutable values: they own their text and carry enough
/// position metadata to render a diagnostic without the scanner.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    /// Token kind after type mapping (defaults to the rule name).
    pub kind: Arc<str>,
    /// Match content after the rule's value transform.
    pub value: String,
    /// Raw matched text.
    pub text: String,
    /// Absolute byte offset of the match start.
    pub offset: usize,
    /// Number of `\n` inside the match (always zero for rules that do not
    /// track line breaks).
    pub line_breaks: u32,
    /// 1-based line of the match start.
    pub line: u32,
    /// 1-based column of the match start.
    pub column: u32,
    /// Set for tokens from rules flagged as errors and from the error
    /// collector.
    pub is_error: bool,
}

impl Token {
    /// Position of the first character of the match.
    pub fn start(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            f.write_str(&self.kind)
        } else {
            f.write_str(&self.value)
        }
    }
}
