//! Diagnostic rendering for lexer errors.
//!
//! Turns a position inside a buffer into a human-readable report:
//! the message, a few numbered lines of surrounding source, and a caret
//! under the offending column.
//!
//! ```text
//! invalid syntax at line 2 col 5:
//!
//! 1  let x = 1
//! 2  let $ = 2
//!        ^
//! 3  let z = 3
//! ```
//!
//! Rendering never fails. Positions outside the buffer degrade to the
//! header line alone.

pub mod line_index;
mod snippet;

pub use line_index::LineIndex;
pub use snippet::{render_snippet, SnippetOptions, DEFAULT_CONTEXT_LINES};
