//! Line-pointer snippet rendering.

use std::fmt::Write;

use mole_lexer_core::Position;

use crate::LineIndex;

/// Lines of context shown on each side of the offending line by default.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// How a snippet maps onto its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Position of the first character of the buffer.
    ///
    /// A buffer fed after a restored snapshot starts mid-stream, so its
    /// first byte is not necessarily line 1, column 1.
    pub origin: Position,
    /// Lines shown before and after the offending line.
    pub context_lines: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        SnippetOptions {
            origin: Position::START,
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

/// Render `message` with a caret under `at`.
///
/// The output starts with `"{message} at line {line} col {column}:"`. When
/// `at` falls inside `source`, a blank line follows, then the numbered
/// context lines, with a `^` line directly under the offending one. Tabs
/// before the column are copied into the caret padding so the caret stays
/// aligned in terminals.
///
/// The offending line is found from `at.offset`, relative to
/// `options.origin`. Offsets that do not fall inside `source` (for example a
/// token taken from an earlier buffer) produce the header line alone.
pub fn render_snippet(
    source: &str,
    at: Position,
    message: &str,
    options: &SnippetOptions,
) -> String {
    let mut out = format!("{message} at line {} col {}:", at.line, at.column);

    let origin = options.origin;
    // Offsets before the origin or past the end belong to another buffer.
    let Some(relative) = at
        .offset
        .checked_sub(origin.offset)
        .filter(|&relative| relative <= source.len())
    else {
        return out;
    };
    let index = LineIndex::build(source);
    let target = index.line_of_offset(relative);

    let first = target.saturating_sub(options.context_lines);
    let last = (target + options.context_lines).min(index.line_count() - 1);
    let first_number = origin.line as usize;
    let digits = (first_number + last).to_string().len();

    out.push_str("\n\n");
    let mut lines = Vec::with_capacity(last - first + 2);
    for line in first..=last {
        let text = index.line_text(source, line).unwrap_or_default();
        lines.push(format!("{:>digits$}  {text}", first_number + line));

        if line == target {
            // The buffer's first line may begin mid-line.
            let skipped = if line == 0 { origin.column } else { 1 };
            let before = at.column.saturating_sub(skipped) as usize;
            let mut caret = " ".repeat(digits + 2);
            for ch in text.chars().take(before) {
                caret.push(if ch == '\t' { '\t' } else { ' ' });
            }
            let pad = before.saturating_sub(text.chars().count());
            let _ = write!(caret, "{:pad$}^", "");
            lines.push(caret);
        }
    }
    out.push_str(&lines.join("\n"));
    out
}

#[cfg(test)]
mod tests;
