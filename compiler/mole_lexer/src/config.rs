//! Compile-time configuration for a lexer.

use mole_diagnostic::DEFAULT_CONTEXT_LINES;

/// What to do with a rule that may match `\n` without tracking line breaks.
///
/// Such a rule leaves line and column numbers wrong for every token after
/// the first newline it consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineBreakCheck {
    /// Accept the rule silently.
    Allow,
    /// Accept the rule, log a warning and record a
    /// [`CompileWarning`](crate::CompileWarning).
    #[default]
    Warn,
    /// Reject the rule with
    /// [`CompileError::UndeclaredLineBreaks`](crate::CompileError::UndeclaredLineBreaks).
    Deny,
}

/// Configuration for compiling a lexer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LexerConfig {
    /// Policy for rules that may match a line break without declaring it.
    pub line_breaks: LineBreakCheck,
    /// Dispatch single-character literals through a lookup table instead of
    /// the regex engine. Only literals declared before the first
    /// regex-backed rule of a state are eligible, so matching order is
    /// unaffected.
    pub fast_dispatch: bool,
    /// Lines of source shown on each side of the offending line by
    /// [`Lexer::format_error`](crate::Lexer::format_error).
    pub context_lines: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            line_breaks: LineBreakCheck::Warn,
            fast_dispatch: true,
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

impl LexerConfig {
    /// A config that rejects undeclared line breaks.
    pub fn strict() -> Self {
        LexerConfig {
            line_breaks: LineBreakCheck::Deny,
            ..Default::default()
        }
    }

    /// Replace the line-break policy.
    #[must_use]
    pub fn with_line_breaks(mut self, line_breaks: LineBreakCheck) -> Self {
        self.line_breaks = line_breaks;
        self
    }

    /// Replace the number of context lines used by error formatting.
    #[must_use]
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }
}
