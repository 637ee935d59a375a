//! Error taxonomy.
//!
//! Two failure families, raised at different times:
//!
//! - [`CompileError`]: the rule graph is malformed. Always raised by
//!   `compile`/`states`, never deferred to scanning.
//! - [`LexError`]: scanning hit input it cannot tokenize, or a rule asked for
//!   an impossible state transition. Raised by `next()`; the lexer is left
//!   unchanged so the caller may decide how to proceed.
//!
//! Tokens from rules flagged `error()` and from error-collector rules are
//! not failures. They are ordinary tokens with `is_error` set.

use std::fmt;

use mole_lexer_core::Position;
use thiserror::Error;

/// A malformed rule set, rejected at compile time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum CompileError {
    #[error("no states to compile")]
    NoStates,

    #[error("state `{state}` is defined more than once")]
    DuplicateState { state: String },

    #[error("start state `{state}` does not exist")]
    MissingStartState { state: String },

    #[error("rule `{rule}` in state `{state}` refers to missing state `{target}`")]
    MissingState {
        state: String,
        rule: String,
        target: String,
    },

    #[error("rule `{rule}` in state `{state}` combines more than one of push, pop and next")]
    ConflictingTransitions { state: String, rule: String },

    #[error("rule `{rule}` in state `{state}` pops zero states")]
    InvalidPop { state: String, rule: String },

    #[error("rule `{rule}` switches state, but a single-state lexer has no states to switch to")]
    TransitionInStatelessLexer { rule: String },

    #[error("recovery rule `{rule}` in state `{state}` cannot switch state")]
    TransitionOnRecoveryRule { state: String, rule: String },

    #[error("state `{state}` has more than one recovery rule (`{first}` and `{second}`)")]
    MultipleRecoveryRules {
        state: String,
        first: String,
        second: String,
    },

    #[error("rule `{rule}` in state `{state}` has nothing to match")]
    EmptyPattern { state: String, rule: String },

    #[error("rule `{rule}` in state `{state}` can match the empty string")]
    EmptyMatch { state: String, rule: String },

    #[error("rule `{rule}` in state `{state}` has an invalid pattern: {message}")]
    InvalidPattern {
        state: String,
        rule: String,
        message: String,
    },

    #[error(
        "rule `{rule}` in state `{state}` may match a line break; declare it with `line_breaks()`"
    )]
    UndeclaredLineBreaks { state: String, rule: String },
}

/// A non-fatal finding from compilation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompileWarning {
    /// State whose rule table contains the rule.
    pub state: String,
    /// Rule name.
    pub rule: String,
    /// What was found.
    pub kind: CompileWarningKind,
}

/// Kind of compile warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompileWarningKind {
    /// The rule may match `\n` but does not track line breaks.
    UndeclaredLineBreaks,
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CompileWarningKind::UndeclaredLineBreaks => write!(
                f,
                "rule `{}` in state `{}` may match a line break but does not track line breaks",
                self.rule, self.state
            ),
        }
    }
}

/// A scan-time failure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum LexError {
    /// No rule of the active state matches at the cursor, and the state has
    /// no fallback or error-collector rule.
    #[error("unexpected {character:?} at line {line} col {column} in state `{state}`")]
    UnexpectedInput {
        character: char,
        line: u32,
        column: u32,
        offset: usize,
        state: String,
    },

    /// A `pop` rule would empty the state stack.
    #[error(
        "rule `{rule}` in state `{state}` pops {pop} state(s) but only {depth} are on the stack"
    )]
    StateStackUnderflow {
        state: String,
        rule: String,
        depth: usize,
        pop: usize,
    },

    /// A snapshot names a state id this lexer does not have.
    #[error("snapshot refers to state #{state}, which this lexer does not define")]
    InvalidSnapshot { state: usize },
}

impl LexError {
    /// Where scanning stopped, for errors tied to the input.
    pub fn position(&self) -> Option<Position> {
        match *self {
            LexError::UnexpectedInput {
                line,
                column,
                offset,
                ..
            } => Some(Position {
                line,
                column,
                offset,
            }),
            LexError::StateStackUnderflow { .. } | LexError::InvalidSnapshot { .. } => None,
        }
    }
}
