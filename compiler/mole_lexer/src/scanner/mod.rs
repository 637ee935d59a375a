//! The scanner engine.
//!
//! A [`Lexer`] pairs a shared, immutable [`StateGraph`] with per-instance
//! scan state: the current buffer, the position of its cursor and the state
//! stack. Each [`next`](Lexer::next) call matches exactly one token at the
//! cursor; nothing is buffered ahead.
//!
//! # Position continuity
//!
//! `origin` is the position of the first byte of the current buffer. After
//! [`reset`](Lexer::reset) it is line 1, column 1, offset 0. After
//! [`restore`](Lexer::restore) it is the snapshot's position, so offsets and
//! line numbers keep counting across buffer refills.

use std::iter::FusedIterator;
use std::sync::Arc;

use mole_diagnostic::{render_snippet, SnippetOptions};
use mole_lexer_core::{Position, SourceBuffer, Token};
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};

use crate::graph::{Recovery, StateGraph, StateId, Transition};
use crate::{CompileWarning, LexError};

/// Message used by [`Lexer::format_error`] when none is given.
pub const DEFAULT_ERROR_MESSAGE: &str = "invalid syntax";

type StateStack = SmallVec<[StateId; 4]>;

/// A compiled lexer and its scan state.
///
/// Cloning is cheap: clones share the compiled rules and carry independent
/// buffers, positions and state stacks.
#[derive(Clone, Debug)]
pub struct Lexer {
    graph: Arc<StateGraph>,
    buffer: SourceBuffer,
    /// Position of the cursor.
    position: Position,
    /// Position of the first byte of `buffer`.
    origin: Position,
    /// Never empty. The top is the active state.
    stack: StateStack,
}

impl Lexer {
    pub(crate) fn new(graph: StateGraph) -> Self {
        let start = graph.start;
        Lexer {
            graph: Arc::new(graph),
            buffer: SourceBuffer::default(),
            position: Position::START,
            origin: Position::START,
            stack: smallvec![start],
        }
    }

    /// Replace the buffer and return to the initial state: line 1, column 1,
    /// offset 0, and a stack holding only the start state.
    pub fn reset(&mut self, chunk: impl Into<String>) {
        self.buffer = SourceBuffer::new(chunk);
        self.position = Position::START;
        self.origin = Position::START;
        self.stack.clear();
        self.stack.push(self.graph.start);
    }

    /// Replace the buffer and resume from `snapshot`.
    ///
    /// The buffer is taken to begin exactly where the snapshot was saved.
    /// On error the lexer is left unchanged.
    pub fn restore(
        &mut self,
        chunk: impl Into<String>,
        snapshot: &Snapshot,
    ) -> Result<(), LexError> {
        let count = self.graph.states.len();
        if let Some(bad) = snapshot.stack.iter().find(|id| id.index() >= count) {
            return Err(LexError::InvalidSnapshot { state: bad.index() });
        }

        self.buffer = SourceBuffer::new(chunk);
        self.position = snapshot.position;
        self.origin = snapshot.position;
        self.stack.clone_from(&snapshot.stack);
        Ok(())
    }

    /// Capture the position and state stack.
    pub fn save(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            stack: self.stack.clone(),
        }
    }

    /// Produce the next token.
    ///
    /// Returns `Ok(None)` once the buffer is exhausted, and keeps doing so
    /// until the next reset. On error nothing is consumed and the state
    /// stack is untouched.
    #[expect(
        clippy::should_implement_trait,
        reason = "fallible and resumable after a reset; `tokens()` provides the iterator"
    )]
    pub fn next(&mut self) -> Result<Option<Token>, LexError> {
        let Some(current) = self.buffer.current_char() else {
            return Ok(None);
        };
        let at = self.buffer.pos();
        let haystack = self.buffer.as_str();
        let state = self.graph.state(self.top());

        let (index, len) = match state.match_at(haystack, at) {
            Some(found) => found,
            None => match state.recovery {
                Some(Recovery::Fallback(rule)) => (rule, current.len_utf8()),
                Some(Recovery::Collect(rule)) => {
                    let end = state
                        .next_match_start(haystack, at)
                        .unwrap_or(haystack.len());
                    (rule, end - at)
                }
                None => {
                    return Err(LexError::UnexpectedInput {
                        character: current,
                        line: self.position.line,
                        column: self.position.column,
                        offset: self.position.offset,
                        state: state.name.to_string(),
                    })
                }
            },
        };
        let rule = &state.rules[index];

        if let Some(Transition::Pop(count)) = rule.transition {
            if count >= self.stack.len() {
                return Err(LexError::StateStackUnderflow {
                    state: state.name.to_string(),
                    rule: rule.name.to_string(),
                    depth: self.stack.len(),
                    pop: count,
                });
            }
        }

        if state.recovery.is_some_and(|recovery| recovery.rule() == index) {
            debug!(
                rule = %rule.name,
                state = %state.name,
                offset = self.position.offset,
                len,
                "recovering from unmatched input"
            );
        }

        let text = self.buffer.slice(at, at + len);
        let start = self.position;
        let line_breaks = self.position.advance(text, rule.line_breaks);
        let token = Token {
            kind: rule.kind_for(text),
            value: rule.value_for(text),
            text: text.to_owned(),
            offset: start.offset,
            line_breaks,
            line: start.line,
            column: start.column,
            is_error: rule.error,
        };
        trace!(
            kind = %token.kind,
            offset = token.offset,
            line = token.line,
            column = token.column,
            "token"
        );

        let transition = rule.transition;
        self.buffer.advance(len);
        if let Some(transition) = transition {
            self.apply(transition);
        }
        Ok(Some(token))
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Push(target) => self.stack.push(target),
            Transition::Pop(count) => {
                // Underflow was rejected before anything was consumed.
                let keep = self.stack.len().saturating_sub(count).max(1);
                self.stack.truncate(keep);
            }
            Transition::Next(target) => {
                if let Some(top) = self.stack.last_mut() {
                    *top = target;
                }
            }
        }
        trace!(
            state = %self.graph.state(self.top()).name,
            depth = self.stack.len(),
            "state transition"
        );
    }

    /// Iterate over the remaining tokens of the buffer.
    pub fn tokens(&mut self) -> Tokens<'_> {
        Tokens {
            lexer: self,
            done: false,
        }
    }

    /// Whether any rule of any state can produce a token of `kind`.
    ///
    /// Kinds produced by a type mapper count only if the mapper declared
    /// them.
    pub fn has(&self, kind: &str) -> bool {
        self.graph.kinds.contains(kind)
    }

    /// Render a diagnostic pointing at `token`, or at the cursor if `None`.
    ///
    /// The token must come from the current buffer for the source lines to
    /// be shown; otherwise only the header line is produced.
    pub fn format_error(&self, token: Option<&Token>, message: Option<&str>) -> String {
        let at = token.map_or(self.position, Token::start);
        let options = SnippetOptions {
            origin: self.origin,
            context_lines: self.graph.config.context_lines,
        };
        render_snippet(
            self.buffer.as_str(),
            at,
            message.unwrap_or(DEFAULT_ERROR_MESSAGE),
            &options,
        )
    }

    /// The active state.
    pub fn state(&self) -> StateId {
        self.top()
    }

    /// Name of the active state.
    pub fn state_name(&self) -> &str {
        &self.graph.state(self.top()).name
    }

    /// Look a state up by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.graph.ids.get(name).copied()
    }

    /// Number of states on the stack, including the active one.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Position of the cursor.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Non-fatal findings from compiling this lexer.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.graph.warnings
    }

    fn top(&self) -> StateId {
        self.stack.last().copied().unwrap_or(self.graph.start)
    }
}

/// Position and state stack of a lexer, for resuming on a new buffer.
///
/// Snapshots are plain values: they borrow nothing from the lexer that made
/// them and can be restored into any clone of it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    position: Position,
    stack: StateStack,
}

impl Snapshot {
    /// Line, column and absolute offset at the time of the save.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The saved state stack, bottom first.
    pub fn stack(&self) -> &[StateId] {
        &self.stack
    }
}

/// Iterator over the tokens of a [`Lexer`].
///
/// Ends when the buffer is exhausted. After yielding an error it yields
/// nothing more.
#[derive(Debug)]
pub struct Tokens<'a> {
    lexer: &'a mut Lexer,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.next() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Tokens<'_> {}

impl<'a> IntoIterator for &'a mut Lexer {
    type Item = Result<Token, LexError>;
    type IntoIter = Tokens<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens()
    }
}
