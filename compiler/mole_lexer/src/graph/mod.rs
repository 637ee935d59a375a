//! The compiled state graph.
//!
//! Everything here is produced once by the rule compiler and read-only
//! afterwards. State transitions are resolved to [`StateId`]s at compile
//! time, so scanning never looks a state up by name.

use std::sync::Arc;

use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{CompileWarning, LexerConfig, TypeMapper, ValueTransform};

/// Index of a state in its compiled graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "state counts are bounded by the rule set, far below u32::MAX"
    )]
    pub(crate) fn new(index: usize) -> Self {
        StateId(index as u32)
    }

    /// Position of the state in declaration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A resolved state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transition {
    Push(StateId),
    Pop(usize),
    Next(StateId),
}

/// A rule after validation.
#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub(crate) name: Arc<str>,
    pub(crate) kind: Option<TypeMapper>,
    pub(crate) value: Option<ValueTransform>,
    /// Always set for recovery rules.
    pub(crate) line_breaks: bool,
    /// Always set for the error collector.
    pub(crate) error: bool,
    pub(crate) transition: Option<Transition>,
}

impl CompiledRule {
    #[inline]
    pub(crate) fn kind_for(&self, text: &str) -> Arc<str> {
        self.kind
            .as_ref()
            .and_then(|mapper| mapper.map(text))
            .unwrap_or_else(|| Arc::clone(&self.name))
    }

    #[inline]
    pub(crate) fn value_for(&self, text: &str) -> String {
        match &self.value {
            Some(transform) => transform.apply(text),
            None => text.to_owned(),
        }
    }
}

/// The recovery rule of a state, by rule index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Recovery {
    Fallback(usize),
    Collect(usize),
}

impl Recovery {
    pub(crate) fn rule(self) -> usize {
        match self {
            Recovery::Fallback(rule) | Recovery::Collect(rule) => rule,
        }
    }
}

/// Multi-pattern regex over the regex-backed rules of a state.
///
/// Pattern `i` belongs to rule `rule_of_pattern[i]`. Patterns are added in
/// rule order and searched leftmost-first, so at a fixed start position the
/// earliest declared rule that matches wins.
#[derive(Debug)]
pub(crate) struct Matcher {
    pub(crate) regex: Regex,
    pub(crate) rule_of_pattern: Vec<usize>,
}

/// One state's rule table.
#[derive(Debug)]
pub(crate) struct CompiledState {
    pub(crate) name: Arc<str>,
    pub(crate) rules: Vec<CompiledRule>,
    /// Single-character literals dispatched without the regex engine.
    pub(crate) fast: FxHashMap<char, usize>,
    pub(crate) matcher: Option<Matcher>,
    pub(crate) recovery: Option<Recovery>,
}

impl CompiledState {
    /// The rule matching at byte `at` of `haystack`, and the match length.
    ///
    /// Only matches starting exactly at `at` count. Look-around assertions
    /// see the whole haystack.
    pub(crate) fn match_at(&self, haystack: &str, at: usize) -> Option<(usize, usize)> {
        if !self.fast.is_empty() {
            if let Some(ch) = haystack[at..].chars().next() {
                if let Some(&rule) = self.fast.get(&ch) {
                    return Some((rule, ch.len_utf8()));
                }
            }
        }

        let matcher = self.matcher.as_ref()?;
        let input = Input::new(haystack).range(at..).anchored(Anchored::Yes);
        let found = matcher.regex.search(&input)?;
        Some((
            matcher.rule_of_pattern[found.pattern().as_usize()],
            found.end() - at,
        ))
    }

    /// Start of the first position after `at` where some rule matches.
    pub(crate) fn next_match_start(&self, haystack: &str, at: usize) -> Option<usize> {
        let fast = if self.fast.is_empty() {
            None
        } else {
            haystack[at..]
                .char_indices()
                .find(|(_, ch)| self.fast.contains_key(ch))
                .map(|(i, _)| at + i)
        };
        let regex = self.matcher.as_ref().and_then(|matcher| {
            matcher
                .regex
                .search(&Input::new(haystack).range(at..))
                .map(|found| found.start())
        });
        earliest_of(fast, regex).filter(|&start| start > at)
    }
}

/// Returns the earliest of two optional positions.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// All compiled states of a lexer.
#[derive(Debug)]
pub(crate) struct StateGraph {
    pub(crate) states: Vec<CompiledState>,
    pub(crate) ids: FxHashMap<Arc<str>, StateId>,
    pub(crate) start: StateId,
    /// Every kind any rule of any state can produce.
    pub(crate) kinds: FxHashSet<Arc<str>>,
    pub(crate) warnings: Vec<CompileWarning>,
    pub(crate) config: LexerConfig,
}

impl StateGraph {
    #[inline]
    pub(crate) fn state(&self, id: StateId) -> &CompiledState {
        &self.states[id.index()]
    }
}
