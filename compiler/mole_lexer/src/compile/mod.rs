//! The rule compiler.
//!
//! Turns declarative [`States`] into a [`StateGraph`]. All validation
//! happens here, in one pass per state:
//!
//! 1. Expand `include` entries into a flat rule list.
//! 2. Resolve `push`/`pop`/`next` to [`Transition`]s, rejecting dangling
//!    targets and rules that declare more than one.
//! 3. Validate patterns: no empty literal sets, nothing that can match the
//!    empty string, line-break declarations per [`LineBreakCheck`].
//! 4. Build the fast dispatch table and one multi-pattern regex.
//!
//! The first error aborts compilation.

mod pattern;

use std::sync::Arc;

use regex_automata::meta::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::graph::{
    CompiledRule, CompiledState, Matcher, Recovery, StateGraph, StateId, Transition,
};
use crate::rule::RuleEntry;
use crate::{
    CompileError, CompileWarning, CompileWarningKind, LexerConfig, LineBreakCheck, Pattern,
    RuleSpec, Rules, States,
};

use pattern::{analyze, literal_alternation, wrap_user_pattern};

/// Name of the only state of a lexer built by [`compile`](crate::compile).
pub(crate) const DEFAULT_STATE: &str = "start";

/// Compile `states` into a graph.
///
/// `stateful` is `false` for single-state lexers, which reject state
/// transitions outright.
pub(crate) fn compile_graph(
    states: &States,
    start: Option<&str>,
    stateful: bool,
    config: &LexerConfig,
) -> Result<StateGraph, CompileError> {
    let declared = states.as_slice();
    if declared.is_empty() {
        return Err(CompileError::NoStates);
    }

    let mut ids: FxHashMap<Arc<str>, StateId> = FxHashMap::default();
    for (index, (name, _)) in declared.iter().enumerate() {
        if ids.insert(Arc::clone(name), StateId::new(index)).is_some() {
            return Err(CompileError::DuplicateState {
                state: name.to_string(),
            });
        }
    }

    let start = match start {
        Some(name) => *ids
            .get(name)
            .ok_or_else(|| CompileError::MissingStartState {
                state: name.to_owned(),
            })?,
        None => StateId::new(0),
    };

    let mut compiler = Compiler {
        states,
        ids: &ids,
        stateful,
        config,
        warnings: Vec::new(),
        kinds: FxHashSet::default(),
    };

    let mut compiled = Vec::with_capacity(declared.len());
    for (name, rules) in declared {
        let flat = compiler.expand_includes(name, rules)?;
        compiled.push(compiler.compile_state(name, &flat)?);
    }

    let Compiler {
        warnings, kinds, ..
    } = compiler;

    debug!(
        states = compiled.len(),
        rules = compiled.iter().map(|s| s.rules.len()).sum::<usize>(),
        start = %compiled[start.index()].name,
        warnings = warnings.len(),
        "compiled lexer"
    );

    Ok(StateGraph {
        states: compiled,
        ids,
        start,
        kinds,
        warnings,
        config: config.clone(),
    })
}

/// Shared context for compiling every state of one graph.
struct Compiler<'a> {
    states: &'a States,
    ids: &'a FxHashMap<Arc<str>, StateId>,
    stateful: bool,
    config: &'a LexerConfig,
    warnings: Vec<CompileWarning>,
    kinds: FxHashSet<Arc<str>>,
}

/// A rule after include expansion: its name and declaration.
type FlatRule<'a> = (&'a Arc<str>, &'a RuleSpec);

impl<'a> Compiler<'a> {
    fn expand_includes(
        &self,
        state: &'a Arc<str>,
        rules: &'a Rules,
    ) -> Result<Vec<FlatRule<'a>>, CompileError> {
        let mut visited: FxHashSet<&'a str> = FxHashSet::default();
        visited.insert(&**state);
        let mut out = Vec::with_capacity(rules.len());
        self.splice(state, rules, &mut visited, &mut out)?;
        Ok(out)
    }

    fn splice(
        &self,
        owner: &str,
        rules: &'a Rules,
        visited: &mut FxHashSet<&'a str>,
        out: &mut Vec<FlatRule<'a>>,
    ) -> Result<(), CompileError> {
        for entry in rules.entries() {
            match entry {
                RuleEntry::Rule { name, spec } => out.push((name, spec)),
                RuleEntry::Include(target) => {
                    let id = self.ids.get(target.as_str()).ok_or_else(|| {
                        CompileError::MissingState {
                            state: owner.to_owned(),
                            rule: "include".to_owned(),
                            target: target.clone(),
                        }
                    })?;
                    if visited.insert(target.as_str()) {
                        let states: &'a States = self.states;
                        let (_, included) = &states.as_slice()[id.index()];
                        self.splice(owner, included, visited, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn compile_state(
        &mut self,
        state: &Arc<str>,
        rules: &[FlatRule<'_>],
    ) -> Result<CompiledState, CompileError> {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut fast: FxHashMap<char, usize> = FxHashMap::default();
        let mut patterns: Vec<String> = Vec::new();
        let mut rule_of_pattern: Vec<usize> = Vec::new();
        let mut recovery: Option<Recovery> = None;
        // Fast dispatch is only order-preserving before the first regex rule.
        let mut fast_allowed = self.config.fast_dispatch;

        for &(name, spec) in rules {
            let index = compiled.len();
            let transition = self.resolve_transition(state, name, spec)?;

            match &spec.pattern {
                Pattern::Fallback | Pattern::ErrorCollector => {
                    if transition.is_some() {
                        return Err(CompileError::TransitionOnRecoveryRule {
                            state: state.to_string(),
                            rule: name.to_string(),
                        });
                    }
                    if let Some(existing) = recovery {
                        let first: &CompiledRule = &compiled[existing.rule()];
                        return Err(CompileError::MultipleRecoveryRules {
                            state: state.to_string(),
                            first: first.name.to_string(),
                            second: name.to_string(),
                        });
                    }
                    recovery = Some(if spec.pattern == Pattern::Fallback {
                        Recovery::Fallback(index)
                    } else {
                        Recovery::Collect(index)
                    });
                }
                Pattern::Literals(literals) => {
                    if literals.is_empty() {
                        return Err(CompileError::EmptyPattern {
                            state: state.to_string(),
                            rule: name.to_string(),
                        });
                    }
                    if literals.iter().any(String::is_empty) {
                        return Err(CompileError::EmptyMatch {
                            state: state.to_string(),
                            rule: name.to_string(),
                        });
                    }
                    let newline = literals.iter().any(|literal| literal.contains('\n'));
                    self.check_line_breaks(state, name, spec, newline)?;

                    let single_chars: Option<Vec<char>> =
                        literals.iter().map(|literal| single_char(literal)).collect();
                    match single_chars {
                        Some(chars) if fast_allowed => {
                            for ch in chars {
                                fast.entry(ch).or_insert(index);
                            }
                        }
                        _ => {
                            fast_allowed = false;
                            let literals: Vec<&str> =
                                literals.iter().map(String::as_str).collect();
                            patterns.push(literal_alternation(&literals));
                            rule_of_pattern.push(index);
                        }
                    }
                }
                Pattern::Regex(source) => {
                    let info = analyze(source).map_err(|message| CompileError::InvalidPattern {
                        state: state.to_string(),
                        rule: name.to_string(),
                        message,
                    })?;
                    if info.matches_empty {
                        return Err(CompileError::EmptyMatch {
                            state: state.to_string(),
                            rule: name.to_string(),
                        });
                    }
                    self.check_line_breaks(state, name, spec, info.may_match_newline)?;
                    fast_allowed = false;
                    patterns.push(wrap_user_pattern(source));
                    rule_of_pattern.push(index);
                }
            }

            self.kinds.insert(Arc::clone(name));
            if let Some(mapper) = &spec.kind {
                self.kinds.extend(mapper.kinds().iter().cloned());
            }

            compiled.push(CompiledRule {
                name: Arc::clone(name),
                kind: spec.kind.clone(),
                value: spec.value.clone(),
                line_breaks: spec.line_breaks || spec.pattern.is_recovery(),
                error: spec.error || spec.pattern == Pattern::ErrorCollector,
                transition,
            });
        }

        let matcher = if patterns.is_empty() {
            None
        } else {
            let regex = Regex::new_many(&patterns).map_err(|err| CompileError::InvalidPattern {
                state: state.to_string(),
                rule: "*".to_owned(),
                message: err.to_string(),
            })?;
            Some(Matcher {
                regex,
                rule_of_pattern,
            })
        };

        Ok(CompiledState {
            name: Arc::clone(state),
            rules: compiled,
            fast,
            matcher,
            recovery,
        })
    }

    fn resolve_transition(
        &self,
        state: &str,
        rule: &str,
        spec: &RuleSpec,
    ) -> Result<Option<Transition>, CompileError> {
        let declared = usize::from(spec.push.is_some())
            + usize::from(spec.pop.is_some())
            + usize::from(spec.next.is_some());
        if declared == 0 {
            return Ok(None);
        }
        if declared > 1 {
            return Err(CompileError::ConflictingTransitions {
                state: state.to_owned(),
                rule: rule.to_owned(),
            });
        }
        if !self.stateful {
            return Err(CompileError::TransitionInStatelessLexer {
                rule: rule.to_owned(),
            });
        }

        let lookup = |target: &str| {
            self.ids
                .get(target)
                .copied()
                .ok_or_else(|| CompileError::MissingState {
                    state: state.to_owned(),
                    rule: rule.to_owned(),
                    target: target.to_owned(),
                })
        };

        let transition = match (&spec.push, spec.pop, &spec.next) {
            (Some(target), _, _) => Transition::Push(lookup(target)?),
            (_, Some(0), _) => {
                return Err(CompileError::InvalidPop {
                    state: state.to_owned(),
                    rule: rule.to_owned(),
                })
            }
            (_, Some(count), _) => Transition::Pop(count),
            (_, _, Some(target)) => Transition::Next(lookup(target)?),
            (None, None, None) => return Ok(None),
        };
        Ok(Some(transition))
    }

    fn check_line_breaks(
        &mut self,
        state: &str,
        rule: &str,
        spec: &RuleSpec,
        may_match_newline: bool,
    ) -> Result<(), CompileError> {
        if spec.line_breaks || !may_match_newline {
            return Ok(());
        }
        match self.config.line_breaks {
            LineBreakCheck::Allow => Ok(()),
            LineBreakCheck::Warn => {
                warn!(
                    state,
                    rule, "rule may match a line break but does not track line breaks"
                );
                self.warnings.push(CompileWarning {
                    state: state.to_owned(),
                    rule: rule.to_owned(),
                    kind: CompileWarningKind::UndeclaredLineBreaks,
                });
                Ok(())
            }
            LineBreakCheck::Deny => Err(CompileError::UndeclaredLineBreaks {
                state: state.to_owned(),
                rule: rule.to_owned(),
            }),
        }
    }
}

/// The only character of `text`, if it has exactly one.
fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
