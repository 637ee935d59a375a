//! Declarative rule input for the rule compiler.
//!
//! A lexer is described as an ordered list of named rules per state. Order
//! is significant: at any position the first declared rule that matches
//! wins, so specific keywords go before a generic identifier pattern.
//!
//! ```
//! use mole_lexer::{Rules, RuleSpec};
//!
//! let rules = Rules::new()
//!     .rule("ws", RuleSpec::regex(r"[ \t]+"))
//!     .rule("nl", RuleSpec::literal("\n").line_breaks())
//!     .rule("op", ["+", "-", "*", "/"])
//!     .rule("number", RuleSpec::regex(r"[0-9]+"));
//! assert_eq!(rules.len(), 4);
//! ```

use std::fmt;
use std::sync::Arc;

/// What a rule matches.
///
/// The two recovery markers are variants of their own, so a literal or
/// pattern can never be mistaken for one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// One or more literal alternatives. Longer literals are tried first.
    Literals(Vec<String>),
    /// A regular expression, matched at the cursor only.
    Regex(String),
    /// Matches exactly one character when no other rule of the state does.
    Fallback,
    /// Matches the unmatched run of input up to the next position where
    /// some rule of the state matches, producing one error token.
    ErrorCollector,
}

impl Pattern {
    /// Returns `true` for [`Pattern::Fallback`] and [`Pattern::ErrorCollector`].
    pub fn is_recovery(&self) -> bool {
        matches!(self, Pattern::Fallback | Pattern::ErrorCollector)
    }
}

/// Maps matched text to a token kind.
///
/// Returning `None` keeps the rule's own name as the kind. The mapper also
/// lists the kinds it can produce, so [`Lexer::has`](crate::Lexer::has) can
/// answer for them. Mappers must be pure: scanning the same buffer twice
/// must yield the same tokens.
#[derive(Clone)]
pub struct TypeMapper {
    map: Arc<dyn Fn(&str) -> Option<Arc<str>> + Send + Sync>,
    kinds: Vec<Arc<str>>,
}

impl TypeMapper {
    /// Wrap a mapping function. It declares no kinds until
    /// [`with_kinds`](Self::with_kinds) is called.
    pub fn new<F>(map: F) -> Self
    where
        F: Fn(&str) -> Option<Arc<str>> + Send + Sync + 'static,
    {
        TypeMapper {
            map: Arc::new(map),
            kinds: Vec::new(),
        }
    }

    /// Declare the kinds this mapper can produce.
    #[must_use]
    pub fn with_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    /// Apply the mapping.
    #[inline]
    pub fn map(&self, text: &str) -> Option<Arc<str>> {
        (self.map)(text)
    }

    /// Kinds this mapper declared.
    pub fn kinds(&self) -> &[Arc<str>] {
        &self.kinds
    }
}

impl fmt::Debug for TypeMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapper")
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

/// Transforms matched text into the stored token value.
#[derive(Clone)]
pub struct ValueTransform(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl ValueTransform {
    /// Wrap a transform function. Like [`TypeMapper`], it must be pure.
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        ValueTransform(Arc::new(transform))
    }

    /// Apply the transform.
    #[inline]
    pub fn apply(&self, text: &str) -> String {
        (self.0)(text)
    }
}

impl fmt::Debug for ValueTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueTransform(..)")
    }
}

/// One rule, before compilation.
///
/// The three state transitions are stored independently. Declaring more
/// than one of them is legal here and rejected by the compiler.
#[derive(Clone, Debug)]
pub struct RuleSpec {
    pub(crate) pattern: Pattern,
    pub(crate) line_breaks: bool,
    pub(crate) push: Option<String>,
    pub(crate) pop: Option<usize>,
    pub(crate) next: Option<String>,
    pub(crate) error: bool,
    pub(crate) kind: Option<TypeMapper>,
    pub(crate) value: Option<ValueTransform>,
}

impl RuleSpec {
    fn with_pattern(pattern: Pattern) -> Self {
        RuleSpec {
            pattern,
            line_breaks: false,
            push: None,
            pop: None,
            next: None,
            error: false,
            kind: None,
            value: None,
        }
    }

    /// Match one literal string.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::with_pattern(Pattern::Literals(vec![text.into()]))
    }

    /// Match any of a set of literal strings.
    pub fn literals<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_pattern(Pattern::Literals(
            texts.into_iter().map(Into::into).collect(),
        ))
    }

    /// Match a regular expression.
    ///
    /// The pattern runs in multi-line mode, so `^` and `$` match at line
    /// boundaries. It must not be able to match the empty string.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::with_pattern(Pattern::Regex(pattern.into()))
    }

    /// The fallback rule: consume one character when nothing else matches.
    pub fn fallback() -> Self {
        Self::with_pattern(Pattern::Fallback)
    }

    /// The error-collector rule: gather unmatched input into one error token.
    pub fn error_collector() -> Self {
        Self::with_pattern(Pattern::ErrorCollector)
    }

    /// Declare that matches may contain line breaks.
    #[must_use]
    pub fn line_breaks(mut self) -> Self {
        self.line_breaks = true;
        self
    }

    /// Enter `state`, keeping the current state on the stack.
    #[must_use]
    pub fn push(mut self, state: impl Into<String>) -> Self {
        self.push = Some(state.into());
        self
    }

    /// Leave the current state, returning `count` levels down the stack.
    #[must_use]
    pub fn pop(mut self, count: usize) -> Self {
        self.pop = Some(count);
        self
    }

    /// Replace the current state with `state` without growing the stack.
    #[must_use]
    pub fn next(mut self, state: impl Into<String>) -> Self {
        self.next = Some(state.into());
        self
    }

    /// Flag every match of this rule as an error token.
    #[must_use]
    pub fn error(mut self) -> Self {
        self.error = true;
        self
    }

    /// Compute the token kind from the matched text.
    #[must_use]
    pub fn kind(mut self, mapper: TypeMapper) -> Self {
        self.kind = Some(mapper);
        self
    }

    /// Compute the token value from the matched text.
    #[must_use]
    pub fn value<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.value = Some(ValueTransform::new(transform));
        self
    }

    /// What this rule matches.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl From<&str> for RuleSpec {
    fn from(text: &str) -> Self {
        RuleSpec::literal(text)
    }
}

impl From<String> for RuleSpec {
    fn from(text: String) -> Self {
        RuleSpec::literal(text)
    }
}

impl From<Vec<&str>> for RuleSpec {
    fn from(texts: Vec<&str>) -> Self {
        RuleSpec::literals(texts)
    }
}

impl<const N: usize> From<[&str; N]> for RuleSpec {
    fn from(texts: [&str; N]) -> Self {
        RuleSpec::literals(texts)
    }
}

/// One entry of a state's rule list.
#[derive(Clone, Debug)]
pub(crate) enum RuleEntry {
    Rule { name: Arc<str>, spec: RuleSpec },
    /// Splice in the rules of another state at this point.
    Include(String),
}

/// The ordered rule list of one state.
#[derive(Clone, Debug, Default)]
pub struct Rules {
    entries: Vec<RuleEntry>,
}

impl Rules {
    /// An empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, name: impl Into<Arc<str>>, spec: impl Into<RuleSpec>) -> Self {
        self.entries.push(RuleEntry::Rule {
            name: name.into(),
            spec: spec.into(),
        });
        self
    }

    /// Append several rules sharing one name, in order.
    #[must_use]
    pub fn rules<I>(mut self, name: impl Into<Arc<str>>, specs: I) -> Self
    where
        I: IntoIterator<Item = RuleSpec>,
    {
        let name = name.into();
        self.entries
            .extend(specs.into_iter().map(|spec| RuleEntry::Rule {
                name: Arc::clone(&name),
                spec,
            }));
        self
    }

    /// Splice the rules of `state` in at this point.
    ///
    /// Includes are expanded recursively; a state already spliced into the
    /// current list is skipped, so include cycles are harmless.
    #[must_use]
    pub fn include(mut self, state: impl Into<String>) -> Self {
        self.entries.push(RuleEntry::Include(state.into()));
        self
    }

    /// Number of entries (rules and includes).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries were declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }
}

impl<N, S> FromIterator<(N, S)> for Rules
where
    N: Into<Arc<str>>,
    S: Into<RuleSpec>,
{
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Rules::new(), |rules, (name, spec)| rules.rule(name, spec))
    }
}

/// Named states and their rule lists, in declaration order.
///
/// The first state is the start state unless another is named when
/// compiling.
#[derive(Clone, Debug, Default)]
pub struct States {
    states: Vec<(Arc<str>, Rules)>,
}

impl States {
    /// No states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state.
    #[must_use]
    pub fn state(mut self, name: impl Into<Arc<str>>, rules: Rules) -> Self {
        self.states.push((name.into(), rules));
        self
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no states were declared.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[(Arc<str>, Rules)] {
        &self.states
    }
}

impl<N> FromIterator<(N, Rules)> for States
where
    N: Into<Arc<str>>,
{
    fn from_iter<I: IntoIterator<Item = (N, Rules)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(States::new(), |states, (name, rules)| states.state(name, rules))
    }
}
