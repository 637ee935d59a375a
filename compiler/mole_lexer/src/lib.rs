//! Rule-driven, stateful lexer.
//!
//! Describe tokens as ordered, named rules; compile them once; then pull
//! tokens one at a time from any number of buffers.
//!
//! ```
//! use mole_lexer::{compile, keywords, RuleSpec, Rules};
//!
//! let mut lexer = compile(
//!     Rules::new()
//!         .rule("ws", RuleSpec::regex(r"[ \t]+"))
//!         .rule("nl", RuleSpec::literal("\n").line_breaks())
//!         .rule(
//!             "ident",
//!             RuleSpec::regex(r"[a-z]+").kind(keywords([("keyword", ["let"])])),
//!         )
//!         .rule("eq", "=")
//!         .rule("number", RuleSpec::regex(r"[0-9]+")),
//! )
//! .unwrap();
//!
//! lexer.reset("let x = 1");
//! let kinds: Vec<String> = lexer
//!     .tokens()
//!     .map(|token| token.unwrap().kind.to_string())
//!     .collect();
//! assert_eq!(kinds, ["keyword", "ws", "ident", "ws", "eq", "ws", "number"]);
//! ```
//!
//! # Architecture
//!
//! - `rule`: declarative input ([`Rules`], [`States`], [`RuleSpec`])
//! - `compile`: validation and lowering into a state graph
//! - `graph`: per-state rule tables and matchers
//! - `scanner`: the [`Lexer`] itself
//!
//! Buffer, position and token primitives come from `mole_lexer_core`; error
//! snippets are rendered by `mole_diagnostic`.
//!
//! # Multiple states
//!
//! ```
//! use mole_lexer::{states, RuleSpec, Rules, States};
//!
//! let mut lexer = states(
//!     States::new()
//!         .state(
//!             "main",
//!             Rules::new()
//!                 .rule("word", RuleSpec::regex("[a-z]+"))
//!                 .rule("quote", RuleSpec::literal("\"").push("string")),
//!         )
//!         .state(
//!             "string",
//!             Rules::new()
//!                 .rule("chars", RuleSpec::regex(r#"[^"]+"#).line_breaks())
//!                 .rule("quote", RuleSpec::literal("\"").pop(1)),
//!         ),
//!     None,
//! )
//! .unwrap();
//!
//! lexer.reset(r#"say"hi""#);
//! let texts: Vec<String> = lexer.tokens().map(|t| t.unwrap().text).collect();
//! assert_eq!(texts, ["say", "\"", "hi", "\""]);
//! assert_eq!(lexer.state_name(), "main");
//! ```

mod compile;
mod config;
mod error;
mod graph;
mod keywords;
mod rule;
mod scanner;

pub use config::{LexerConfig, LineBreakCheck};
pub use error::{CompileError, CompileWarning, CompileWarningKind, LexError};
pub use graph::StateId;
pub use keywords::keywords;
pub use rule::{Pattern, RuleSpec, Rules, States, TypeMapper, ValueTransform};
pub use scanner::{Lexer, Snapshot, Tokens, DEFAULT_ERROR_MESSAGE};

pub use mole_lexer_core::{Position, Token};

/// Compile a single-state lexer.
///
/// The state is named `"start"`. Rules may not switch state.
pub fn compile(rules: Rules) -> Result<Lexer, CompileError> {
    compile_with(rules, &LexerConfig::default())
}

/// [`compile`] with an explicit configuration.
pub fn compile_with(rules: Rules, config: &LexerConfig) -> Result<Lexer, CompileError> {
    let states = States::new().state(compile::DEFAULT_STATE, rules);
    compile::compile_graph(&states, None, false, config).map(Lexer::new)
}

/// Compile a multi-state lexer.
///
/// Scanning begins in `start`, or in the first declared state if `None`.
pub fn states(states: States, start: Option<&str>) -> Result<Lexer, CompileError> {
    states_with(states, start, &LexerConfig::default())
}

/// [`states`] with an explicit configuration.
pub fn states_with(
    states: States,
    start: Option<&str>,
    config: &LexerConfig,
) -> Result<Lexer, CompileError> {
    compile::compile_graph(&states, start, true, config).map(Lexer::new)
}
