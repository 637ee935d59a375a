//! End-to-end scanning of a small template-string language.
//!
//! Exercises nested states (`${ ... }` inside backtick strings inside
//! braces), shared rules via `include`, keyword mapping, chunked input and
//! diagnostics together.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mole_lexer::{
    keywords, states, states_with, CompileError, LexError, Lexer, LexerConfig, RuleSpec, Rules,
    States, Token,
};
use pretty_assertions::assert_eq;

fn grammar() -> States {
    States::new()
        .state(
            "main",
            Rules::new()
                .include("common")
                .rule(
                    "ident",
                    RuleSpec::regex("[A-Za-z_][A-Za-z0-9_]*")
                        .kind(keywords([("keyword", ["let", "const"])])),
                )
                .rule(
                    "number",
                    RuleSpec::regex("[0-9]+(?:_[0-9]+)*").value(|text| text.replace('_', "")),
                )
                .rule("backtick", RuleSpec::literal("`").push("template"))
                .rule("lbrace", RuleSpec::literal("{").push("main"))
                .rule("rbrace", RuleSpec::literal("}").pop(1))
                .rule("op", ["=", "+", ";", ","]),
        )
        .state(
            "template",
            Rules::new()
                .rule("interp", RuleSpec::literal("${").push("main"))
                .rule("backtick", RuleSpec::literal("`").pop(1))
                .rule("chars", RuleSpec::regex("[^`$]+").line_breaks())
                .rule("dollar", "$"),
        )
        .state(
            "common",
            Rules::new()
                .rule("ws", RuleSpec::regex(r"[ \t\n]+").line_breaks())
                .rule("comment", RuleSpec::regex("//[^\n]*")),
        )
}

fn lexer() -> Lexer {
    states_with(grammar(), Some("main"), &LexerConfig::strict()).unwrap()
}

fn scan(lexer: &mut Lexer, input: &str) -> Vec<Token> {
    lexer.reset(input);
    lexer.tokens().collect::<Result<_, _>>().unwrap()
}

fn kinds(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| &*t.kind).collect()
}

const SOURCE: &str = "let msg = `hi ${name}, you are ${age + 1_000}!`; // done";

#[test]
fn nested_template_is_tokenized() {
    let mut lexer = lexer();
    let tokens = scan(&mut lexer, SOURCE);
    assert_eq!(
        kinds(&tokens),
        [
            "keyword", "ws", "ident", "ws", "op", "ws", "backtick", "chars", "interp", "ident",
            "rbrace", "chars", "interp", "ident", "ws", "op", "ws", "number", "rbrace", "chars",
            "backtick", "op", "ws", "comment",
        ]
    );
    assert_eq!(lexer.stack_depth(), 1);
    assert_eq!(lexer.state_name(), "main");
    assert!(lexer.warnings().is_empty());
}

#[test]
fn values_and_texts_differ_only_where_transformed() {
    let mut lexer = lexer();
    let tokens = scan(&mut lexer, SOURCE);
    let number = tokens.iter().find(|t| &*t.kind == "number").unwrap();
    assert_eq!(number.text, "1_000");
    assert_eq!(number.value, "1000");
    for token in tokens.iter().filter(|t| &*t.kind != "number") {
        assert_eq!(token.value, token.text);
    }
}

#[test]
fn braces_nest_inside_interpolation() {
    let mut lexer = lexer();
    let tokens = scan(&mut lexer, "`a${ { x } }b`");
    assert_eq!(
        kinds(&tokens),
        [
            "backtick", "chars", "interp", "ws", "lbrace", "ws", "ident", "ws", "rbrace", "ws",
            "rbrace", "chars", "backtick",
        ]
    );
    assert_eq!(lexer.stack_depth(), 1);
}

#[test]
fn lone_dollar_stays_in_template() {
    let mut lexer = lexer();
    let tokens = scan(&mut lexer, "`cost: $5`");
    assert_eq!(
        kinds(&tokens),
        ["backtick", "chars", "dollar", "chars", "backtick"]
    );
}

#[test]
fn multi_line_template_tracks_lines() {
    let mut lexer = lexer();
    let tokens = scan(&mut lexer, "`one\ntwo ${x}\n`");
    let x = tokens.iter().find(|t| t.text == "x").unwrap();
    assert_eq!((x.line, x.column), (2, 7));
    let closing = tokens.last().unwrap();
    assert_eq!((closing.line, closing.column), (3, 1));
    assert_eq!(lexer.position().line, 3);
}

#[test]
fn format_error_on_multi_line_token_points_at_its_start() {
    let mut lexer = lexer();
    let tokens = scan(&mut lexer, "`one\ntwo ${x}\n`");
    let chars = tokens.iter().find(|t| &*t.kind == "chars").unwrap();
    assert_eq!(chars.text, "one\ntwo ");
    assert_eq!(chars.line_breaks, 1);
    assert_eq!(
        lexer.format_error(Some(chars), Some("unterminated text")),
        "unterminated text at line 1 col 2:\n\n1  `one\n    ^\n2  two ${x}\n3  `"
    );
}

#[test]
fn stray_close_brace_underflows() {
    let mut lexer = lexer();
    lexer.reset("x }");
    lexer.next().unwrap();
    lexer.next().unwrap();
    assert_eq!(
        lexer.next(),
        Err(LexError::StateStackUnderflow {
            state: "main".into(),
            rule: "rbrace".into(),
            depth: 1,
            pop: 1,
        })
    );
}

#[test]
fn unterminated_template_leaves_stack() {
    let mut lexer = lexer();
    let tokens = scan(&mut lexer, "`open ${ a");
    assert_eq!(tokens.len(), 5);
    assert_eq!(lexer.stack_depth(), 3);
    assert_eq!(lexer.state_name(), "main");
}

#[test]
fn chunked_input_matches_one_shot() {
    let mut whole = lexer();
    let expected = scan(&mut whole, SOURCE);

    for split in 0..=expected.len() {
        let mut first = lexer();
        first.reset(SOURCE);
        let mut tokens: Vec<Token> = (0..split).map(|_| first.next().unwrap().unwrap()).collect();
        let snapshot = first.save();

        let mut second = lexer();
        second
            .restore(&SOURCE[snapshot.position().offset..], &snapshot)
            .unwrap();
        tokens.extend(second.tokens().map(Result::unwrap));
        assert_eq!(tokens, expected, "split after {split} tokens");
    }
}

#[test]
fn format_error_after_restore_uses_absolute_lines() {
    let mut lexer = lexer();
    lexer.reset("let a = 1\n");
    while lexer.next().unwrap().is_some() {}
    let snapshot = lexer.save();

    lexer.restore("let b = ?\nlet c = 3", &snapshot).unwrap();
    let err = loop {
        match lexer.next() {
            Ok(Some(_)) => {}
            Ok(None) => panic!("expected an error"),
            Err(err) => break err,
        }
    };
    assert_eq!(err.position().map(|p| (p.line, p.column)), Some((2, 9)));
    assert_eq!(
        lexer.format_error(None, Some("unexpected character")),
        "unexpected character at line 2 col 9:\n\n2  let b = ?\n           ^\n3  let c = 3"
    );
}

#[test]
fn has_reports_kinds_from_every_state() {
    let lexer = lexer();
    for kind in ["keyword", "ident", "chars", "interp", "ws", "comment", "dollar"] {
        assert!(lexer.has(kind), "{kind}");
    }
    assert!(!lexer.has("template"));
    assert!(!lexer.has("let"));
}

#[test]
fn strict_mode_rejects_undeclared_line_breaks() {
    let grammar = States::new().state(
        "main",
        Rules::new().rule("text", RuleSpec::regex("[^`]+")),
    );
    assert_eq!(
        states_with(grammar.clone(), None, &LexerConfig::strict()).unwrap_err(),
        CompileError::UndeclaredLineBreaks {
            state: "main".into(),
            rule: "text".into(),
        }
    );
    let lenient = states(grammar, None).unwrap();
    assert_eq!(lenient.warnings().len(), 1);
}
