//! Property-based tests for the scanner.
//!
//! 1. Lossless coverage: concatenating token texts reproduces the input.
//! 2. Save/restore: resuming on the unread remainder of a buffer produces
//!    exactly the tokens an uninterrupted scan would.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use mole_lexer::{compile, keywords, Lexer, RuleSpec, Rules, Token};
use proptest::prelude::*;

fn lexer() -> Lexer {
    compile(
        Rules::new()
            .rule("lparen", "(")
            .rule("rparen", ")")
            .rule("ws", RuleSpec::regex(r"[ \t\n]+").line_breaks())
            .rule(
                "ident",
                RuleSpec::regex(r"[a-zé_][a-zé_0-9]*")
                    .kind(keywords([("keyword", ["if", "else", "let"])])),
            )
            .rule("number", RuleSpec::regex("[0-9]+"))
            .rule("op", ["==", "=", "+", "-", ","])
            .rule("other", RuleSpec::fallback()),
    )
    .unwrap()
}

fn scan(lexer: &mut Lexer, input: &str) -> Vec<Token> {
    lexer.reset(input);
    lexer.tokens().collect::<Result<_, _>>().unwrap()
}

fn input_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-z0-9 \t\n()=+,é$#-]{0,48}").expect("valid regex")
}

proptest! {
    #[test]
    fn token_texts_cover_input(input in input_strategy()) {
        let mut lexer = lexer();
        let tokens = scan(&mut lexer, &input);

        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(&joined, &input);

        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.offset, offset);
            prop_assert!(!token.text.is_empty());
            offset = token.offset + token.text.len();
        }
        prop_assert_eq!(lexer.position().offset, input.len());
    }

    #[test]
    fn lines_match_newline_count(input in input_strategy()) {
        let mut lexer = lexer();
        let tokens = scan(&mut lexer, &input);

        let breaks: u32 = tokens.iter().map(|t| t.line_breaks).sum();
        let newlines = input.matches('\n').count();
        prop_assert_eq!(breaks as usize, newlines);
        prop_assert_eq!(lexer.position().line as usize, newlines + 1);
    }

    #[test]
    fn restore_on_remainder_matches_uninterrupted_scan(
        input in input_strategy(),
        split in 0usize..64,
    ) {
        let mut whole = lexer();
        let expected = scan(&mut whole, &input);
        let split = split.min(expected.len());

        let mut first = lexer();
        first.reset(input.clone());
        let mut tokens: Vec<Token> = (0..split)
            .map(|_| first.next().unwrap().unwrap())
            .collect();
        let snapshot = first.save();

        let rest = &input[snapshot.position().offset..];
        let mut second = first.clone();
        second.restore(rest, &snapshot).unwrap();
        tokens.extend(second.tokens().map(|t| t.unwrap()));

        prop_assert_eq!(tokens, expected);
        prop_assert_eq!(second.position(), whole.position());
    }

    #[test]
    fn end_of_input_is_sticky(input in input_strategy()) {
        let mut lexer = lexer();
        scan(&mut lexer, &input);
        let at = lexer.position();
        prop_assert_eq!(lexer.next(), Ok(None));
        prop_assert_eq!(lexer.next(), Ok(None));
        prop_assert_eq!(lexer.position(), at);
    }
}
