use super::{render_snippet, SnippetOptions};
use mole_lexer_core::Position;
use pretty_assertions::assert_eq;

fn at(line: u32, column: u32, offset: usize) -> Position {
    Position {
        line,
        column,
        offset,
    }
}

#[test]
fn caret_under_column_with_context() {
    let source = "let x = 1\nlet $ = 2\nlet z = 3";
    let out = render_snippet(
        source,
        at(2, 5, 14),
        "invalid syntax",
        &SnippetOptions::default(),
    );
    assert_eq!(
        out,
        "invalid syntax at line 2 col 5:\n\
         \n\
         1  let x = 1\n\
         2  let $ = 2\n       ^\n\
         3  let z = 3"
    );
}

#[test]
fn first_column_of_single_line_without_newline() {
    let out = render_snippet("$", at(1, 1, 0), "oops", &SnippetOptions::default());
    assert_eq!(out, "oops at line 1 col 1:\n\n1  $\n   ^");
}

#[test]
fn context_is_clipped_to_configured_lines() {
    let source = "a\nb\nc\nd\ne\nf\ng";
    let options = SnippetOptions {
        context_lines: 1,
        ..SnippetOptions::default()
    };
    let out = render_snippet(source, at(4, 1, 6), "here", &options);
    assert_eq!(out, "here at line 4 col 1:\n\n3  c\n4  d\n   ^\n5  e");
}

#[test]
fn line_numbers_are_right_aligned() {
    let source: String = (1..=12).map(|n| format!("l{n}\n")).collect();
    let out = render_snippet(&source, at(10, 2, 28), "msg", &SnippetOptions::default());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[2], " 8  l8");
    assert_eq!(lines[4], "10  l10");
    assert_eq!(lines[5], "     ^");
    assert_eq!(lines[7], "12  l12");
}

#[test]
fn tabs_are_preserved_in_caret_padding() {
    let out = render_snippet("\tx", at(1, 2, 1), "msg", &SnippetOptions::default());
    assert_eq!(out, "msg at line 1 col 2:\n\n1  \tx\n   \t^");
}

#[test]
fn caret_at_end_of_input() {
    let out = render_snippet("ab", at(1, 3, 2), "eof", &SnippetOptions::default());
    assert_eq!(out, "eof at line 1 col 3:\n\n1  ab\n     ^");
}

#[test]
fn end_of_input_after_trailing_newline() {
    let out = render_snippet("ab\n", at(2, 1, 3), "eof", &SnippetOptions::default());
    assert_eq!(out, "eof at line 2 col 1:\n\n1  ab\n2  \n   ^");
}

#[test]
fn multi_line_span_points_at_its_start() {
    // A token covering "b\nc" starts on line 2.
    let source = "a\nb\nc\nd";
    let out = render_snippet(source, at(2, 1, 2), "here", &SnippetOptions::default());
    assert_eq!(out, "here at line 2 col 1:\n\n1  a\n2  b\n   ^\n3  c\n4  d");
}

#[test]
fn origin_shifts_line_numbers_and_first_line_columns() {
    let options = SnippetOptions {
        origin: at(3, 5, 40),
        context_lines: 2,
    };
    let out = render_snippet("ab\ncd", at(3, 6, 41), "msg", &options);
    assert_eq!(out, "msg at line 3 col 6:\n\n3  ab\n    ^\n4  cd");
}

#[test]
fn offsets_outside_buffer_degrade_to_header() {
    let options = SnippetOptions {
        origin: at(5, 1, 100),
        ..SnippetOptions::default()
    };
    assert_eq!(
        render_snippet("abc", at(2, 1, 10), "stale", &options),
        "stale at line 2 col 1:"
    );
    assert_eq!(
        render_snippet("abc", at(9, 1, 200), "stale", &options),
        "stale at line 9 col 1:"
    );
}

#[test]
fn earlier_offset_on_origin_line_degrades_to_header() {
    // The origin sits mid-line, so line numbers alone cannot tell the
    // previous buffer's text from this one's.
    let options = SnippetOptions {
        origin: at(1, 3, 2),
        ..SnippetOptions::default()
    };
    assert_eq!(
        render_snippet("cd", at(1, 1, 0), "stale", &options),
        "stale at line 1 col 1:"
    );
    assert_eq!(
        render_snippet("cd", at(1, 4, 3), "here", &options),
        "here at line 1 col 4:\n\n1  cd\n    ^"
    );
}
