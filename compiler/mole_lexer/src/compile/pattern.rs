//! Compile-time analysis of rule patterns.
//!
//! Works on the parsed HIR so the checks see what the regex engine will
//! actually run, not the surface syntax.

use regex_syntax::hir::{Class, Hir, HirKind};

/// Facts about one regex pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PatternInfo {
    /// The pattern can succeed without consuming input.
    pub(crate) matches_empty: bool,
    /// Some match of the pattern may contain `\n`.
    pub(crate) may_match_newline: bool,
}

/// Parse and analyze a regex pattern.
///
/// The error string is the parser's own message.
pub(crate) fn analyze(pattern: &str) -> Result<PatternInfo, String> {
    let hir = regex_syntax::parse(pattern).map_err(|err| err.to_string())?;
    Ok(PatternInfo {
        matches_empty: hir.properties().minimum_len() == Some(0),
        may_match_newline: can_match_newline(&hir),
    })
}

/// Conservative: any reachable literal or class containing `\n` counts.
fn can_match_newline(hir: &Hir) -> bool {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => false,
        HirKind::Literal(literal) => literal.0.contains(&b'\n'),
        HirKind::Class(Class::Unicode(class)) => class
            .ranges()
            .iter()
            .any(|range| range.start() <= '\n' && '\n' <= range.end()),
        HirKind::Class(Class::Bytes(class)) => class
            .ranges()
            .iter()
            .any(|range| range.start() <= b'\n' && b'\n' <= range.end()),
        HirKind::Repetition(repetition) => {
            repetition.max != Some(0) && can_match_newline(&repetition.sub)
        }
        HirKind::Capture(capture) => can_match_newline(&capture.sub),
        HirKind::Concat(subs) | HirKind::Alternation(subs) => subs.iter().any(can_match_newline),
    }
}

/// Regex source for a set of literal alternatives, longest first.
///
/// Sorting is stable, so equal-length literals keep their declared order.
pub(crate) fn literal_alternation(literals: &[&str]) -> String {
    let mut sorted = literals.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    sorted
        .iter()
        .map(|literal| regex_syntax::escape(literal))
        .collect::<Vec<_>>()
        .join("|")
}

/// Wrap a user pattern for the combined matcher.
///
/// Multi-line mode makes `^` and `$` match at line boundaries. The group
/// keeps a top-level alternation in the user pattern self-contained.
pub(crate) fn wrap_user_pattern(pattern: &str) -> String {
    format!("(?m:{pattern})")
}
