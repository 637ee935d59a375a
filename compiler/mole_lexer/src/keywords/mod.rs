//! Keyword type mapping.
//!
//! Keywords are usually matched by the same rule as identifiers and then
//! re-typed by spelling:
//!
//! ```
//! use mole_lexer::{keywords, RuleSpec, Rules};
//!
//! let rules = Rules::new().rule(
//!     "identifier",
//!     RuleSpec::regex(r"[a-zA-Z_][a-zA-Z0-9_]*")
//!         .kind(keywords([("keyword", vec!["if", "else", "while"])])),
//! );
//! # let _ = rules;
//! ```
//!
//! `if` then comes out as kind `keyword`, `iffy` stays `identifier`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::TypeMapper;

/// Build a [`TypeMapper`] from `(kind, spellings)` pairs.
///
/// Every spelling maps to its kind; anything else maps to `None`, leaving
/// the rule's own name in place. A spelling listed under two kinds takes the
/// later one.
pub fn keywords<I, K, W, S>(entries: I) -> TypeMapper
where
    I: IntoIterator<Item = (K, W)>,
    K: Into<Arc<str>>,
    W: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut table: FxHashMap<String, Arc<str>> = FxHashMap::default();
    let mut kinds: Vec<Arc<str>> = Vec::new();

    for (kind, spellings) in entries {
        let kind: Arc<str> = kind.into();
        for spelling in spellings {
            table.insert(spelling.into(), Arc::clone(&kind));
        }
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    TypeMapper::new(move |text| table.get(text).cloned()).with_kinds(kinds)
}
