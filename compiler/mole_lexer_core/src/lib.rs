//! Low-level primitives for the mole lexer.
//!
//! This crate is standalone: it knows nothing about rules, states or
//! regular expressions. It provides the three pieces every scan needs:
//!
//! - [`SourceBuffer`]: an owned input chunk plus a monotonic cursor
//! - [`Position`]: line/column/offset bookkeeping for the cursor
//! - [`Token`]: the immutable unit the scanner hands to callers
//!
//! The rule compiler and scanner engine live in `mole_lexer`.

mod position;
mod source_buffer;
mod token;

pub use position::Position;
pub use source_buffer::SourceBuffer;
pub use token::Token;
