//! A recursive-descent parser combinator engine with cut-controlled
//! backtracking.
//!
//! Grammars are built as a tree of [`Parser`] nodes from a small set of
//! primitives ([`atomic`]) and combinators ([`combinator`]): sequence,
//! ordered choice, repetition, optional, lookahead, negation, capture, map,
//! and named [`rule::Rule`]. Execution goes through the uniform
//! `parse_rec(ctx, index)` contract every node implements, producing either
//! a typed [`result::Success`] or a [`result::Failure`] carrying a stack
//! trace of attempted rules.
//!
//! ```
//! use std::sync::Arc;
//! use sift::atomic::CharsWhile;
//! use sift::parser::{Parser, ParserExt};
//!
//! let digits: Arc<dyn Parser<String>> =
//!     Arc::new(CharsWhile::new(|c: char| c.is_ascii_digit(), 1, "digit"));
//! let ok = digits.parse("123abc", 0, false).unwrap();
//! assert_eq!(ok.value, "123");
//! assert_eq!(ok.index, 3);
//! ```
//!
//! ## What this crate is not
//!
//! Not a parser generator (there's no surface grammar syntax, only the
//! combinator algebra), not left-recursive, not memoizing, and not
//! streaming: the input is a fully materialized `&str`/`String`, addressed
//! by byte offset, and operated on one `char` at a time rather than by
//! Unicode grapheme cluster.

pub mod aggregate;
pub mod atomic;
pub mod combinator;
pub mod context;
pub mod error;
pub mod log;
pub mod parser;
pub mod predicate;
pub mod render;
pub mod result;
pub mod rule;
pub mod trie;
pub mod walker;

pub use atomic::{AnyChar, CharIn, CharLiteral, CharPred, CharsWhile, End, Fail, Literal, Pass, Start};
pub use combinator::{
    capturing, choice, either, lookahead, mapper, not, optional, repeat, repeat_vec, repeat_vec_sep, then, then_cut,
    Capturing, Either, Flat, Lookahead, Logged, Mapper, Not, Optional, Repeat,
};
pub use context::ParseContext;
pub use error::GrammarError;
pub use parser::{Parser, ParserExt};
pub use result::{Failure, Frame, PResult, Success};
pub use rule::{rule, Rule};
pub use trie::StringIn;
pub use walker::{Identity, MapChildren, ScopedWalker, Walker};
