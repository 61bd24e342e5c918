//! Unary, binary, and variadic combinators: `spec.md` §4.2, §4.4-§4.6.
//!
//! Split into sibling modules the way the teacher splits `combinator/core`,
//! `combinator/sequence`, and `combinator/multi`: [`core`] for the
//! single-child combinators, [`sequence`] for `Sequence`/`Flat`,
//! [`choice`] for ordered-choice `Either`, and [`repeat`] for `Repeat`.

mod choice;
mod core;
mod repeat;
mod sequence;

pub use choice::{choice, either, Either};
pub use core::{capturing, logged, logged_silent, lookahead, mapper, not, optional, Capturing, Lookahead, Logged, Mapper, Not, Optional};
pub use repeat::{no_delimiter, repeat, repeat_vec, repeat_vec_sep, Repeat};
pub use sequence::{then, then_cut, Flat};
