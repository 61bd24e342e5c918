//! Grammar-construction errors.
//!
//! `spec.md` §7 is explicit that there is exactly one *parsing* failure
//! channel ([`crate::result::Failure`]), which is a normal, expected parser
//! outcome rather than a Rust error to `?`-propagate. `GrammarError` is a
//! different thing entirely: a statically typed target needs to reject
//! malformed *grammars* (an empty [`crate::StringIn`] alternative set, a
//! [`crate::Rule`] whose lazy body panics on first use) at construction
//! time, the way the dynamically typed source never had to. This mirrors
//! the teacher's own split between `Err`/`ErrMode` (a parse outcome) and
//! ordinary `Result`/`panic!` for misuse — no `thiserror` is pulled in,
//! since the teacher hand-rolls its error types too.

use std::fmt;

/// A grammar was built incorrectly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// [`crate::StringIn`] was constructed with no alternatives, so it
    /// could never succeed.
    EmptyAlternation,
    /// A [`crate::Rule`]'s body was referenced (via `parse_rec`) before its
    /// lazy thunk was ever installed.
    UnboundRule {
        /// The rule's name, for diagnostics.
        name: String,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::EmptyAlternation => {
                write!(f, "StringIn requires at least one alternative")
            }
            GrammarError::UnboundRule { name } => {
                write!(f, "rule {name:?} was parsed before its body was bound")
            }
        }
    }
}

impl std::error::Error for GrammarError {}
