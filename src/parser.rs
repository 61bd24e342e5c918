//! The `Parser` trait every grammar node implements.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ParseContext;
use crate::result::PResult;

/// A node in a parser combinator tree.
///
/// Nodes are immutable after construction and reusable across parses: all
/// per-parse state lives in the [`ParseContext`] passed into `parse_rec`,
/// never in `self`. Implementors must also implement [`fmt::Display`],
/// rendering the grammar notation for the node (`Literal("foo")`,
/// `(A ~ B)`, `rule_name`, ...) — this is what failure trace frames and
/// `Either`'s own failure description are built from.
pub trait Parser<T>: fmt::Display + Send + Sync {
    /// Attempts to match this parser's grammar at `index` in
    /// `ctx.input()`, consuming zero or more code units.
    ///
    /// # Invariants
    /// - On success, `index <= result.index <= ctx.len()`.
    /// - `result.cut` is the OR of every cut flag observed on this path.
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<T>;

    /// Exposes the concrete node as [`Any`], used internally to detect
    /// left-spine `Sequence`/`Either` chains at construction time so they
    /// can be flattened instead of nested.
    fn as_any(&self) -> &dyn Any;
}

/// Extension methods mirroring the operator surface of `spec.md` §6
/// (`p.rep()`, `p | q`, `p ~ q`, `p.?`, `!p`, `&p`, `p.!`, `p.map(f)`).
///
/// These are convenience wrappers over the free constructor functions in
/// [`crate::combinator`]; see that module for the actual combinator types.
pub trait ParserExt<T>: Parser<T> + 'static
where
    T: 'static,
{
    /// `p.capture()` — `p.!` in the source grammar surface.
    fn capture(self: Arc<Self>) -> Arc<dyn Parser<String>> {
        crate::combinator::capturing(self)
    }

    /// `p.map(f)`.
    fn map<U: 'static>(
        self: Arc<Self>,
        f: impl Fn(T) -> U + Send + Sync + 'static,
    ) -> Arc<dyn Parser<U>> {
        crate::combinator::mapper(self, f)
    }

    /// `p.opt()` — `p.?` in the source grammar surface, wrapping the value
    /// in `Option`.
    fn opt(self: Arc<Self>) -> Arc<dyn Parser<Option<T>>> {
        crate::combinator::optional(self)
    }

    /// `&p` — zero-width positive lookahead.
    fn lookahead(self: Arc<Self>) -> Arc<dyn Parser<()>> {
        crate::combinator::lookahead(self)
    }

    /// `!p` — zero-width negative lookahead.
    fn not(self: Arc<Self>) -> Arc<dyn Parser<()>> {
        crate::combinator::not(self)
    }

    /// `p.rep(min)` with no delimiter, accumulating into a `Vec<T>`.
    fn rep(self: Arc<Self>, min: usize) -> Arc<dyn Parser<Vec<T>>> {
        crate::combinator::repeat_vec(self, min)
    }

    /// Top-level entry point: `parser.parse(input, index, trace)`.
    fn parse(self: &Arc<Self>, input: impl Into<String>, index: usize, trace: bool) -> PResult<T> {
        let mut ctx = ParseContext::new(input, trace);
        self.parse_rec(&mut ctx, index)
    }
}

impl<T: 'static, P: Parser<T> + ?Sized + 'static> ParserExt<T> for P {}
