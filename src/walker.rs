//! Structural tree rewriting: `spec.md` §4.8.
//!
//! A [`Walker`] is a function from a parser to a parser. [`MapChildren`] is
//! the per-node hook every node implements (`mapChildren(walker)` in the
//! spec): it rebuilds the node with each child passed through the walker,
//! preserving the node's own kind and non-child attributes. Grammar
//! rewriting and introspection tools compose a `Walker` and apply it to a
//! grammar's root; most nodes only need to thread the walker down to their
//! immediate children, since a full-tree rewrite falls out of applying
//! [`MapChildren::map_children`] recursively from the root.
//!
//! [`ScopedWalker`] is the spec's identity-threading variant: the spec
//! describes it as carrying "a notion of current parent" but leaves that
//! notion implementation-free, so here it's a thin wrapper wired for a
//! caller to extend with whatever scope bookkeeping a particular rewrite
//! needs, while still behaving as the identity walker on its own.

use std::sync::Arc;

use crate::Parser;

/// Maps a parser to a (possibly different) parser of the same output type.
pub trait Walker: Send + Sync {
    /// Rewrites `parser`, typically by recursing into its children via
    /// [`MapChildren::map_children`] and/or swapping it out entirely.
    fn visit<T: 'static>(&self, parser: Arc<dyn Parser<T>>) -> Arc<dyn Parser<T>>;
}

/// Leaves every node unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Walker for Identity {
    fn visit<T: 'static>(&self, parser: Arc<dyn Parser<T>>) -> Arc<dyn Parser<T>> {
        parser
    }
}

/// Wraps an inner [`Walker`], leaving room for scope-aware rewrites to
/// track "what parent are we inside of" without changing the base
/// behavior of the wrapped walker.
pub struct ScopedWalker<W> {
    inner: W,
}

impl<W: Walker> ScopedWalker<W> {
    /// Wraps `inner`.
    pub fn new(inner: W) -> Self {
        ScopedWalker { inner }
    }
}

impl<W: Walker> Walker for ScopedWalker<W> {
    fn visit<T: 'static>(&self, parser: Arc<dyn Parser<T>>) -> Arc<dyn Parser<T>> {
        self.inner.visit(parser)
    }
}

/// A node that can rebuild itself with each child rewritten by a [`Walker`].
///
/// Implemented with an `Arc<Self>` receiver (not `&self`) since rewriting
/// produces a new `Arc<dyn Parser<T>>` and, for the opaque nodes below, may
/// just hand the same `Arc` back out.
pub trait MapChildren<T> {
    /// Rebuilds `self` with every child passed through `walker`.
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<T>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_visit_returns_the_same_parser() {
        let p: Arc<dyn Parser<()>> = Arc::new(crate::atomic::Pass);
        let rewritten = Identity.visit(p.clone());
        assert!(Arc::ptr_eq(&p, &rewritten));
    }
}
