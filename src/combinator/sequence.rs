//! `Sequence` and its construction-time flattening into `Flat`: `spec.md` §4.4.
//!
//! The surface constructor (`then`/`then_cut`, i.e. `~`/`~!`) always
//! *produces* a [`Flat`] node directly rather than a two-child `Sequence`
//! wrapper: if the left operand is itself a `Flat` of the matching
//! accumulator type, its head and links are reused and one more [`Chain`]
//! link is appended, exactly realizing the "left-spine of `Sequence` nodes
//! rewritten at construction time" the spec describes. A fresh two-operand
//! call builds a one-link `Flat` directly, so there is no separate
//! unflattened `Sequence` type to keep in sync with it.
//!
//! Per the design notes, the heterogeneous chain is modeled as a vector of
//! type-erased links behind a small internal trait, with type safety
//! enforced only at construction through the typed `then`/`then_cut`
//! builders that erase values on push.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::aggregate::Sequencer;
use crate::context::ParseContext;
use crate::result::{Failure, PResult, Success};
use crate::walker::{MapChildren, Walker};
use crate::Parser;

/// Object-safe view of a `Parser<T>` with `T` erased to `Box<dyn Any>`.
trait ErasedParser: Send + Sync {
    fn parse_erased(&self, ctx: &mut ParseContext, index: usize) -> Result<(Box<dyn Any>, usize, bool), Failure>;
    fn describe(&self) -> String;
}

struct ErasedNode<T> {
    inner: Arc<dyn Parser<T>>,
}

impl<T: 'static> ErasedParser for ErasedNode<T> {
    fn parse_erased(&self, ctx: &mut ParseContext, index: usize) -> Result<(Box<dyn Any>, usize, bool), Failure> {
        self.inner
            .parse_rec(ctx, index)
            .map(|s| (Box::new(s.value) as Box<dyn Any>, s.index, s.cut))
    }

    fn describe(&self) -> String {
        self.inner.to_string()
    }
}

/// One link in a flattened sequence: a child parser, whether crossing it
/// promises a cut on any later failure in the same `Flat`, and the
/// erased combine function folding the running accumulator with this
/// link's value.
#[derive(Clone)]
struct Chain {
    node: Arc<dyn ErasedParser>,
    cut: bool,
    combine: Arc<dyn Fn(Box<dyn Any>, Box<dyn Any>) -> Box<dyn Any> + Send + Sync>,
}

/// A flattened left-spine of sequence links: a head parser plus an ordered
/// vector of [`Chain`]s, executed iteratively instead of through nested
/// recursive `Sequence` wrappers.
pub struct Flat<T> {
    head: Arc<dyn ErasedParser>,
    links: Vec<Chain>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Display for Flat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.head.describe())?;
        for link in &self.links {
            let op = if link.cut { "~!" } else { "~" };
            write!(f, " {op} {}", link.node.describe())?;
        }
        write!(f, ")")
    }
}

impl<T: 'static> Parser<T> for Flat<T> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<T> {
        let (mut acc, mut idx, mut cut_acc) = match self.head.parse_erased(ctx, index) {
            Ok(t) => t,
            Err(f) => return Err(f),
        };

        for link in &self.links {
            match link.node.parse_erased(ctx, idx) {
                Err(f) => {
                    let forced = link.cut || cut_acc;
                    let cut = f.cut || forced;
                    let f = Failure { cut, ..f };
                    return Err(if ctx.is_tracing() && forced {
                        f.with_frame(idx, self.to_string())
                    } else {
                        f
                    });
                }
                Ok((value, next_idx, link_cut)) => {
                    acc = (link.combine)(acc, value);
                    idx = next_idx;
                    cut_acc = cut_acc || link_cut || link.cut;
                }
            }
        }

        let value = *acc
            .downcast::<T>()
            .expect("Flat accumulator type mismatch: construction-time invariant violated");
        Ok(Success {
            value,
            index: idx,
            cut: cut_acc,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// `Flat`'s links erase their element type to `Box<dyn Any>` once flattened
// (see `ErasedNode`/`Chain` above), which loses exactly the per-child type
// information `MapChildren::map_children` would need to hand each child to
// a `Walker` and splice a rewritten one back in at its original slot. A
// rewrite that needs to reach inside a `Flat` has to run before the
// sequence is built (on the original `p1`/`p2` operands passed to `then`);
// see DESIGN.md under "Flat and the walker" for the tradeoff. `map_children`
// here is therefore the identity, matching how the other fully-opaque nodes
// ([`crate::trie::StringIn`]) treat it.
impl<T: 'static> MapChildren<T> for Flat<T> {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<T>> {
        self
    }
}

fn build<A, B, R, S>(p1: Arc<dyn Parser<A>>, p2: Arc<dyn Parser<B>>, cut: bool, sequencer: S) -> Arc<dyn Parser<R>>
where
    A: 'static,
    B: 'static,
    R: 'static,
    S: Sequencer<A, B, R> + 'static,
{
    let sequencer = Arc::new(sequencer);
    let combine: Arc<dyn Fn(Box<dyn Any>, Box<dyn Any>) -> Box<dyn Any> + Send + Sync> = {
        let sequencer = sequencer.clone();
        Arc::new(move |acc: Box<dyn Any>, val: Box<dyn Any>| -> Box<dyn Any> {
            let a = *acc
                .downcast::<A>()
                .expect("Flat link type mismatch: construction-time invariant violated");
            let b = *val
                .downcast::<B>()
                .expect("Flat link type mismatch: construction-time invariant violated");
            Box::new(sequencer.combine(a, b))
        })
    };
    let new_link = Chain {
        node: Arc::new(ErasedNode { inner: p2 }),
        cut,
        combine,
    };

    if let Some(flat) = p1.as_any().downcast_ref::<Flat<A>>() {
        let mut links = flat.links.clone();
        links.push(new_link);
        Arc::new(Flat {
            head: flat.head.clone(),
            links,
            _marker: PhantomData,
        })
    } else {
        Arc::new(Flat {
            head: Arc::new(ErasedNode { inner: p1 }),
            links: vec![new_link],
            _marker: PhantomData,
        })
    }
}

/// `p1 ~ p2` — plain (non-cutting) sequence.
pub fn then<A, B, R, S>(p1: Arc<dyn Parser<A>>, p2: Arc<dyn Parser<B>>, sequencer: S) -> Arc<dyn Parser<R>>
where
    A: 'static,
    B: 'static,
    R: 'static,
    S: Sequencer<A, B, R> + 'static,
{
    build(p1, p2, false, sequencer)
}

/// `p1 ~! p2` — cutting sequence: once `p1` succeeds, a later failure
/// (here or later in the same flattened chain) is marked `cut`, forbidding
/// an enclosing `Either`/`Repeat` from backtracking past it.
pub fn then_cut<A, B, R, S>(p1: Arc<dyn Parser<A>>, p2: Arc<dyn Parser<B>>, sequencer: S) -> Arc<dyn Parser<R>>
where
    A: 'static,
    B: 'static,
    R: 'static,
    S: Sequencer<A, B, R> + 'static,
{
    build(p1, p2, true, sequencer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{KeepLeft, KeepRight, Tuple};
    use crate::atomic::{CharLiteral, Literal};
    use crate::parser::ParserExt;

    #[test]
    fn plain_sequence_tuples_both_values() {
        let p = then(
            Arc::new(CharLiteral::new('a')) as Arc<dyn Parser<char>>,
            Arc::new(CharLiteral::new('b')) as Arc<dyn Parser<char>>,
            Tuple,
        );
        let ok = p.parse("ab", 0, false).unwrap();
        assert_eq!(ok.value, ('a', 'b'));
        assert_eq!(ok.index, 2);
    }

    #[test]
    fn flattening_collapses_a_left_spine_into_one_node() {
        let abc = then(
            then(
                Arc::new(CharLiteral::new('a')) as Arc<dyn Parser<char>>,
                Arc::new(CharLiteral::new('b')) as Arc<dyn Parser<char>>,
                KeepLeft,
            ),
            Arc::new(CharLiteral::new('c')) as Arc<dyn Parser<char>>,
            KeepLeft,
        );
        assert!(abc.as_any().downcast_ref::<Flat<char>>().is_some());
        let ok = abc.parse("abc", 0, false).unwrap();
        assert_eq!(ok.value, 'a');
        assert_eq!(ok.index, 3);
    }

    #[test]
    fn cut_link_failure_sets_cut_and_blocks_backtracking() {
        // "foo" ~! "bar" ; input "fooX" should fail with cut=true.
        let p = then_cut(
            Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
            Arc::new(Literal::new("bar")) as Arc<dyn Parser<()>>,
            KeepRight,
        );
        let err = p.parse("fooX", 0, false).unwrap_err();
        assert!(err.cut);
        assert_eq!(err.index, 3);
    }

    #[test]
    fn non_cut_failure_after_success_keeps_cut_false() {
        let p = then(
            Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
            Arc::new(Literal::new("bar")) as Arc<dyn Parser<()>>,
            KeepRight,
        );
        let err = p.parse("fooX", 0, false).unwrap_err();
        assert!(!err.cut);
    }
}
