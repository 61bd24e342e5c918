//! Ordered choice: `spec.md` §4.5.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ParseContext;
use crate::result::{Failure, PResult};
use crate::walker::{MapChildren, Walker};
use crate::Parser;

/// `p1 | p2 | ... | pn` — tries alternatives left to right, first success
/// wins. An alternative failing with `cut=true` aborts the whole choice
/// immediately (no further alternatives are tried) and propagates that
/// failure. If every alternative fails without cutting, `Either` fails at
/// the *original* index (not the deepest one reached) with its own
/// description, discarding the individual alternatives' failures — callers
/// who want the deepest sub-failure should read it off a traced
/// [`crate::result::Frame`] stack instead.
///
/// Nested `Either`s are flattened at construction (see [`either`]), so an
/// `Either` built through repeated `.or(..)` calls is always one flat
/// alternative list, never a tree of two-armed choices.
pub struct Either<T> {
    alternatives: Vec<Arc<dyn Parser<T>>>,
}

impl<T> fmt::Display for Either<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, alt) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{alt}")?;
        }
        write!(f, ")")
    }
}

impl<T: 'static> Parser<T> for Either<T> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<T> {
        for alt in &self.alternatives {
            match alt.parse_rec(ctx, index) {
                Ok(s) => return Ok(s),
                Err(f) if f.cut => return Err(f),
                Err(_) => continue,
            }
        }
        Err(Failure::new(index, self.to_string()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `p1 | p2` constructor. Flattens: if either operand is itself an
/// `Either<T>`, its alternatives are spliced in rather than nested,
/// preserving left-to-right order.
pub fn either<T: 'static>(p1: Arc<dyn Parser<T>>, p2: Arc<dyn Parser<T>>) -> Arc<dyn Parser<T>> {
    let mut alternatives = Vec::new();
    flatten_into(&p1, &mut alternatives);
    flatten_into(&p2, &mut alternatives);
    Arc::new(Either { alternatives })
}

/// `p1 | p2 | ... | pn` over an arbitrary number of alternatives, in order.
pub fn choice<T: 'static>(alts: impl IntoIterator<Item = Arc<dyn Parser<T>>>) -> Arc<dyn Parser<T>> {
    let mut alternatives = Vec::new();
    for alt in alts {
        flatten_into(&alt, &mut alternatives);
    }
    Arc::new(Either { alternatives })
}

fn flatten_into<T: 'static>(p: &Arc<dyn Parser<T>>, out: &mut Vec<Arc<dyn Parser<T>>>) {
    if let Some(nested) = p.as_any().downcast_ref::<Either<T>>() {
        out.extend(nested.alternatives.iter().cloned());
    } else {
        out.push(p.clone());
    }
}

impl<T: 'static> MapChildren<T> for Either<T> {
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<T>> {
        choice(self.alternatives.iter().map(|alt| walker.visit(alt.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::Literal;
    use crate::combinator::then_cut;
    use crate::aggregate::KeepRight;
    use crate::parser::ParserExt;

    #[test]
    fn first_success_wins() {
        let p = either(
            Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
            Arc::new(Literal::new("foobar")) as Arc<dyn Parser<()>>,
        );
        let ok = p.parse("foobar", 0, false).unwrap();
        assert_eq!(ok.index, 3);
    }

    #[test]
    fn falls_through_to_later_alternative_on_plain_failure() {
        let p = either(
            Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
            Arc::new(Literal::new("baz")) as Arc<dyn Parser<()>>,
        );
        assert_eq!(p.parse("baz", 0, false).unwrap().index, 3);
    }

    #[test]
    fn cut_in_left_arm_blocks_the_right_arm() {
        // ("foo" ~! "bar") | "baz", input "foobaX" must not fall through to "baz".
        let left = then_cut(
            Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
            Arc::new(Literal::new("bar")) as Arc<dyn Parser<()>>,
            KeepRight,
        );
        let p = either(left, Arc::new(Literal::new("baz")) as Arc<dyn Parser<()>>);
        let err = p.parse("foobaX", 0, false).unwrap_err();
        assert!(err.cut);
        assert_eq!(err.index, 3);
    }

    #[test]
    fn failure_at_original_index_when_no_alternative_cuts() {
        let p = choice([
            Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
            Arc::new(Literal::new("bar")) as Arc<dyn Parser<()>>,
        ]);
        let err = p.parse("xyz", 0, false).unwrap_err();
        assert_eq!(err.index, 0);
    }

    #[test]
    fn nested_eithers_flatten_to_one_alternative_list() {
        let a = Arc::new(Literal::new("a")) as Arc<dyn Parser<()>>;
        let b = Arc::new(Literal::new("b")) as Arc<dyn Parser<()>>;
        let c = Arc::new(Literal::new("c")) as Arc<dyn Parser<()>>;
        let ab = either(a, b);
        let abc = either(ab, c);
        let flat = abc.as_any().downcast_ref::<Either<()>>().unwrap();
        assert_eq!(flat.alternatives.len(), 3);
    }

    #[test]
    fn map_children_rewrites_every_alternative() {
        use crate::walker::Identity;

        let node = Arc::new(Either {
            alternatives: vec![
                Arc::new(Literal::new("a")) as Arc<dyn Parser<()>>,
                Arc::new(Literal::new("b")) as Arc<dyn Parser<()>>,
            ],
        });
        let rewritten = node.map_children(&Identity);
        assert_eq!(rewritten.parse("b", 0, false).unwrap().index, 1);
    }
}
