//! Bounded repetition with an optional delimiter: `spec.md` §4.6.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::aggregate::{CollectVec, Repeater};
use crate::atomic::Pass;
use crate::context::ParseContext;
use crate::result::{Failure, PResult, Success};
use crate::walker::{MapChildren, Walker};
use crate::Parser;

/// `Repeat(p, min, delimiter, repeater)` — PEG-style greedy repetition.
///
/// The first iteration runs with no delimiter (internally, `Pass`); every
/// subsequent iteration requires the delimiter to match before attempting
/// `p` again. The loop stops on the first non-cut failure of either the
/// delimiter or the element, at which point it succeeds iff at least `min`
/// elements were matched, with the final index positioned *before* the
/// failing delimiter/element attempt — never committing to input the
/// failed attempt would have consumed.
pub struct Repeat<T, R, X> {
    inner: Arc<dyn Parser<T>>,
    min: usize,
    delimiter: Option<Arc<dyn Parser<()>>>,
    repeater: X,
    _marker: std::marker::PhantomData<fn(T) -> R>,
}

impl<T, R, X> fmt::Display for Repeat<T, R, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.delimiter {
            Some(d) => write!(f, "{}.rep(min={}, delim={})", self.inner, self.min, d),
            None => write!(f, "{}.rep(min={})", self.inner, self.min),
        }
    }
}

impl<T, R, X> Parser<R> for Repeat<T, R, X>
where
    T: 'static,
    R: 'static,
    X: Repeater<T, R> + 'static,
{
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<R> {
        let mut acc = self.repeater.initial();
        let mut idx = index;
        let mut cut_acc = false;
        let mut count = 0usize;
        let mut last_failure: Option<Failure> = None;
        let mut first_iteration = true;

        loop {
            let del_result = if first_iteration {
                Ok(Success::new((), idx))
            } else {
                self.delimiter
                    .as_ref()
                    .expect("delimiter present after the first iteration")
                    .parse_rec(ctx, idx)
            };

            let after_delim = match del_result {
                Err(f) => {
                    if f.cut {
                        return Err(f);
                    }
                    last_failure = Some(f);
                    return finish(count, self.min, idx, cut_acc, self.repeater.result(acc), last_failure);
                }
                Ok(s) => s,
            };

            match self.inner.parse_rec(ctx, after_delim.index) {
                Err(f) => {
                    if f.cut || after_delim.cut {
                        return Err(Failure {
                            index: after_delim.index,
                            cut: true,
                            ..f
                        });
                    }
                    last_failure = Some(f);
                    return finish(
                        count,
                        self.min,
                        idx,
                        cut_acc | after_delim.cut,
                        self.repeater.result(acc),
                        last_failure,
                    );
                }
                Ok(s) => {
                    self.repeater.accumulate(s.value, &mut acc);
                    idx = s.index;
                    cut_acc = cut_acc || after_delim.cut || s.cut;
                    count += 1;
                    first_iteration = false;
                }
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn finish<R>(count: usize, min: usize, idx: usize, cut: bool, result: R, last_failure: Option<Failure>) -> PResult<R> {
    if count >= min {
        Ok(Success {
            value: result,
            index: idx,
            cut,
        })
    } else {
        let mut f = last_failure.expect("a non-cut failure always precedes reaching the min check");
        f.cut = cut;
        Err(f)
    }
}

/// `p.rep(min, delim)` over an explicit [`Repeater`].
pub fn repeat<T, R, X>(inner: Arc<dyn Parser<T>>, min: usize, delimiter: Option<Arc<dyn Parser<()>>>, repeater: X) -> Arc<dyn Parser<R>>
where
    T: 'static,
    R: 'static,
    X: Repeater<T, R> + 'static,
{
    Arc::new(Repeat {
        inner,
        min,
        delimiter,
        repeater,
        _marker: std::marker::PhantomData,
    })
}

/// `p.rep(min)` with no delimiter, collecting into a `Vec<T>`.
pub fn repeat_vec<T: 'static>(inner: Arc<dyn Parser<T>>, min: usize) -> Arc<dyn Parser<Vec<T>>> {
    repeat(inner, min, None, CollectVec)
}

/// `p.rep(min, delim)` with a delimiter, collecting into a `Vec<T>`.
pub fn repeat_vec_sep<T: 'static>(inner: Arc<dyn Parser<T>>, min: usize, delimiter: Arc<dyn Parser<()>>) -> Arc<dyn Parser<Vec<T>>> {
    repeat(inner, min, Some(delimiter), CollectVec)
}

/// Always-succeeding helper used internally when no delimiter was given;
/// exposed so callers building custom `Repeat`s can reuse it too.
pub fn no_delimiter() -> Arc<dyn Parser<()>> {
    Arc::new(Pass)
}

impl<T, R, X> MapChildren<R> for Repeat<T, R, X>
where
    T: 'static,
    R: 'static,
    X: Repeater<T, R> + Clone + 'static,
{
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<R>> {
        Arc::new(Repeat {
            inner: walker.visit(self.inner.clone()),
            min: self.min,
            delimiter: self.delimiter.as_ref().map(|d| walker.visit(d.clone())),
            repeater: self.repeater.clone(),
            _marker: std::marker::PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::{CharIn, Literal};
    use crate::parser::ParserExt;

    #[test]
    fn min_zero_always_succeeds_and_is_monotonic() {
        let p = repeat_vec(Arc::new(CharIn::chars(['a'])), 0);
        let ok1 = p.parse("", 0, false).unwrap();
        assert_eq!(ok1.index, 0);
        let ok2 = p.parse("aaa", 0, false).unwrap();
        assert_eq!(ok2.index, 3);
        assert_eq!(ok2.value.len(), 3);
    }

    #[test]
    fn min_not_met_fails() {
        let p = repeat_vec(Arc::new(CharIn::chars(['a', 'b'])), 2);
        assert!(p.parse("a", 0, false).is_err());
    }

    #[test]
    fn delimiter_runs_between_elements_not_before_the_first() {
        // Repeat(CharIn("ab"), 2, Literal(",")); "a,b,a" -> Success(index=5).
        let p = repeat_vec_sep(
            Arc::new(CharIn::chars(['a', 'b'])),
            2,
            Arc::new(Literal::new(",")),
        );
        let ok = p.parse("a,b,a", 0, false).unwrap();
        assert_eq!(ok.index, 5);
        assert_eq!(ok.value, vec!['a', 'b', 'a']);
    }

    #[test]
    fn stops_before_a_trailing_delimiter_with_no_following_element() {
        let p = repeat_vec_sep(
            Arc::new(CharIn::chars(['a', 'b'])),
            1,
            Arc::new(Literal::new(",")),
        );
        let ok = p.parse("a,b,", 0, false).unwrap();
        assert_eq!(ok.index, 3);
        assert_eq!(ok.value, vec!['a', 'b']);
    }

    #[test]
    fn map_children_rewrites_inner_and_delimiter() {
        use crate::walker::Identity;

        let node = Arc::new(Repeat {
            inner: Arc::new(CharIn::chars(['a', 'b'])) as Arc<dyn Parser<char>>,
            min: 1,
            delimiter: Some(Arc::new(Literal::new(",")) as Arc<dyn Parser<()>>),
            repeater: CollectVec,
            _marker: std::marker::PhantomData,
        });
        let rewritten = node.map_children(&Identity);
        let ok = rewritten.parse("a,b", 0, false).unwrap();
        assert_eq!(ok.value, vec!['a', 'b']);
    }
}
