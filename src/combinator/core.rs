//! Unary combinators: `spec.md` §4.2.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ParseContext;
use crate::log::{fit_to_terminal, LogSink, NullSink};
use crate::result::{PResult, Success};
use crate::walker::{MapChildren, Walker};
use crate::Parser;
use crate::aggregate::{Optioner, WrapOption};

/// `p.!` — replaces `p`'s value with the substring it consumed.
pub struct Capturing<T> {
    inner: Arc<dyn Parser<T>>,
}

impl<T> fmt::Display for Capturing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.!", self.inner)
    }
}

impl<T: 'static> Parser<String> for Capturing<T> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<String> {
        let s = self.inner.parse_rec(ctx, index)?;
        Ok(Success {
            value: ctx.input()[index..s.index].to_string(),
            index: s.index,
            cut: s.cut,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `p.!` constructor.
pub fn capturing<T: 'static>(inner: Arc<dyn Parser<T>>) -> Arc<dyn Parser<String>> {
    Arc::new(Capturing { inner })
}

impl<T: 'static> MapChildren<String> for Capturing<T> {
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<String>> {
        capturing(walker.visit(self.inner.clone()))
    }
}

/// `p.map(f)` — pure value transformation on success, trace-preserving
/// propagation on failure.
pub struct Mapper<T, U> {
    inner: Arc<dyn Parser<T>>,
    f: Arc<dyn Fn(T) -> U + Send + Sync>,
}

impl<T, U> fmt::Display for Mapper<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.map(..)", self.inner)
    }
}

impl<T: 'static, U: 'static> Parser<U> for Mapper<T, U> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<U> {
        let s = self.inner.parse_rec(ctx, index)?;
        Ok(s.map(|v| (self.f)(v)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `p.map(f)` constructor.
pub fn mapper<T: 'static, U: 'static>(
    inner: Arc<dyn Parser<T>>,
    f: impl Fn(T) -> U + Send + Sync + 'static,
) -> Arc<dyn Parser<U>> {
    Arc::new(Mapper {
        inner,
        f: Arc::new(f),
    })
}

impl<T: 'static, U: 'static> MapChildren<U> for Mapper<T, U> {
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<U>> {
        let inner = walker.visit(self.inner.clone());
        let f = self.f.clone();
        Arc::new(Mapper { inner, f })
    }
}

/// `p.?` — optional match, parameterized by an [`Optioner`] for how the
/// matched/missing cases wrap into `R`.
pub struct Optional<T, R, O> {
    inner: Arc<dyn Parser<T>>,
    optioner: O,
    _marker: std::marker::PhantomData<fn(T) -> R>,
}

impl<T, R, O> fmt::Display for Optional<T, R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.?", self.inner)
    }
}

impl<T, R, O> Parser<R> for Optional<T, R, O>
where
    T: 'static,
    R: 'static,
    O: Optioner<T, R> + 'static,
{
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<R> {
        match self.inner.parse_rec(ctx, index) {
            Ok(s) => Ok(Success {
                value: self.optioner.some(s.value),
                index: s.index,
                cut: s.cut,
            }),
            Err(f) if f.cut => Err(f),
            Err(_) => Ok(Success::new(self.optioner.none(), index)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `p.?` constructor, wrapping the matched value in `Option<T>`.
pub fn optional<T: 'static>(inner: Arc<dyn Parser<T>>) -> Arc<dyn Parser<Option<T>>> {
    Arc::new(Optional {
        inner,
        optioner: WrapOption,
        _marker: std::marker::PhantomData,
    })
}

impl<T, R, O> MapChildren<R> for Optional<T, R, O>
where
    T: 'static,
    R: 'static,
    O: Optioner<T, R> + Clone + 'static,
{
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<R>> {
        Arc::new(Optional {
            inner: walker.visit(self.inner.clone()),
            optioner: self.optioner.clone(),
            _marker: std::marker::PhantomData,
        })
    }
}

/// `&p` — zero-width positive lookahead.
pub struct Lookahead<T> {
    inner: Arc<dyn Parser<T>>,
}

impl<T> fmt::Display for Lookahead<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{}", self.inner)
    }
}

impl<T: 'static> Parser<()> for Lookahead<T> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<()> {
        match self.inner.parse_rec(ctx, index) {
            Ok(_) => Ok(Success::new((), index)),
            Err(f) => Err(f),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `&p` constructor.
pub fn lookahead<T: 'static>(inner: Arc<dyn Parser<T>>) -> Arc<dyn Parser<()>> {
    Arc::new(Lookahead { inner })
}

impl<T: 'static> MapChildren<()> for Lookahead<T> {
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<()>> {
        lookahead(walker.visit(self.inner.clone()))
    }
}

/// `!p` — zero-width negative lookahead. Never propagates `cut`: a
/// negation inverts success/failure, so any commitment made *inside* `p`
/// is irrelevant to whatever encloses the `Not`.
pub struct Not<T> {
    inner: Arc<dyn Parser<T>>,
}

impl<T> fmt::Display for Not<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.inner)
    }
}

impl<T: 'static> Parser<()> for Not<T> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<()> {
        match self.inner.parse_rec(ctx, index) {
            Ok(s) => Err(crate::result::Failure::new(s.index, self.to_string())),
            Err(_) => Ok(Success::new((), index)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `!p` constructor.
pub fn not<T: 'static>(inner: Arc<dyn Parser<T>>) -> Arc<dyn Parser<()>> {
    Arc::new(Not { inner })
}

impl<T: 'static> MapChildren<()> for Not<T> {
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<()>> {
        not(walker.visit(self.inner.clone()))
    }
}

/// `Logged(p, msg, sink)` — prints entry/exit lines around `p` without
/// altering its semantics.
pub struct Logged<T> {
    inner: Arc<dyn Parser<T>>,
    msg: String,
    sink: Arc<dyn LogSink>,
}

impl<T> fmt::Display for Logged<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<T: 'static> Parser<T> for Logged<T> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<T> {
        let indent = "  ".repeat(ctx.log_depth());
        self.sink
            .write_line(&fit_to_terminal(&format!("{indent}+{}:{index}", self.msg)));
        let result = ctx.with_deeper_log(|ctx| self.inner.parse_rec(ctx, index));
        let rendered = match &result {
            Ok(s) => format!("Success({}, cut={})", s.index, s.cut),
            Err(f) => format!("Failure({}, cut={})", f.index, f.cut),
        };
        self.sink.write_line(&fit_to_terminal(&format!(
            "{indent}-{}:{index}:{rendered}",
            self.msg
        )));
        result
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `Logged(p, msg, sink)` constructor. Pass [`crate::log::NullSink`]
/// explicitly, or use [`logged_silent`], to build without a live sink.
pub fn logged<T: 'static>(inner: Arc<dyn Parser<T>>, msg: impl Into<String>, sink: Arc<dyn LogSink>) -> Arc<dyn Parser<T>> {
    Arc::new(Logged {
        inner,
        msg: msg.into(),
        sink,
    })
}

/// `Logged(p, msg, NullSink)` — useful to keep a grammar's shape visible
/// while developing without wiring up a sink yet.
pub fn logged_silent<T: 'static>(inner: Arc<dyn Parser<T>>, msg: impl Into<String>) -> Arc<dyn Parser<T>> {
    logged(inner, msg, Arc::new(NullSink))
}

impl<T: 'static> MapChildren<T> for Logged<T> {
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<T>> {
        logged(walker.visit(self.inner.clone()), self.msg.clone(), self.sink.clone())
    }
}
