//! Leaf parsers: `spec.md` §4.1.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::ParseContext;
use crate::predicate::{CharBitset, CharPredicate};
use crate::result::{Failure, PResult, Success};
use crate::walker::{MapChildren, Walker};
use crate::Parser;

/// Succeeds at `index` consuming nothing.
pub struct Pass;

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pass")
    }
}

impl Parser<()> for Pass {
    fn parse_rec(&self, _ctx: &mut ParseContext, index: usize) -> PResult<()> {
        Ok(Success::new((), index))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Always fails at `index`, `cut = false`.
pub struct Fail<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Fail<T> {
    /// Builds a `Fail` node producing values of type `T` (never actually
    /// produced, since this parser never succeeds).
    pub fn new() -> Self {
        Fail {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Fail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Fail<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fail")
    }
}

impl<T: 'static> Parser<T> for Fail<T> {
    fn parse_rec(&self, _ctx: &mut ParseContext, index: usize) -> PResult<T> {
        Err(Failure::new(index, self.to_string()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Consumes exactly one code unit, succeeding unless at end of input.
pub struct AnyChar;

impl fmt::Display for AnyChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyChar")
    }
}

impl Parser<char> for AnyChar {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<char> {
        match ctx.input()[index..].chars().next() {
            Some(c) => Ok(Success::new(c, index + c.len_utf8())),
            None => Err(Failure::new(index, self.to_string())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Succeeds with zero consumption iff `index == 0`.
pub struct Start;

impl fmt::Display for Start {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Start")
    }
}

impl Parser<()> for Start {
    fn parse_rec(&self, _ctx: &mut ParseContext, index: usize) -> PResult<()> {
        if index == 0 {
            Ok(Success::new((), index))
        } else {
            Err(Failure::new(index, self.to_string()))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Succeeds with zero consumption iff `index == input.len()`.
pub struct End;

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "End")
    }
}

impl Parser<()> for End {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<()> {
        if index == ctx.len() {
            Ok(Success::new((), index))
        } else {
            Err(Failure::new(index, self.to_string()))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matches a single, specific `char`.
pub struct CharLiteral {
    c: char,
}

impl CharLiteral {
    /// Builds a parser matching exactly `c`.
    pub fn new(c: char) -> Self {
        CharLiteral { c }
    }
}

impl fmt::Display for CharLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharLiteral({:?})", self.c)
    }
}

impl Parser<char> for CharLiteral {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<char> {
        match ctx.input()[index..].chars().next() {
            Some(c) if c == self.c => Ok(Success::new(c, index + c.len_utf8())),
            _ => Err(Failure::new(index, self.to_string())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matches a fixed literal string by code-unit equality.
pub struct Literal {
    text: String,
}

impl Literal {
    /// Builds a parser matching the literal `text` exactly.
    pub fn new(text: impl Into<String>) -> Self {
        Literal { text: text.into() }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Literal({:?})", self.text)
    }
}

impl Parser<()> for Literal {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<()> {
        let end = index + self.text.len();
        // Byte-slice comparison rather than `&ctx.input()[index..end]`: the
        // latter panics if `end` doesn't land on a char boundary, which a
        // multi-byte char straddling the match window hits in valid input.
        if end <= ctx.len() && ctx.input().as_bytes()[index..end] == *self.text.as_bytes() {
            Ok(Success::new((), end))
        } else {
            Err(Failure::new(index, self.to_string()))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matches one code unit satisfying an arbitrary predicate, compiled into a
/// [`CharBitset`] at construction time.
pub struct CharPred {
    bitset: CharBitset,
    label: String,
}

impl CharPred {
    /// Builds a predicate parser. `label` is used purely for trace
    /// rendering (the predicate function itself has no useful `Display`).
    pub fn new(predicate: impl CharPredicate + 'static, label: impl Into<String>) -> Self {
        CharPred {
            bitset: CharBitset::compile(predicate),
            label: label.into(),
        }
    }
}

impl fmt::Display for CharPred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharPred({})", self.label)
    }
}

impl Parser<char> for CharPred {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<char> {
        match ctx.input()[index..].chars().next() {
            Some(c) if self.bitset.test(c) => Ok(Success::new(c, index + c.len_utf8())),
            _ => Err(Failure::new(index, self.to_string())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matches one code unit that falls in any of a set of inclusive ranges
/// (`CharIn('a'..='z', '0'..='9')`-style), compiled into a [`CharBitset`].
pub struct CharIn {
    bitset: CharBitset,
    ranges: Vec<(char, char)>,
}

impl CharIn {
    /// Builds a parser matching any code unit within one of `ranges`
    /// (each `(low, high)` inclusive).
    pub fn new(ranges: Vec<(char, char)>) -> Self {
        CharIn {
            bitset: CharBitset::from_ranges(&ranges),
            ranges,
        }
    }

    /// Convenience constructor over individual characters rather than
    /// ranges.
    pub fn chars(chars: impl IntoIterator<Item = char>) -> Self {
        Self::new(chars.into_iter().map(|c| (c, c)).collect())
    }
}

impl fmt::Display for CharIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharIn(")?;
        for (i, (lo, hi)) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if lo == hi {
                write!(f, "{:?}", lo)?;
            } else {
                write!(f, "{:?}..={:?}", lo, hi)?;
            }
        }
        write!(f, ")")
    }
}

impl Parser<char> for CharIn {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<char> {
        match ctx.input()[index..].chars().next() {
            Some(c) if self.bitset.test(c) => Ok(Success::new(c, index + c.len_utf8())),
            _ => Err(Failure::new(index, self.to_string())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Greedily consumes code units satisfying a predicate, succeeding iff at
/// least `min` were consumed.
pub struct CharsWhile {
    bitset: CharBitset,
    min: usize,
    label: String,
}

impl CharsWhile {
    /// Builds a parser requiring at least `min` matching code units.
    pub fn new(predicate: impl CharPredicate + 'static, min: usize, label: impl Into<String>) -> Self {
        CharsWhile {
            bitset: CharBitset::compile(predicate),
            min,
            label: label.into(),
        }
    }
}

impl fmt::Display for CharsWhile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharsWhile({}, min={})", self.label, self.min)
    }
}

impl Parser<String> for CharsWhile {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<String> {
        let mut end = index;
        for c in ctx.input()[index..].chars() {
            if !self.bitset.test(c) {
                break;
            }
            end += c.len_utf8();
        }
        let consumed = ctx.input()[index..end].chars().count();
        if consumed >= self.min {
            Ok(Success::new(ctx.input()[index..end].to_string(), end))
        } else {
            Err(Failure::new(index, self.to_string()))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn char_literal(c: char) -> Arc<dyn Parser<char>> {
    Arc::new(CharLiteral::new(c))
}

// Atomic parsers are leaves: they carry no children, so `map_children` is
// the identity for every one of them.

impl MapChildren<()> for Pass {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<()>> {
        self
    }
}

impl<T: 'static> MapChildren<T> for Fail<T> {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<T>> {
        self
    }
}

impl MapChildren<char> for AnyChar {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<char>> {
        self
    }
}

impl MapChildren<()> for Start {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<()>> {
        self
    }
}

impl MapChildren<()> for End {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<()>> {
        self
    }
}

impl MapChildren<char> for CharLiteral {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<char>> {
        self
    }
}

impl MapChildren<()> for Literal {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<()>> {
        self
    }
}

impl MapChildren<char> for CharPred {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<char>> {
        self
    }
}

impl MapChildren<char> for CharIn {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<char>> {
        self
    }
}

impl MapChildren<String> for CharsWhile {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<String>> {
        self
    }
}
