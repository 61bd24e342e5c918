//! Pluggable aggregation capabilities: `spec.md` §4.9.
//!
//! `Sequencer`, `Repeater`, and `Optioner` are the three places where the
//! engine defers to caller-supplied combination logic instead of baking in
//! one shape. The engine treats all three as opaque: it calls their methods
//! at the right points and never inspects the values flowing through them.

/// Combines a `Sequence`/`Flat` link's two sides into one result.
///
/// The default instance used by `p.then(q)` is [`Tuple`], which just pairs
/// the values; [`KeepLeft`] and [`KeepRight`] are the "drop the unit-typed
/// side" specialization the spec calls out, used when one side of a
/// sequence only exists to consume input (e.g. matching and discarding a
/// delimiter).
pub trait Sequencer<A, B, R>: Send + Sync {
    /// Combines `a` and `b` into the sequence's result value.
    fn combine(&self, a: A, b: B) -> R;
}

impl<A, B, R, F> Sequencer<A, B, R> for F
where
    F: Fn(A, B) -> R + Send + Sync,
{
    fn combine(&self, a: A, b: B) -> R {
        self(a, b)
    }
}

/// Pairs both sides into a tuple. The default `Sequencer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuple;

impl<A, B> Sequencer<A, B, (A, B)> for Tuple {
    fn combine(&self, a: A, b: B) -> (A, B) {
        (a, b)
    }
}

/// Keeps the left side, discarding the right (`p ~ q` where `q`'s value is
/// uninteresting, e.g. a trailing delimiter).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepLeft;

impl<A, B> Sequencer<A, B, A> for KeepLeft {
    fn combine(&self, a: A, _b: B) -> A {
        a
    }
}

/// Keeps the right side, discarding the left.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepRight;

impl<A, B> Sequencer<A, B, B> for KeepRight {
    fn combine(&self, _a: A, b: B) -> B {
        b
    }
}

/// Accumulates a `Repeat`'s per-iteration values into a result.
///
/// `Acc` is a private scratch type owned entirely by one `Repeat`
/// invocation; per the design notes, a fresh `Acc` is allocated every call
/// rather than reused across parses (reuse is what the source's mutable
/// `Repeater` made unsafe).
pub trait Repeater<T, R>: Send + Sync {
    /// The in-progress accumulator type.
    type Acc;

    /// Starts a fresh accumulator for one `Repeat` invocation.
    fn initial(&self) -> Self::Acc;

    /// Folds one more matched element into the accumulator.
    fn accumulate(&self, value: T, acc: &mut Self::Acc);

    /// Finishes the accumulator into the repeat's result value.
    fn result(&self, acc: Self::Acc) -> R;
}

/// Appends every element into a `Vec<T>`. The default `Repeater`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectVec;

impl<T: Send + Sync> Repeater<T, Vec<T>> for CollectVec {
    type Acc = Vec<T>;

    fn initial(&self) -> Vec<T> {
        Vec::new()
    }

    fn accumulate(&self, value: T, acc: &mut Vec<T>) {
        acc.push(value);
    }

    fn result(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

/// Concatenates `String`-valued elements into one `String`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatString;

impl Repeater<String, String> for ConcatString {
    type Acc = String;

    fn initial(&self) -> String {
        String::new()
    }

    fn accumulate(&self, value: String, acc: &mut String) {
        acc.push_str(&value);
    }

    fn result(&self, acc: String) -> String {
        acc
    }
}

/// Wraps a matched value, or supplies a default for a non-match: the
/// capability behind `Optional`.
pub trait Optioner<T, R>: Send + Sync {
    /// Wraps a successful match.
    fn some(&self, value: T) -> R;

    /// The result when the inner parser didn't match (and didn't cut).
    fn none(&self) -> R;
}

/// Wraps in `Option<T>`. The default `Optioner`, used by `p.opt()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrapOption;

impl<T> Optioner<T, Option<T>> for WrapOption {
    fn some(&self, value: T) -> Option<T> {
        Some(value)
    }

    fn none(&self) -> Option<T> {
        None
    }
}
