//! The `Success`/`Failure` result protocol every parser node returns.

/// The outcome of a successful parse step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<T> {
    /// The value produced by the parser.
    pub value: T,
    /// The position immediately after the consumed span.
    pub index: usize,
    /// Whether a [`crate::combinator::cut`] was crossed on this path.
    ///
    /// `cut` is the disjunction of every cut flag observed while producing
    /// this success; once `true` it stays `true` through every combinator
    /// that wraps this result.
    pub cut: bool,
}

impl<T> Success<T> {
    /// Builds a plain, cut-free success.
    pub fn new(value: T, index: usize) -> Self {
        Success {
            value,
            index,
            cut: false,
        }
    }

    /// Replaces the value, keeping `index` and `cut`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Success<U> {
        Success {
            value: f(self.value),
            index: self.index,
            cut: self.cut,
        }
    }
}

/// One entry in a [`Failure`]'s trace stack: the grammar position and a
/// rendering of the node that contributed this frame (a named [`crate::Rule`]
/// or a [`crate::combinator::cut`]ting `Sequence` link).
///
/// The frame stores a pre-rendered description rather than a live reference
/// to the node, sidestepping the need to type-erase heterogeneous parser
/// nodes just to keep a `Display` handle around; see `DESIGN.md` under
/// "Frame rendering".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The input position this frame was recorded at.
    pub index: usize,
    /// A human-readable rendering of the grammar node.
    pub description: String,
}

/// The outcome of a failed parse step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// The deepest position reached before failing.
    pub index: usize,
    /// A rendering of the deepest node that failed.
    pub parser: String,
    /// Accumulated trace frames, populated only when tracing is enabled.
    pub full_stack: Vec<Frame>,
    /// Whether backtracking past this failure is forbidden.
    ///
    /// A `cut` failure cannot be caught by the nearest enclosing
    /// [`crate::combinator::Either`] or [`crate::combinator::Repeat`]; it
    /// must propagate all the way up.
    pub cut: bool,
}

impl Failure {
    /// Builds a fresh, untraced, cut-free failure at `index` for `parser`.
    pub fn new(index: usize, parser: impl Into<String>) -> Self {
        Failure {
            index,
            parser: parser.into(),
            full_stack: Vec::new(),
            cut: false,
        }
    }

    /// Builds a failure with the `cut` flag set.
    pub fn cut(mut self) -> Self {
        self.cut = true;
        self
    }

    /// Prepends a trace frame recorded by an enclosing [`crate::Rule`] or a
    /// cutting `Sequence` link, the way `Rule::parse_rec` does on its way
    /// back out of a failed body.
    pub fn with_frame(mut self, index: usize, description: impl Into<String>) -> Self {
        self.full_stack.push(Frame {
            index,
            description: description.into(),
        });
        self
    }
}

/// The uniform return type of every parser node's `parse_rec`.
pub type PResult<T> = Result<Success<T>, Failure>;
