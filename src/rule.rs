//! Named, lazily-bound recursion: `spec.md` §4.3.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use crate::context::ParseContext;
use crate::result::PResult;
use crate::walker::{MapChildren, Walker};
use crate::Parser;

type Thunk<T> = Box<dyn FnOnce() -> Arc<dyn Parser<T>> + Send>;

/// A named parser node whose body is supplied lazily, after construction.
///
/// Grammars are built bottom-up from leaves, but a recursive grammar needs
/// a node that can refer to itself (or to a sibling not yet built) before
/// its body exists. `Rule` solves this the way the design notes describe:
/// a lazily-initialized, once-only cell holding the produced parser, paired
/// with a handle ([`Rule::forward`]) that can be cloned into closures
/// *before* [`Rule::bind`] ever runs.
///
/// ```ignore
/// let expr = Rule::forward("expr");
/// expr.bind({
///     let expr: Arc<dyn Parser<i64>> = expr.clone() as Arc<dyn Parser<i64>>;
///     move || build_expr_grammar(expr)
/// });
/// ```
pub struct Rule<T> {
    name: String,
    body: OnceLock<Arc<dyn Parser<T>>>,
    thunk: Mutex<Option<Thunk<T>>>,
}

impl<T: 'static> Rule<T> {
    /// Builds a rule whose body is produced immediately by `thunk` on
    /// first use (the common, non-recursive case).
    pub fn new(name: impl Into<String>, thunk: impl FnOnce() -> Arc<dyn Parser<T>> + Send + 'static) -> Arc<Self> {
        let rule = Self::forward(name);
        rule.bind(thunk);
        rule
    }

    /// Builds an unbound rule handle. Usable as `Arc<dyn Parser<T>>`
    /// immediately (it just fails to resolve until [`Rule::bind`] is
    /// called before the first `parse_rec`), which is what lets a
    /// recursive grammar capture a reference to itself while it's still
    /// being built.
    pub fn forward(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Rule {
            name: name.into(),
            body: OnceLock::new(),
            thunk: Mutex::new(None),
        })
    }

    /// Installs the lazy body. Must be called at most once, and before the
    /// first `parse_rec` on this rule or any grammar that embeds it;
    /// calling it twice, or never before first use, is a grammar
    /// construction bug the engine surfaces by panicking with the rule's
    /// name rather than silently misparsing.
    pub fn bind(&self, thunk: impl FnOnce() -> Arc<dyn Parser<T>> + Send + 'static) {
        let mut slot = self.thunk.lock().unwrap();
        assert!(
            slot.is_none() && self.body.get().is_none(),
            "rule {:?} was bound more than once",
            self.name
        );
        *slot = Some(Box::new(thunk));
    }

    fn body(&self) -> &Arc<dyn Parser<T>> {
        self.body.get_or_init(|| {
            let thunk = self
                .thunk
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| panic!("rule {:?} was used before its body was bound", self.name));
            thunk()
        })
    }

    /// The rule's name, as rendered in trace frames.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> fmt::Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<T: 'static> Parser<T> for Rule<T> {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<T> {
        match self.body().parse_rec(ctx, index) {
            Ok(success) => Ok(success),
            Err(failure) => {
                if ctx.is_tracing() {
                    Err(failure.with_frame(index, self.name.clone()))
                } else {
                    Err(failure)
                }
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: 'static> MapChildren<T> for Rule<T> {
    fn map_children<W: Walker>(self: Arc<Self>, walker: &W) -> Arc<dyn Parser<T>> {
        // Forces the lazy body to resolve now rather than deferring the
        // rewrite, since the `Walker` reference can't be carried into a
        // `'static` thunk.
        let rewritten = walker.visit(self.body().clone());
        Rule::new(self.name.clone(), move || rewritten)
    }
}

/// Free-function constructor mirroring the spec's `rule(name){ body }`
/// surface for the non-recursive case.
pub fn rule<T: 'static>(
    name: impl Into<String>,
    thunk: impl FnOnce() -> Arc<dyn Parser<T>> + Send + 'static,
) -> Arc<Rule<T>> {
    Rule::new(name, thunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::{char_literal, Literal};
    use crate::combinator::{then, then_cut};
    use crate::parser::ParserExt;

    #[test]
    fn non_recursive_rule_appends_a_frame_when_tracing() {
        let digit = rule("digit", || char_literal('1'));
        assert!(digit.parse("1", 0, false).is_ok());

        let err = digit.parse("x", 0, true).unwrap_err();
        assert_eq!(err.full_stack.len(), 1);
        assert_eq!(err.full_stack[0].description, "digit");
    }

    #[test]
    fn recursive_rule_parses_nested_expressions() {
        // num ~ ("+" ~ expr).?
        let num = Arc::new(crate::atomic::CharsWhile::new(
            |c: char| c.is_ascii_digit(),
            1,
            "digit",
        ));
        let expr: Arc<Rule<String>> = Rule::forward("expr");
        {
            let expr_ref: Arc<dyn Parser<String>> = expr.clone();
            let num = num.clone();
            expr.bind(move || {
                let plus_expr = then_cut(
                    Arc::new(Literal::new("+")) as Arc<dyn Parser<()>>,
                    expr_ref.clone(),
                    crate::aggregate::KeepRight,
                )
                .opt();
                then(
                    num.clone() as Arc<dyn Parser<String>>,
                    plus_expr,
                    |n: String, rest: Option<String>| match rest {
                        Some(r) => format!("{n}+{r}"),
                        None => n,
                    },
                )
            });
        }

        let expr: Arc<dyn Parser<String>> = expr;
        let ok = expr.parse("1+2+3", 0, false).unwrap();
        assert_eq!(ok.index, 5);
        assert_eq!(ok.value, "1+2+3");
    }

    #[test]
    fn map_children_rewrites_the_resolved_body() {
        use crate::walker::Identity;

        let digit = rule("digit", || char_literal('1'));
        let rewritten = digit.map_children(&Identity);
        assert_eq!(rewritten.parse("1", 0, false).unwrap().index, 1);
    }
}
