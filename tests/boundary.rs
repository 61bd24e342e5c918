//! Literal-input boundary scenarios and trace-format fixtures: `spec.md` §8.

use std::sync::Arc;

use sift::aggregate::KeepRight;
use sift::atomic::{CharIn, CharsWhile, Literal};
use sift::parser::{Parser, ParserExt};
use sift::rule::{rule, Rule};
use sift::trie::StringIn;
use sift::{choice, either, repeat_vec_sep, then, then_cut};

#[test]
fn boundary_1_chars_while_digit_stops_at_letters() {
    let num = rule("num", || Arc::new(CharsWhile::new(|c: char| c.is_ascii_digit(), 1, "digit")));
    let ok = num.parse("123abc", 0, false).unwrap();
    assert_eq!(ok.index, 3);
    assert_eq!(ok.value, "123");
}

#[test]
fn boundary_2_cut_sequence_blocks_the_alternative() {
    let foobar = then_cut(
        Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
        Arc::new(Literal::new("bar")) as Arc<dyn Parser<()>>,
        KeepRight,
    );
    let grammar = either(foobar, Arc::new(Literal::new("baz")) as Arc<dyn Parser<()>>);
    let err = grammar.parse("foobaX", 0, false).unwrap_err();
    assert_eq!(err.index, 3);
    assert!(err.cut);
}

#[test]
fn boundary_3_plain_sequence_falls_through_to_the_alternative() {
    let foobar = then(
        Arc::new(Literal::new("foo")) as Arc<dyn Parser<()>>,
        Arc::new(Literal::new("bar")) as Arc<dyn Parser<()>>,
        KeepRight,
    );
    let grammar = either(foobar, Arc::new(Literal::new("baz")) as Arc<dyn Parser<()>>);
    let ok = grammar.parse("baz", 0, false).unwrap();
    assert_eq!(ok.index, 3);
}

#[test]
fn boundary_4_string_in_is_longest_match() {
    let p = Arc::new(StringIn::new(["if", "ifdef", "else"]));
    assert_eq!(p.parse("ifdefx", 0, false).unwrap().index, 5);
    assert_eq!(p.parse("if", 0, false).unwrap().index, 2);
    let err = p.parse("elz", 0, false).unwrap_err();
    assert_eq!(err.index, 0);
}

#[test]
fn boundary_5_recursive_expr_grammar() {
    // expr = num ~ ("+" ~ expr).?
    let num = Arc::new(CharsWhile::new(|c: char| c.is_ascii_digit(), 1, "digit"));
    let expr: Arc<Rule<String>> = Rule::forward("expr");
    {
        let expr_ref: Arc<dyn Parser<String>> = expr.clone();
        let num = num.clone();
        expr.bind(move || {
            let plus_expr = then_cut(
                Arc::new(Literal::new("+")) as Arc<dyn Parser<()>>,
                expr_ref.clone(),
                KeepRight,
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

    // "1+" fails inside the nested `expr` reentry; with tracing on, both the
    // outer and inner `expr` rule frames should appear (the `+` commits via
    // `~!`, so the inner `expr`'s failure to find a number is a cut failure
    // that both `Rule` levels append a frame to on the way out).
    let err = expr.parse("1+", 0, true).unwrap_err();
    assert!(err.cut);
    let names: Vec<&str> = err.full_stack.iter().map(|f| f.description.as_str()).collect();
    assert_eq!(names.iter().filter(|&&n| n == "expr").count(), 2);
}

#[test]
fn boundary_6_repeat_with_delimiter_respects_min() {
    let ab = Arc::new(CharIn::chars(['a', 'b']));
    let p = repeat_vec_sep(ab.clone(), 2, Arc::new(Literal::new(",")));
    let ok = p.parse("a,b,a", 0, false).unwrap();
    assert_eq!(ok.index, 5);

    let p2 = repeat_vec_sep(ab, 2, Arc::new(Literal::new(",")));
    assert!(p2.parse("a", 0, false).is_err());
}

#[test]
fn trace_off_leaves_the_stack_empty() {
    let p = Arc::new(Literal::new("foo"));
    let err = p.parse("bar", 0, false).unwrap_err();
    assert!(err.full_stack.is_empty());
    assert_eq!(err.index, 0);
    assert_eq!(err.parser, "Literal(\"foo\")");
}

#[test]
fn trace_on_each_entered_rule_contributes_one_frame() {
    let inner = rule("inner", || Arc::new(Literal::new("x")) as Arc<dyn Parser<()>>);
    let outer = rule("outer", move || inner.clone() as Arc<dyn Parser<()>>);
    let err = outer.parse("y", 0, true).unwrap_err();
    assert_eq!(err.full_stack.len(), 2);
    assert_eq!(err.full_stack[0].description, "inner");
    assert_eq!(err.full_stack[1].description, "outer");
}

#[test]
fn choice_of_many_alternatives_preserves_order() {
    let p = choice([
        Arc::new(Literal::new("a")) as Arc<dyn Parser<()>>,
        Arc::new(Literal::new("b")) as Arc<dyn Parser<()>>,
        Arc::new(Literal::new("c")) as Arc<dyn Parser<()>>,
    ]);
    assert_eq!(p.parse("c", 0, false).unwrap().index, 1);
}
