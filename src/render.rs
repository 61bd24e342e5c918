//! Human-readable failure rendering: `spec.md` §6.
//!
//! A [`crate::result::Failure`] is data, not a message; these free functions
//! turn one into the three renderings the spec names. They take the
//! original input text as a separate argument rather than storing it on
//! `Failure` itself, since `Failure` outlives the [`crate::context::ParseContext`]
//! it was produced from and has no reason to clone the whole input just to
//! answer a `Display` call nobody may ever make.

use crate::result::{Failure, Frame};

/// The filtered, presentation-ready trace for a failure.
///
/// `full_stack` already contains only [`crate::rule::Rule`] frames and
/// cutting [`crate::combinator::Flat`] frames — each is pushed at the exact
/// point the spec calls out, so no further filtering happens here. This
/// appends the final synthetic frame at the failure's own deepest position.
pub fn stack(failure: &Failure) -> Vec<Frame> {
    let mut frames = failure.full_stack.clone();
    frames.push(Frame {
        index: failure.index,
        description: failure.parser.clone(),
    });
    frames
}

/// One line per frame, most recent first: `"${p}:${i}"` joined by `" / "`,
/// suffixed with the next ten code units of input from the failure point,
/// literalized.
pub fn trace(failure: &Failure, input: &str) -> String {
    let frames = stack(failure);
    let joined = frames
        .iter()
        .map(|f| format!("{}:{}", f.description, f.index))
        .collect::<Vec<_>>()
        .join(" / ");
    format!("{joined} ...{}", literalize(&peek(input, failure.index, 10)))
}

/// A multi-line rendering: one `"${i}\t...${literalized 5 chars}\t${p}"` per
/// frame, in the same order as [`stack`].
pub fn verbose_trace(failure: &Failure, input: &str) -> String {
    stack(failure)
        .iter()
        .map(|f| format!("{}\t...{}\t{}", f.index, literalize(&peek(input, f.index, 5)), f.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The substring of `input` starting at `index`, up to `len` code units
/// (fewer at end of input).
fn peek(input: &str, index: usize, len: usize) -> String {
    if index >= input.len() {
        return String::new();
    }
    input[index..].chars().take(len).collect()
}

/// Escapes `s` into a printable, double-quoted form: `\n`, `\t`, `\"`, `\\`
/// use their conventional short escapes, other non-printable characters
/// render as `\u{XXXX}`.
pub fn literalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Failure;

    #[test]
    fn literalize_escapes_conventional_sequences() {
        assert_eq!(literalize("a\nb\t\"c\"\\"), "\"a\\nb\\t\\\"c\\\"\\\\\"");
    }

    #[test]
    fn literalize_escapes_control_characters() {
        assert_eq!(literalize("\u{0007}"), "\"\\u{0007}\"");
    }

    #[test]
    fn stack_appends_the_deepest_frame() {
        let f = Failure::new(5, "CharLiteral('x')").with_frame(3, "digit");
        let frames = stack(&f);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].description, "digit");
        assert_eq!(frames[1].index, 5);
        assert_eq!(frames[1].description, "CharLiteral('x')");
    }

    #[test]
    fn trace_joins_frames_and_suffixes_the_upcoming_input() {
        let f = Failure::new(3, "Literal(\"bar\")").with_frame(0, "greeting");
        let rendered = trace(&f, "foobaX");
        assert_eq!(rendered, "greeting:0 / Literal(\"bar\"):3 ...\"baX\"");
    }

    #[test]
    fn verbose_trace_has_one_line_per_frame() {
        let f = Failure::new(3, "Literal(\"bar\")").with_frame(0, "greeting");
        let rendered = verbose_trace(&f, "foobarX");
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "0\t...\"fooba\"\tgreeting");
        assert_eq!(lines[1], "3\t...\"barX\"\tLiteral(\"bar\")");
    }
}
