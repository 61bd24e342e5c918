//! Injectable sink for `Logged`'s trace printing: `spec.md` §4.2.
//!
//! `spec.md` §1 keeps "user-facing debug logging sinks" out of the core
//! algebra — the engine "merely emits formatted strings via an injected
//! writer". `LogSink` is that injection seam. [`NullSink`] is always
//! available; [`StderrSink`], a terminal-aware colorized sink in the
//! teacher's own style, ships behind the `debug` feature.

use std::fmt;

/// Receives one already-formatted line from a [`crate::combinator::Logged`]
/// scope.
pub trait LogSink: Send + Sync {
    /// Writes one line (without a trailing newline).
    fn write_line(&self, line: &str);
}

impl fmt::Debug for dyn LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn LogSink")
    }
}

/// Discards every line. The default sink when `debug` is compiled out or
/// tracing output is silenced.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write_line(&self, _line: &str) {}
}

/// Writes to stderr, colorized when attached to a terminal and plain
/// otherwise, mirroring the teacher's `trace` module's degrade-gracefully
/// behavior. Only available under the `debug` feature.
#[cfg(feature = "debug")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

#[cfg(feature = "debug")]
impl LogSink for StderrSink {
    fn write_line(&self, line: &str) {
        use std::io::Write as _;

        let style = anstyle::Style::new().dimmed();
        let writer = anstream::stderr();
        let mut writer = writer.lock();
        let _ = writeln!(
            writer,
            "{style}{line}{reset}",
            style = style.render(),
            reset = style.render_reset(),
        );
    }
}

#[cfg(feature = "debug")]
fn terminal_width() -> usize {
    use is_terminal_polyfill::IsTerminal as _;

    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse::<usize>().ok())
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                terminal_size::terminal_size().map(|(w, _h)| w.0 as usize)
            } else {
                None
            }
        })
        .unwrap_or(80)
}

/// Truncates `line` to the current terminal width (or 80 columns when not
/// attached to a terminal / `debug` is off), the way the teacher pads and
/// clips its own trace columns.
#[cfg(feature = "debug")]
pub(crate) fn fit_to_terminal(line: &str) -> String {
    let width = terminal_width();
    if line.chars().count() <= width {
        line.to_string()
    } else {
        line.chars().take(width.saturating_sub(1)).collect::<String>() + "\u{2026}"
    }
}

#[cfg(not(feature = "debug"))]
pub(crate) fn fit_to_terminal(line: &str) -> String {
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_anything() {
        NullSink.write_line("whatever");
    }
}
