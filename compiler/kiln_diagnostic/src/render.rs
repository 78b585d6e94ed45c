//! Plain-text rendering of a unit's diagnostics.
//!
//! ```text
//! error[E2021]: struct `point` has no field `z`
//!   --> 1:9: no such field
//!
//! error: 1 error in `main.kn`
//! ```

use std::fmt::Write;

use kiln_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, DiagnosticLog};

const RED: &str = "\x1b[1;31m";
const BLUE: &str = "\x1b[1;34m";
const RESET: &str = "\x1b[0m";

/// Whether ANSI escapes are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colors when the destination is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Formats diagnostics, optionally resolving spans against the source text.
///
/// Without source, locations print as byte ranges.
pub struct Renderer<'src> {
    color: bool,
    source: Option<(&'src str, LineOffsetTable)>,
}

impl<'src> Renderer<'src> {
    pub fn new(color: bool) -> Self {
        Renderer {
            color,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: &'src str) -> Self {
        self.source = Some((source, LineOffsetTable::build(source)));
        self
    }

    fn paint(&self, out: &mut String, text: &str, color: &str) {
        if self.color {
            let _ = write!(out, "{color}{text}{RESET}");
        } else {
            out.push_str(text);
        }
    }

    fn location(&self, span: Span) -> String {
        match &self.source {
            Some((source, table)) => {
                let (line, col) = table.offset_to_line_col(source, span.start);
                format!("{line}:{col}")
            }
            None => span.to_string(),
        }
    }

    /// Append one diagnostic, followed by a blank line.
    pub fn diagnostic(&self, out: &mut String, diag: &Diagnostic) {
        self.paint(out, &format!("error[{}]", diag.code), RED);
        let _ = writeln!(out, ": {}", diag.message);

        for label in &diag.labels {
            let arrow = if label.is_primary { "-->" } else { "   " };
            let _ = write!(out, "  {arrow} {}: ", self.location(label.span));
            self.paint(out, &label.text, if label.is_primary { RED } else { BLUE });
            out.push('\n');
        }
        for note in &diag.notes {
            let _ = writeln!(out, "  = note: {note}");
        }
        out.push('\n');
    }

    /// Render every entry of `log` followed by an error count for `unit`.
    pub fn log(&self, log: &DiagnosticLog, unit: &str) -> String {
        let mut out = String::new();
        for diag in log.diagnostics() {
            self.diagnostic(&mut out, diag);
        }
        let errors = log.error_count();
        if errors > 0 {
            self.paint(&mut out, "error", RED);
            let plural = if errors == 1 { "" } else { "s" };
            let _ = write!(out, ": {errors} error{plural} in `{unit}`");
            if log.dropped_count() > 0 {
                let _ = write!(out, " ({} more not shown)", log.dropped_count());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{DiagnosticConfig, ErrorCode};

    fn mismatch() -> Diagnostic {
        Diagnostic::error(ErrorCode::E2001)
            .with_message("expected `int`, found `bool`")
            .at(Span::new(10, 14), "type mismatch")
            .also_at(Span::new(6, 7), "target")
            .with_note("assignment requires identical types")
    }

    #[test]
    fn byte_ranges_without_source() {
        let mut out = String::new();
        Renderer::new(false).diagnostic(&mut out, &mismatch());
        assert_eq!(
            out,
            "error[E2001]: expected `int`, found `bool`\n\
             \x20 --> 10..14: type mismatch\n\
             \x20     6..7: target\n\
             \x20 = note: assignment requires identical types\n\n"
        );
    }

    #[test]
    fn line_and_column_with_source() {
        let mut out = String::new();
        Renderer::new(false)
            .with_source("(setf x\n  true)")
            .diagnostic(&mut out, &mismatch());
        assert!(out.contains("--> 2:3: type mismatch"));
        assert!(out.contains("    1:7: target"));
    }

    #[test]
    fn color_only_when_enabled() {
        let mut plain = String::new();
        Renderer::new(ColorMode::Never.enabled(true)).diagnostic(&mut plain, &mismatch());
        assert!(!plain.contains('\x1b'));

        let mut colored = String::new();
        Renderer::new(ColorMode::Auto.enabled(true)).diagnostic(&mut colored, &mismatch());
        assert!(colored.starts_with(RED));
    }

    #[test]
    fn log_summary_counts_errors() {
        let mut log = DiagnosticLog::with_config(DiagnosticConfig { error_limit: 1 });
        log.push(mismatch());
        log.push(mismatch());

        let text = Renderer::new(false).log(&log, "main.kn");
        assert!(text.ends_with("error: 1 error in `main.kn` (1 more not shown)\n"));
        assert_eq!(text.matches("error[E2001]").count(), 1);
    }

    #[test]
    fn empty_log_renders_nothing() {
        assert_eq!(Renderer::new(false).log(&DiagnosticLog::new(), "x"), "");
    }
}
