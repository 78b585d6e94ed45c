use std::fmt;

use kiln_ir::Span;

use crate::ErrorCode;

/// Source range annotated with a short explanation.
///
/// The first label pushed through [`Diagnostic::at`] is the primary one; any
/// further labels added with [`Diagnostic::also_at`] point at related code.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub text: String,
    pub is_primary: bool,
}

/// One reported error in a compilation unit.
///
/// Built in a chain and handed to a [`DiagnosticLog`](crate::DiagnosticLog):
///
/// ```
/// # use kiln_diagnostic::{Diagnostic, ErrorCode};
/// # use kiln_ir::Span;
/// let diag = Diagnostic::error(ErrorCode::E2021)
///     .with_message("struct `point` has no field `z`")
///     .at(Span::new(7, 8), "no such field");
/// assert_eq!(diag.primary_span(), Some(Span::new(7, 8)));
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic does nothing until it is pushed to a log"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Label the place the problem was detected.
    pub fn at(mut self, span: Span, text: impl Into<String>) -> Self {
        let is_primary = !self.labels.iter().any(|l| l.is_primary);
        self.labels.push(Label {
            span,
            text: text.into(),
            is_primary,
        });
        self
    }

    /// Label related code, such as the declaration a mismatch refers to.
    pub fn also_at(mut self, span: Span, text: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            text: text.into(),
            is_primary: false,
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        if let Some(span) = self.primary_span() {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_label_is_primary() {
        let diag = Diagnostic::error(ErrorCode::E2001)
            .with_message("expected `int`, found `bool`")
            .also_at(Span::new(0, 5), "declared here")
            .at(Span::new(9, 13), "assigned here")
            .at(Span::new(20, 21), "and here");

        let primaries: Vec<_> = diag.labels.iter().filter(|l| l.is_primary).collect();
        assert_eq!(primaries.len(), 1);
        assert_eq!(diag.primary_span(), Some(Span::new(9, 13)));
    }

    #[test]
    fn display_includes_code_and_location() {
        let diag = Diagnostic::error(ErrorCode::E2003)
            .with_message("unknown identifier `x`")
            .at(Span::new(3, 4), "not found");
        assert_eq!(diag.to_string(), "error[E2003]: unknown identifier `x` at 3..4");

        let bare = Diagnostic::error(ErrorCode::E9001).with_message("odd");
        assert_eq!(bare.to_string(), "error[E9001]: odd");
    }
}
