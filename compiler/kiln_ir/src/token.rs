//! Lexical leaves of the syntax tree.

use std::fmt;

use crate::Span;

/// Lexical category assigned by the reader.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// `42`, `-7`, `0x1F`
    Integer,
    /// `1.5`, `-0.25`
    FloatingPoint,
    /// Any bare symbol: names, `true`, `#\a`
    Identifier,
    /// `"text"` with the quotes already stripped
    StringLiteral,
}

impl TokenKind {
    /// Human-readable category name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Integer => "integer",
            TokenKind::FloatingPoint => "floating-point number",
            TokenKind::Identifier => "symbol",
            TokenKind::StringLiteral => "string literal",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A single token: category plus the raw text the reader saw.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    /// True if this is an identifier token with exactly `text`.
    #[inline]
    pub fn is_symbol(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == text
    }
}
