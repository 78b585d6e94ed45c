//! The atom/list syntax tree.
//!
//! Nodes are immutable once the reader hands them over. Forms borrow them
//! for the duration of a resolution and never keep references past it.

use crate::{Span, Token, TokenKind};

/// A syntax tree node: a single token or a parenthesized list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum SyntaxNode {
    Atom(Token),
    List { items: Vec<SyntaxNode>, span: Span },
}

impl SyntaxNode {
    /// Build an atom.
    pub fn atom(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        SyntaxNode::Atom(Token::new(kind, text, span))
    }

    /// Build an identifier atom with a dummy span.
    pub fn symbol(text: impl Into<String>) -> Self {
        Self::atom(TokenKind::Identifier, text, Span::DUMMY)
    }

    /// Build an integer atom with a dummy span.
    pub fn int(text: impl Into<String>) -> Self {
        Self::atom(TokenKind::Integer, text, Span::DUMMY)
    }

    /// Build a floating-point atom with a dummy span.
    pub fn float(text: impl Into<String>) -> Self {
        Self::atom(TokenKind::FloatingPoint, text, Span::DUMMY)
    }

    /// Build a string-literal atom with a dummy span.
    pub fn string(text: impl Into<String>) -> Self {
        Self::atom(TokenKind::StringLiteral, text, Span::DUMMY)
    }

    /// Build a list; its span covers all item spans.
    pub fn list(items: Vec<SyntaxNode>) -> Self {
        let span = items
            .iter()
            .map(SyntaxNode::span)
            .reduce(Span::merge)
            .unwrap_or(Span::DUMMY);
        SyntaxNode::List { items, span }
    }

    /// Source location of this node.
    pub fn span(&self) -> Span {
        match self {
            SyntaxNode::Atom(token) => token.span,
            SyntaxNode::List { span, .. } => *span,
        }
    }

    /// The token, if this node is an atom.
    pub fn as_atom(&self) -> Option<&Token> {
        match self {
            SyntaxNode::Atom(token) => Some(token),
            SyntaxNode::List { .. } => None,
        }
    }

    /// The items, if this node is a list.
    pub fn as_list(&self) -> Option<&[SyntaxNode]> {
        match self {
            SyntaxNode::Atom(_) => None,
            SyntaxNode::List { items, .. } => Some(items),
        }
    }

    /// The symbol text, if this node is an identifier atom.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SyntaxNode::Atom(token) if token.kind == TokenKind::Identifier => Some(&token.text),
            _ => None,
        }
    }

    /// Head symbol of a list form, e.g. `setf` in `(setf x 1)`.
    pub fn head_symbol(&self) -> Option<&str> {
        self.as_list()?.first()?.as_symbol()
    }

    /// Short description for "expected X, found Y" diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            SyntaxNode::Atom(_) => "atom",
            SyntaxNode::List { .. } => "list",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn list_span_covers_items() {
        let node = SyntaxNode::list(vec![
            SyntaxNode::atom(TokenKind::Identifier, "setf", Span::new(1, 5)),
            SyntaxNode::atom(TokenKind::Identifier, "x", Span::new(6, 7)),
            SyntaxNode::atom(TokenKind::Integer, "1", Span::new(8, 9)),
        ]);
        assert_eq!(node.span(), Span::new(1, 9));
        assert_eq!(node.head_symbol(), Some("setf"));
    }

    #[test]
    fn empty_list_has_dummy_span() {
        let node = SyntaxNode::list(Vec::new());
        assert_eq!(node.span(), Span::DUMMY);
        assert_eq!(node.head_symbol(), None);
    }

    #[test]
    fn accessors_respect_shape() {
        let atom = SyntaxNode::int("5");
        assert!(atom.as_list().is_none());
        assert_eq!(atom.as_symbol(), None);
        assert_eq!(atom.describe(), "atom");

        let sym = SyntaxNode::symbol("x");
        assert_eq!(sym.as_symbol(), Some("x"));
        assert!(sym.as_atom().is_some_and(|t| t.is_symbol("x")));
    }
}
