//! Kiln IR - syntax types handed over by the reader.
//!
//! This crate contains the data the reader produces and every later phase
//! consumes:
//! - Spans for source locations
//! - Tokens with their lexical category
//! - `SyntaxNode`, the atom/list tree of a Lisp-syntaxed source file
//!
//! The reader itself lives outside this workspace; tests and tools build
//! trees through the constructors on [`SyntaxNode`].

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod node;
mod span;
mod token;

pub use node::SyntaxNode;
pub use span::Span;
pub use token::{Token, TokenKind};
