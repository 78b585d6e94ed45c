//! Type-name syntax used by the layout forms.
//!
//! `int`, `char`, `(p T)`, `(p (const T))`, `(array-of N T)` and names of
//! registered structs and enums.

use kiln_ir::{SyntaxNode, TokenKind};
use kiln_types::{PrimitiveKind, Type};

use super::expect_arity;
use super::token::parse_integer;
use crate::{FormError, FormErrorKind, UnitContext};

/// Parse a type name.
pub fn parse_type(cx: &mut UnitContext, node: &SyntaxNode) -> Result<Type, FormError> {
    if let Some(token) = node.as_atom() {
        if token.kind != TokenKind::Identifier {
            return Err(cx.fail(
                FormErrorKind::TokenCategory {
                    expected: TokenKind::Identifier,
                    found: token.kind,
                },
                token.span,
            ));
        }
        if let Some(kind) = PrimitiveKind::from_name(&token.text) {
            return Ok(Type::Primitive(kind));
        }
        return match cx.types.lookup_named(&token.text) {
            Some(ty) => Ok(ty),
            None => Err(cx.fail(
                FormErrorKind::UnknownType(token.text.clone()),
                token.span,
            )),
        };
    }

    let items = node.as_list().unwrap_or_default();
    match node.head_symbol() {
        Some("p") => {
            expect_arity(cx, node, &items[1..], 1)?;
            let inner = &items[1];
            match inner.as_list() {
                Some([head, pointee]) if head.as_symbol() == Some("const") => {
                    Ok(Type::const_pointer_to(parse_type(cx, pointee)?))
                }
                _ => Ok(Type::pointer_to(parse_type(cx, inner)?)),
            }
        }
        Some("array-of") => {
            expect_arity(cx, node, &items[1..], 2)?;
            let len = items[1]
                .as_atom()
                .filter(|token| token.kind == TokenKind::Integer)
                .and_then(|token| parse_integer(&token.text))
                .and_then(|n| u64::try_from(n).ok());
            let Some(len) = len else {
                return Err(cx.fail(
                    FormErrorKind::structural("array length", items[1].describe()),
                    items[1].span(),
                ));
            };
            Ok(Type::array_of(parse_type(cx, &items[2])?, len))
        }
        Some(other) => Err(cx.fail(
            FormErrorKind::UnknownType(other.to_owned()),
            node.span(),
        )),
        None => Err(cx.fail(
            FormErrorKind::structural("type", node.describe()),
            node.span(),
        )),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use kiln_diagnostic::ErrorCode;
    use kiln_types::FieldDef;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::UnitConfig;

    fn sym(s: &str) -> SyntaxNode {
        SyntaxNode::symbol(s)
    }

    #[test]
    fn primitive_and_compound_names() {
        let mut cx = UnitConfig::new("t").build();
        cx.types_mut()
            .define_struct("point", vec![FieldDef::new("x", Type::INT)])
            .unwrap();

        assert_eq!(parse_type(&mut cx, &sym("long-double")).unwrap(), Type::LONG_DOUBLE);
        assert_eq!(
            parse_type(&mut cx, &SyntaxNode::list(vec![sym("p"), sym("point")])).unwrap(),
            Type::pointer_to(Type::struct_named("point"))
        );
        let const_char = SyntaxNode::list(vec![
            sym("p"),
            SyntaxNode::list(vec![sym("const"), sym("char")]),
        ]);
        assert_eq!(
            parse_type(&mut cx, &const_char).unwrap(),
            Type::const_pointer_to(Type::CHAR)
        );
        let array = SyntaxNode::list(vec![sym("array-of"), SyntaxNode::int("4"), sym("uint8")]);
        assert_eq!(
            parse_type(&mut cx, &array).unwrap(),
            Type::array_of(Type::Primitive(PrimitiveKind::UInt8), 4)
        );
        assert!(cx.diagnostics().is_empty());
    }

    #[test]
    fn unknown_names_fail() {
        let mut cx = UnitConfig::new("t").build();
        let err = parse_type(&mut cx, &sym("widget")).unwrap_err();
        assert_eq!(err.kind, FormErrorKind::UnknownType("widget".into()));
        assert_eq!(err.code(), ErrorCode::E2002);

        let bad_len = SyntaxNode::list(vec![sym("array-of"), sym("n"), sym("int")]);
        let err = parse_type(&mut cx, &bad_len).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E1001);
        assert_eq!(cx.diagnostics().len(), 2);
    }
}
