//! Enum member literals.

use kiln_codegen::Constant;
use kiln_ir::{SyntaxNode, TokenKind};
use kiln_types::{EnumDef, Type};

use super::FormRequest;
use crate::{FormErrorKind, FormResult, UnitContext, ValueResult};

/// Resolve `node` as a member of `def`.
///
/// The value is the enum's single-field representation holding the
/// member's value.
pub(crate) fn resolve(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    def: &EnumDef,
    req: &FormRequest,
) -> FormResult {
    let Some(token) = node.as_atom() else {
        return Err(cx.fail(
            FormErrorKind::structural("enum member", "list"),
            node.span(),
        ));
    };
    if token.kind != TokenKind::Identifier {
        return Err(cx.fail(
            FormErrorKind::TokenCategory {
                expected: TokenKind::Identifier,
                found: token.kind,
            },
            token.span,
        ));
    }
    let Some(value) = def.member(&token.text) else {
        return Err(cx.fail(
            FormErrorKind::UnresolvedName(token.text.clone()),
            token.span,
        ));
    };
    let bits = cx
        .target
        .bit_width(def.underlying)
        .unwrap_or(cx.target.native_int_bits);
    let ty = Type::enum_named(def.name.as_str());
    let constant = cx
        .builder
        .const_struct(ty.clone(), vec![Constant::Int { bits, value }]);
    tracing::trace!(member = %token.text, value, "enum literal");
    Ok(ValueResult::new(req.block, constant, ty))
}
