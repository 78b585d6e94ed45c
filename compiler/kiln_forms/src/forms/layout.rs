//! Layout queries: `(alignmentof T)`, `(sizeof T)`, `(offsetof S field)`.
//!
//! Each yields a `size` constant. Incomplete and generic types, and results
//! the target cannot represent, fail with `UnsupportedType`.

use kiln_ir::{Span, SyntaxNode, TokenKind};
use kiln_types::{LayoutError, Type};

use super::{expect_arity, parse_type, FormRequest};
use crate::{FormErrorKind, FormResult, UnitContext, ValueResult};

/// A `size` constant holding `value`, or `TooLarge` when the target's
/// pointer width cannot represent it.
fn size_constant(
    cx: &mut UnitContext,
    req: &FormRequest,
    ty: &Type,
    value: u64,
    span: Span,
) -> FormResult {
    let bits = cx.target.pointer_bits;
    if bits < 64 && value >> bits != 0 {
        return Err(cx.fail(LayoutError::TooLarge(ty.clone()).into(), span));
    }
    let constant = cx.builder.const_int(Type::SIZE, bits, i128::from(value));
    Ok(ValueResult::new(req.block, constant, Type::SIZE))
}

pub(crate) fn alignmentof(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    req: &FormRequest,
) -> FormResult {
    expect_arity(cx, node, args, 1)?;
    let ty = parse_type(cx, &args[0])?;
    match cx.alignment_of(&ty) {
        Ok(align) => size_constant(cx, req, &ty, align, args[0].span()),
        Err(err) => Err(cx.fail(err.into(), args[0].span())),
    }
}

pub(crate) fn sizeof(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    req: &FormRequest,
) -> FormResult {
    expect_arity(cx, node, args, 1)?;
    let ty = parse_type(cx, &args[0])?;
    match cx.size_of(&ty) {
        Ok(size) => size_constant(cx, req, &ty, size, args[0].span()),
        Err(err) => Err(cx.fail(err.into(), args[0].span())),
    }
}

pub(crate) fn offsetof(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    req: &FormRequest,
) -> FormResult {
    expect_arity(cx, node, args, 2)?;
    let ty = parse_type(cx, &args[0])?;
    let Some(struct_name) = ty.struct_name().map(str::to_owned) else {
        return Err(cx.fail(FormErrorKind::NotAStruct(ty), args[0].span()));
    };
    let field_name = match args[1].as_atom() {
        Some(token) if token.kind == TokenKind::Identifier => token.text.clone(),
        Some(token) => {
            return Err(cx.fail(
                FormErrorKind::TokenCategory {
                    expected: TokenKind::Identifier,
                    found: token.kind,
                },
                token.span,
            ));
        }
        None => {
            return Err(cx.fail(
                FormErrorKind::structural("field name", "list"),
                args[1].span(),
            ));
        }
    };
    let index: Result<usize, FormErrorKind> = match cx.types.struct_def(&struct_name) {
        Some(def) if !def.is_complete() => Err(LayoutError::Incomplete(ty.clone()).into()),
        Some(def) => def
            .field(&field_name)
            .map(|(index, _)| index)
            .ok_or(FormErrorKind::NoSuchField {
                strukt: struct_name,
                field: field_name,
            }),
        None => Err(LayoutError::Unknown(ty.clone()).into()),
    };
    let index = match index {
        Ok(index) => index,
        Err(kind) => return Err(cx.fail(kind, node.span())),
    };
    match cx.field_offset(&ty, index) {
        Ok(offset) => size_constant(cx, req, &ty, offset, args[0].span()),
        Err(err) => Err(cx.fail(err.into(), args[0].span())),
    }
}
