//! Struct field reference: `(: base field)`.

use kiln_ir::{SyntaxNode, TokenKind};
use kiln_types::{LayoutError, Type};

use super::{expect_arity, from_address, resolve_node, FormRequest};
use crate::{FormErrorKind, FormResult, UnitContext};

pub(crate) fn form(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    req: &FormRequest,
) -> FormResult {
    expect_arity(cx, node, args, 2)?;
    resolve_field(cx, &args[0], &args[1], req)
}

/// Resolve field `field` of the struct `base` evaluates to.
///
/// `base` is evaluated for its address. If that address points at a
/// pointer, it is dereferenced exactly once; deeper indirection needs
/// nested field references or `@`.
#[tracing::instrument(level = "debug", skip_all, fields(field = ?field.as_symbol()))]
pub fn resolve_field(
    cx: &mut UnitContext,
    base: &SyntaxNode,
    field: &SyntaxNode,
    req: &FormRequest,
) -> FormResult {
    let field_name = match field.as_atom() {
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
                field.span(),
            ));
        }
    };

    let base_result = resolve_node(cx, base, &req.nested(true))?;
    cx.builder.position_at_end(req.block);
    let Some(mut target) = base_result.ty.pointee().cloned() else {
        return Err(cx.fail(FormErrorKind::NotAStruct(base_result.ty), base.span()));
    };
    let mut addr = base_result.value;
    if let Some(inner) = target.pointee().cloned() {
        addr = cx.builder.load(addr);
        target = inner;
    }

    let Some(struct_name) = target.struct_name().map(str::to_owned) else {
        return Err(cx.fail(FormErrorKind::NotAStruct(target), base.span()));
    };
    let lookup = cx.types.struct_def(&struct_name).map(|def| {
        (
            def.is_complete(),
            def.field(&field_name).map(|(index, f)| (index, f.ty.clone())),
        )
    });
    let (index, field_ty) = match lookup {
        None => {
            return Err(cx.fail(FormErrorKind::UnknownType(struct_name), base.span()));
        }
        Some((false, _)) => {
            return Err(cx.fail(LayoutError::Incomplete(target).into(), base.span()));
        }
        Some((true, None)) => {
            return Err(cx.fail(
                FormErrorKind::NoSuchField {
                    strukt: struct_name,
                    field: field_name,
                },
                field.span(),
            ));
        }
        Some((true, Some(found))) => found,
    };

    #[allow(clippy::cast_possible_truncation, reason = "field counts are small")]
    let index = index as u32;
    let field_addr = cx
        .builder
        .gep(addr, &[0, index], Type::pointer_to(field_ty.clone()));
    tracing::trace!(%struct_name, %field_name, index, "field address");
    Ok(from_address(cx, field_addr, field_ty, req))
}
