//! Assignment: `(setf target value)`.

use kiln_ir::SyntaxNode;
use kiln_types::Type;

use super::{expect_arity, resolve_node, FormRequest};
use crate::{FormErrorKind, FormResult, UnitContext, ValueResult};

pub(crate) fn form(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    req: &FormRequest,
) -> FormResult {
    expect_arity(cx, node, args, 2)?;
    assign(cx, &args[0], &args[1], req)
}

/// Store `value` through the address `target` evaluates to.
///
/// The value is resolved with the target's type as its hint. Exactly one
/// store is emitted, and only once both sides have resolved and type-check.
#[tracing::instrument(level = "debug", skip_all)]
pub fn assign(
    cx: &mut UnitContext,
    target: &SyntaxNode,
    value: &SyntaxNode,
    req: &FormRequest,
) -> FormResult {
    let target_result = resolve_node(cx, target, &req.nested(true))?;
    let target_ty = match &target_result.ty {
        Type::Pointer {
            pointee,
            is_const: false,
        } => (**pointee).clone(),
        _ => return Err(cx.fail(FormErrorKind::NotAddressable, target.span())),
    };
    let addr = target_result.value;

    let value_result = resolve_node(cx, value, &req.nested(false).wanting(target_ty.clone()))?;
    if !is_assignable(&value_result.ty, &target_ty) {
        return Err(cx.fail(
            FormErrorKind::TypeMismatch {
                expected: target_ty,
                found: value_result.ty,
            },
            value.span(),
        ));
    }

    cx.builder.position_at_end(req.block);
    cx.builder.store(value_result.value, addr);
    tracing::trace!(ty = %target_ty, "assignment stored");

    let addr_ty = Type::pointer_to(target_ty.clone());
    if req.get_address {
        return Ok(ValueResult::new(req.block, addr, addr_ty));
    }
    Ok(ValueResult::new(req.block, value_result.value, target_ty).with_address(addr, addr_ty))
}

/// Identical types, or `(p T)` into `(p (const T))`.
fn is_assignable(from: &Type, to: &Type) -> bool {
    if from == to {
        return true;
    }
    matches!(
        (from, to),
        (
            Type::Pointer { pointee: a, is_const: false },
            Type::Pointer { pointee: b, is_const: true },
        ) if a == b
    )
}
