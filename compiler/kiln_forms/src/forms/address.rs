//! Address-of `(# x)` and dereference `(@ p)`.

use kiln_ir::SyntaxNode;

use super::{expect_arity, from_address, resolve_node, FormRequest};
use crate::{FormErrorKind, FormResult, UnitContext, ValueResult};

/// `(# x)`: the storage address of an lvalue.
///
/// For a decayed array this is the address of the whole array.
pub(crate) fn address_of(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    req: &FormRequest,
) -> FormResult {
    expect_arity(cx, node, args, 1)?;
    if req.get_address {
        // the address itself has no storage
        return Err(cx.fail(FormErrorKind::NotAddressable, node.span()));
    }
    let inner = resolve_node(cx, &args[0], &req.nested(false))?;
    let Some(addr) = inner.address_of else {
        return Err(cx.fail(FormErrorKind::NotAddressable, args[0].span()));
    };
    Ok(ValueResult::new(req.block, addr.value, addr.ty))
}

/// `(@ p)`: the object `p` points at, as an lvalue.
pub(crate) fn dereference(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    req: &FormRequest,
) -> FormResult {
    expect_arity(cx, node, args, 1)?;
    let inner = resolve_node(cx, &args[0], &req.nested(false))?;
    let Some(pointee) = inner.ty.pointee().cloned() else {
        return Err(cx.fail(FormErrorKind::NotAPointer(inner.ty), args[0].span()));
    };
    if req.get_address {
        return Ok(ValueResult::new(req.block, inner.value, inner.ty));
    }
    cx.builder.position_at_end(req.block);
    Ok(from_address(cx, inner.value, pointee, req))
}
