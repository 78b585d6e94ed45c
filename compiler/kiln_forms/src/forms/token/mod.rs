//! Literal and identifier resolution for a single syntax leaf.
//!
//! Order of attempts:
//!
//! 1. Integer and floating-point tokens become constants, sized by the
//!    wanted type when it is numeric.
//! 2. If the wanted type is a registered enum, the token is tried as one of
//!    its members. A failed attempt is rolled back out of the diagnostic log.
//! 3. Identifiers: `true`/`false`, then `#\` character literals, then a
//!    variable reference.
//! 4. String literals become a fresh internal constant global.

mod literal;

use kiln_codegen::{Constant, FloatKind, Linkage};
use kiln_ir::{SyntaxNode, Token, TokenKind};
use kiln_types::{PrimitiveKind, Type};

use self::literal::{fits, parse_char, CharLiteral};
use super::{enum_literal, from_address, FormRequest};
use crate::{FormErrorKind, FormResult, UnitContext, ValueResult};

pub(crate) use self::literal::parse_integer;
pub use self::literal::translate_string_literal;

/// Resolve an atom into a typed value or address.
#[tracing::instrument(level = "debug", skip(cx, node, req), fields(wanted = ?req.wanted))]
pub fn resolve_token(cx: &mut UnitContext, node: &SyntaxNode, req: &FormRequest) -> FormResult {
    cx.builder.position_at_end(req.block);
    let Some(token) = node.as_atom() else {
        return Err(cx.fail(FormErrorKind::structural("literal", "list"), node.span()));
    };
    match token.kind {
        TokenKind::Integer => integer(cx, token, req),
        TokenKind::FloatingPoint => floating(cx, token, req),
        TokenKind::Identifier | TokenKind::StringLiteral => {
            if let Some(result) = speculative_enum(cx, node, req) {
                return Ok(result);
            }
            if token.kind == TokenKind::Identifier {
                identifier(cx, token, req)
            } else {
                string(cx, token, req)
            }
        }
    }
}

fn integer(cx: &mut UnitContext, token: &Token, req: &FormRequest) -> FormResult {
    let kind = req
        .wanted
        .as_ref()
        .and_then(Type::primitive)
        .filter(|kind| kind.is_integer())
        .unwrap_or(PrimitiveKind::Int);
    let ty = Type::Primitive(kind);
    let bits = cx.target.bit_width(kind).unwrap_or(cx.target.native_int_bits);
    let Some(value) = parse_integer(&token.text).filter(|&v| fits(v, bits, kind.is_signed())) else {
        return Err(cx.fail(
            FormErrorKind::LiteralConstruction {
                ty,
                text: token.text.clone(),
            },
            token.span,
        ));
    };
    let constant = cx.builder.const_int(ty.clone(), bits, value);
    Ok(ValueResult::new(req.block, constant, ty))
}

fn floating(cx: &mut UnitContext, token: &Token, req: &FormRequest) -> FormResult {
    let (ty, kind) = match req.wanted.as_ref().and_then(Type::primitive) {
        Some(PrimitiveKind::Double) => (Type::DOUBLE, FloatKind::Double),
        Some(PrimitiveKind::LongDouble) => (Type::LONG_DOUBLE, FloatKind::Extended),
        _ => (Type::FLOAT, FloatKind::Single),
    };
    let Ok(mut value) = token.text.parse::<f64>() else {
        return Err(cx.fail(
            FormErrorKind::LiteralConstruction {
                ty,
                text: token.text.clone(),
            },
            token.span,
        ));
    };
    if kind == FloatKind::Single {
        #[allow(clippy::cast_possible_truncation, reason = "rounding to single precision")]
        let single = value as f32;
        value = f64::from(single);
    }
    let constant = cx
        .builder
        .const_float(ty.clone(), Constant::Float { kind, value });
    Ok(ValueResult::new(req.block, constant, ty))
}

/// Try `node` as a member of the wanted enum, leaving no trace on failure.
fn speculative_enum(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    req: &FormRequest,
) -> Option<ValueResult> {
    let name = req.wanted.as_ref()?.enum_name()?;
    let def = cx.types.enum_def(name)?.clone();
    let checkpoint = cx.checkpoint();
    match enum_literal::resolve(cx, node, &def, req) {
        Ok(result) => Some(result),
        Err(err) => {
            tracing::debug!(%err, enum_name = %def.name, "not an enum literal, falling back");
            cx.rollback(checkpoint);
            None
        }
    }
}

fn identifier(cx: &mut UnitContext, token: &Token, req: &FormRequest) -> FormResult {
    if let flag @ ("true" | "false") = token.text.as_str() {
        let constant = cx
            .builder
            .const_int(Type::BOOL, 1, i128::from(flag == "true"));
        return Ok(ValueResult::new(req.block, constant, Type::BOOL));
    }
    match parse_char(&token.text) {
        CharLiteral::Byte(byte) => {
            let constant = cx.builder.const_int(Type::CHAR, 8, i128::from(byte));
            return Ok(ValueResult::new(req.block, constant, Type::CHAR));
        }
        CharLiteral::Invalid => {
            return Err(cx.fail(
                FormErrorKind::InvalidEscape(token.text.clone()),
                token.span,
            ));
        }
        CharLiteral::NotChar => {}
    }
    let Some(var) = cx.lookup(&token.text).cloned() else {
        return Err(cx.fail(
            FormErrorKind::UnresolvedName(token.text.clone()),
            token.span,
        ));
    };
    tracing::trace!(name = %var.name, ty = %var.ty, "variable reference");
    Ok(from_address(cx, var.storage, var.ty, req))
}

/// Materialize a string literal as an internal global and yield a
/// `(p (const char))` to its first byte.
///
/// Array element types carry no qualifier, so the global is typed
/// `(array-of N char)` and its constness is the `constant` flag it is
/// registered with (printed as `internal constant`).
fn string(cx: &mut UnitContext, token: &Token, req: &FormRequest) -> FormResult {
    if let Some(wanted) = &req.wanted {
        let element = wanted.pointee().or_else(|| wanted.element());
        if !element.is_some_and(Type::is_char) {
            return Err(cx.fail(
                FormErrorKind::LiteralConstruction {
                    ty: wanted.clone(),
                    text: token.text.clone(),
                },
                token.span,
            ));
        }
    }
    let bytes = translate_string_literal(&token.text);
    let array_ty = Type::array_of(Type::CHAR, bytes.len() as u64);
    let name = cx.unused_name();
    let var = cx.register_global(
        &name,
        array_ty,
        Linkage::Internal,
        true,
        Some(Constant::Bytes(bytes)),
        token.span,
    )?;
    tracing::debug!(%name, "string literal materialized");
    let ty = Type::const_pointer_to(Type::CHAR);
    let first = cx.builder.gep(var.storage, &[0, 0], ty.clone());
    Ok(ValueResult::new(req.block, first, ty))
}

#[cfg(test)]
mod tests;
