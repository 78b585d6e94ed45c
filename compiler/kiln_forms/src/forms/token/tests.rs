#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use kiln_codegen::{Constant, FloatKind, Instruction, Linkage, ValueKind};
use kiln_diagnostic::ErrorCode;
use kiln_ir::SyntaxNode;
use kiln_types::{PrimitiveKind, Type};
use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{int, list, loads, sym, unit};
use crate::AddressOf;

fn wanting(block: kiln_codegen::BlockId, ty: Type) -> FormRequest {
    FormRequest::value(block).wanting(ty)
}

fn constant(cx: &UnitContext, result: &ValueResult) -> Constant {
    cx.module().constant(result.value).cloned().unwrap()
}

// Integers and floats

#[test]
fn integer_takes_wanted_width() {
    let (mut cx, entry) = unit();
    let int8 = Type::Primitive(PrimitiveKind::Int8);
    let result = resolve_token(&mut cx, &int("42"), &wanting(entry, int8.clone())).unwrap();
    assert_eq!(result.ty, int8);
    assert_eq!(constant(&cx, &result), Constant::Int { bits: 8, value: 42 });
    assert!(!result.is_lvalue());
}

#[test]
fn integer_defaults_to_native_int() {
    let (mut cx, entry) = unit();
    let result = resolve_token(&mut cx, &int("-7"), &FormRequest::value(entry)).unwrap();
    assert_eq!(result.ty, Type::INT);
    assert_eq!(constant(&cx, &result), Constant::Int { bits: 32, value: -7 });

    let result = resolve_token(&mut cx, &int("0x10"), &wanting(entry, Type::DOUBLE)).unwrap();
    assert_eq!(result.ty, Type::INT);
    assert_eq!(constant(&cx, &result), Constant::Int { bits: 32, value: 16 });
}

#[test]
fn size_integer_uses_pointer_width() {
    let (mut cx, entry) = unit();
    let result = resolve_token(&mut cx, &int("8"), &wanting(entry, Type::SIZE)).unwrap();
    assert_eq!(constant(&cx, &result), Constant::Int { bits: 64, value: 8 });
}

#[test]
fn integer_out_of_range_fails() {
    let (mut cx, entry) = unit();
    let uint8 = Type::Primitive(PrimitiveKind::UInt8);
    let err = resolve_token(&mut cx, &int("300"), &wanting(entry, uint8.clone())).unwrap_err();
    assert_eq!(
        err.kind,
        FormErrorKind::LiteralConstruction {
            ty: uint8,
            text: "300".into()
        }
    );
    assert_eq!(err.code(), ErrorCode::E0003);
    assert_eq!(cx.diagnostics().len(), 1);
}

#[test]
fn float_precision_follows_wanted_type() {
    let (mut cx, entry) = unit();
    let result =
        resolve_token(&mut cx, &SyntaxNode::float("0.1"), &wanting(entry, Type::DOUBLE)).unwrap();
    assert_eq!(result.ty, Type::DOUBLE);
    assert_eq!(
        constant(&cx, &result),
        Constant::Float {
            kind: FloatKind::Double,
            value: 0.1
        }
    );

    let result = resolve_token(
        &mut cx,
        &SyntaxNode::float("2.5"),
        &wanting(entry, Type::LONG_DOUBLE),
    )
    .unwrap();
    assert_eq!(result.ty, Type::LONG_DOUBLE);
}

#[test]
fn float_defaults_to_single() {
    let (mut cx, entry) = unit();
    let result =
        resolve_token(&mut cx, &SyntaxNode::float("0.1"), &FormRequest::value(entry)).unwrap();
    assert_eq!(result.ty, Type::FLOAT);
    assert_eq!(
        constant(&cx, &result),
        Constant::Float {
            kind: FloatKind::Single,
            value: f64::from(0.1_f32)
        }
    );
}

#[test]
fn list_is_structural_error() {
    let (mut cx, entry) = unit();
    let err = resolve_token(&mut cx, &list([sym("x")]), &FormRequest::value(entry)).unwrap_err();
    assert_eq!(err.kind, FormErrorKind::structural("literal", "list"));
    assert_eq!(err.code(), ErrorCode::E1001);
}

// Booleans and characters

#[test]
fn booleans() {
    let (mut cx, entry) = unit();
    for (text, value) in [("true", 1), ("false", 0)] {
        let result = resolve_token(&mut cx, &sym(text), &FormRequest::value(entry)).unwrap();
        assert_eq!(result.ty, Type::BOOL);
        assert_eq!(constant(&cx, &result), Constant::Int { bits: 1, value });
    }
}

#[test]
fn named_and_single_characters() {
    let (mut cx, entry) = unit();
    for (text, value) in [
        ("#\\NULL", 0),
        ("#\\TAB", 9),
        ("#\\SPACE", 32),
        ("#\\NEWLINE", 10),
        ("#\\CARRIAGE", 13),
        ("#\\EOF", -1),
        ("#\\x", 120),
    ] {
        let result = resolve_token(&mut cx, &sym(text), &FormRequest::value(entry)).unwrap();
        assert_eq!(result.ty, Type::CHAR, "{text}");
        assert_eq!(constant(&cx, &result), Constant::Int { bits: 8, value }, "{text}");
    }
    assert!(cx.diagnostics().is_empty());
}

#[test]
fn multi_character_body_is_invalid_escape() {
    let (mut cx, entry) = unit();
    let err = resolve_token(&mut cx, &sym("#\\ab"), &FormRequest::value(entry)).unwrap_err();
    assert_eq!(err.kind, FormErrorKind::InvalidEscape("#\\ab".into()));
    assert_eq!(err.code(), ErrorCode::E0005);
}

// Variables

#[test]
fn unknown_variable_is_unresolved() {
    let (mut cx, entry) = unit();
    let err = resolve_token(&mut cx, &sym("nope"), &FormRequest::value(entry)).unwrap_err();
    assert_eq!(err.kind, FormErrorKind::UnresolvedName("nope".into()));
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(cx.diagnostics().len(), 1);
}

#[test]
fn variable_address_emits_no_load() {
    let (mut cx, entry) = unit();
    let x = cx.declare_local("x", Type::INT).unwrap();
    let result = resolve_token(&mut cx, &sym("x"), &FormRequest::address(entry)).unwrap();
    assert_eq!(result.value, x.storage);
    assert_eq!(result.ty, Type::pointer_to(Type::INT));
    assert_eq!(loads(&cx, entry), 0);
}

#[test]
fn variable_value_is_loaded_lvalue() {
    let (mut cx, entry) = unit();
    let x = cx.declare_local("x", Type::INT).unwrap();
    let result = resolve_token(&mut cx, &sym("x"), &FormRequest::value(entry)).unwrap();
    assert_eq!(result.ty, Type::INT);
    assert_eq!(
        cx.module().instruction(result.value),
        Some(&Instruction::Load { ptr: x.storage })
    );
    assert_eq!(
        result.address_of,
        Some(AddressOf {
            value: x.storage,
            ty: Type::pointer_to(Type::INT)
        })
    );
    assert_eq!(loads(&cx, entry), 1);
}

#[test]
fn array_variable_decays_and_keeps_array_address() {
    let (mut cx, entry) = unit();
    let array = Type::array_of(Type::INT, 3);
    let arr = cx.declare_local("arr", array.clone()).unwrap();
    let result = resolve_token(&mut cx, &sym("arr"), &FormRequest::value(entry)).unwrap();

    assert_eq!(result.ty, Type::pointer_to(Type::INT));
    assert_eq!(
        cx.module().instruction(result.value),
        Some(&Instruction::Gep {
            ptr: arr.storage,
            indices: [0, 0].into_iter().collect()
        })
    );
    assert_eq!(
        result.address_of,
        Some(AddressOf {
            value: arr.storage,
            ty: Type::pointer_to(array)
        })
    );
    assert_eq!(loads(&cx, entry), 0);
}

#[test]
fn global_variable_resolves_after_scopes() {
    let (mut cx, entry) = unit();
    cx.declare_global("g", Type::CHAR, Linkage::External, None)
        .unwrap();
    let result = resolve_token(&mut cx, &sym("g"), &FormRequest::value(entry)).unwrap();
    assert_eq!(result.ty, Type::CHAR);
    assert!(result.is_lvalue());
}

// String literals

#[test]
fn string_literal_becomes_internal_constant_global() {
    let (mut cx, entry) = unit();
    let result =
        resolve_token(&mut cx, &SyntaxNode::string("hi"), &FormRequest::value(entry)).unwrap();
    assert_eq!(result.ty, Type::const_pointer_to(Type::CHAR));
    assert!(!result.is_lvalue());

    let Some(Instruction::Gep { ptr, indices }) = cx.module().instruction(result.value) else {
        panic!("expected element address");
    };
    assert_eq!(indices.as_slice(), &[0, 0]);
    let ValueKind::GlobalAddress(global) = cx.module().value(*ptr).kind else {
        panic!("expected global address");
    };
    let global = cx.module().global(global);
    assert_eq!(global.ty, Type::array_of(Type::CHAR, 3));
    assert_eq!(global.linkage, Linkage::Internal);
    assert!(global.constant);
    assert_eq!(global.init, Some(Constant::Bytes(b"hi\0".to_vec())));
}

#[test]
fn identical_strings_get_distinct_globals() {
    let (mut cx, entry) = unit();
    let node = SyntaxNode::string("same");
    resolve_token(&mut cx, &node, &FormRequest::value(entry)).unwrap();
    resolve_token(&mut cx, &node, &FormRequest::value(entry)).unwrap();
    let names: Vec<_> = cx.module().globals().map(|(_, g)| g.name.clone()).collect();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
}

#[test]
fn generated_names_skip_taken_ones() {
    let (mut cx, entry) = unit();
    cx.declare_global("_kv0", Type::INT, Linkage::Internal, None)
        .unwrap();
    resolve_token(&mut cx, &SyntaxNode::string("x"), &FormRequest::value(entry)).unwrap();
    assert!(cx.module().global_by_name("_kv1").is_some());
    assert!(cx.lookup("_kv1").is_some());
}

#[test]
fn string_escape_translation_is_stored() {
    let (mut cx, entry) = unit();
    resolve_token(&mut cx, &SyntaxNode::string("a\\nb"), &FormRequest::value(entry)).unwrap();
    let (_, global) = cx.module().globals().next().unwrap();
    assert_eq!(global.init, Some(Constant::Bytes(b"a\nb\0".to_vec())));
    assert_eq!(global.ty, Type::array_of(Type::CHAR, 4));
}

#[test]
fn string_requires_char_like_hint() {
    let (mut cx, entry) = unit();
    let ok = resolve_token(
        &mut cx,
        &SyntaxNode::string("ok"),
        &wanting(entry, Type::const_pointer_to(Type::CHAR)),
    );
    assert!(ok.is_ok());

    let err = resolve_token(&mut cx, &SyntaxNode::string("no"), &wanting(entry, Type::INT))
        .unwrap_err();
    assert_eq!(
        err.kind,
        FormErrorKind::LiteralConstruction {
            ty: Type::INT,
            text: "no".into()
        }
    );
    assert_eq!(cx.module().globals().count(), 1);
}

// Enum literals

fn with_color(cx: &mut UnitContext) -> Type {
    cx.types_mut()
        .define_enum(
            "color",
            PrimitiveKind::Int,
            vec![("red".into(), 0), ("green".into(), 1)],
        )
        .unwrap();
    Type::enum_named("color")
}

#[test]
fn enum_member_resolves_to_representation() {
    let (mut cx, entry) = unit();
    let color = with_color(&mut cx);
    let result = resolve_token(&mut cx, &sym("green"), &wanting(entry, color.clone())).unwrap();
    assert_eq!(result.ty, color);
    assert_eq!(
        constant(&cx, &result),
        Constant::Struct(vec![Constant::Int { bits: 32, value: 1 }])
    );
}

#[test]
fn failed_enum_attempt_leaves_log_unchanged() {
    let (mut cx, entry) = unit();
    let color = with_color(&mut cx);
    let c = cx.declare_local("c", color.clone()).unwrap();

    let before = cx.checkpoint();
    let result = resolve_token(&mut cx, &sym("c"), &wanting(entry, color)).unwrap();
    assert_eq!(cx.diagnostics().len(), before.len());
    assert_eq!(result.address_of.map(|a| a.value), Some(c.storage));
}

#[test]
fn exhausted_strategies_report_only_the_last() {
    let (mut cx, entry) = unit();
    let color = with_color(&mut cx);
    let err = resolve_token(&mut cx, &sym("purple"), &wanting(entry, color)).unwrap_err();
    assert_eq!(err.kind, FormErrorKind::UnresolvedName("purple".into()));
    assert_eq!(cx.diagnostics().len(), 1);
}

#[test]
fn integers_are_not_enum_members() {
    let (mut cx, entry) = unit();
    let color = with_color(&mut cx);
    let result = resolve_token(&mut cx, &int("1"), &wanting(entry, color)).unwrap();
    assert_eq!(result.ty, Type::INT);
}
