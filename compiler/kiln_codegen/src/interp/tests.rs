#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use kiln_types::{FieldDef, Type, TypeRegistry};
use pretty_assertions::assert_eq;

use super::*;
use crate::{IrBuilder, Linkage};

fn point_types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types
        .define_struct(
            "point",
            vec![FieldDef::new("x", Type::INT), FieldDef::new("y", Type::INT)],
        )
        .unwrap();
    types
}

#[test]
fn store_then_load_reads_back() {
    let mut b = IrBuilder::new("t");
    let f = b.create_function("main");
    let slot = b.alloca(Type::INT, "x");
    let five = b.const_int(Type::INT, 32, 5);
    b.store(five, slot);
    let loaded = b.load(slot);
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    interp.run_function(f).unwrap();
    assert_eq!(interp.value(loaded).unwrap(), RtValue::Int(5));
}

#[test]
fn load_of_fresh_slot_is_undef() {
    let mut b = IrBuilder::new("t");
    let f = b.create_function("main");
    let slot = b.alloca(Type::INT, "x");
    let loaded = b.load(slot);
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    interp.run_function(f).unwrap();
    assert_eq!(interp.value(loaded).unwrap(), RtValue::Undef);
}

#[test]
fn gep_into_global_string() {
    let mut b = IrBuilder::new("t");
    let g = b
        .add_global(
            "s",
            Type::array_of(Type::CHAR, 3),
            Linkage::Internal,
            true,
            Some(Constant::Bytes(b"ab\0".to_vec())),
        )
        .unwrap();
    let f = b.create_function("main");
    let addr = b.global_address(g);
    let first = b.gep(addr, &[0, 0], Type::pointer_to(Type::CHAR));
    let second = b.gep(first, &[1], Type::pointer_to(Type::CHAR));
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    interp.run_function(f).unwrap();
    let RtValue::Ptr(p) = interp.value(second).unwrap() else {
        panic!("expected pointer");
    };
    assert_eq!(p.path, vec![1]);
    assert_eq!(interp.read(&p).unwrap(), RtValue::Int(i128::from(b'b')));
}

#[test]
fn field_store_leaves_siblings_untouched() {
    let mut b = IrBuilder::new("t");
    let g = b
        .add_global(
            "pt",
            Type::struct_named("point"),
            Linkage::Internal,
            false,
            Some(Constant::Struct(vec![
                Constant::Int { bits: 32, value: 1 },
                Constant::Int { bits: 32, value: 2 },
            ])),
        )
        .unwrap();
    let f = b.create_function("main");
    let addr = b.global_address(g);
    let y = b.gep(addr, &[0, 1], Type::pointer_to(Type::INT));
    let nine = b.const_int(Type::INT, 32, 9);
    b.store(nine, y);
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    interp.run_function(f).unwrap();
    let whole = interp
        .read(&Pointer {
            root: Root::Global(g),
            path: Vec::new(),
        })
        .unwrap();
    assert_eq!(
        whole,
        RtValue::Aggregate(vec![RtValue::Int(1), RtValue::Int(9)])
    );
}

#[test]
fn load_through_non_pointer_fails() {
    let mut b = IrBuilder::new("t");
    let f = b.create_function("main");
    let c = b.const_int(Type::INT, 32, 3);
    b.load(c);
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    assert_eq!(interp.run_function(f), Err(InterpError::NotAPointer(c.raw())));
}

#[test]
fn local_struct_field_store() {
    let mut b = IrBuilder::new("t");
    let f = b.create_function("main");
    let slot = b.alloca(Type::struct_named("point"), "pt");
    let y = b.gep(slot, &[0, 1], Type::pointer_to(Type::INT));
    let seven = b.const_int(Type::INT, 32, 7);
    b.store(seven, y);
    let whole = b.load(slot);
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    interp.run_function(f).unwrap();
    assert_eq!(
        interp.value(whole).unwrap(),
        RtValue::Aggregate(vec![RtValue::Undef, RtValue::Int(7)])
    );
}

#[test]
fn store_outside_array_fails() {
    let mut b = IrBuilder::new("t");
    let f = b.create_function("main");
    let slot = b.alloca(Type::array_of(Type::INT, 2), "xs");
    let past_end = b.gep(slot, &[0, 2], Type::pointer_to(Type::INT));
    let one = b.const_int(Type::INT, 32, 1);
    b.store(one, past_end);
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    assert_eq!(interp.run_function(f), Err(InterpError::OutOfObject));
}

#[test]
fn store_into_scalar_slot_field_fails() {
    let mut b = IrBuilder::new("t");
    let f = b.create_function("main");
    let slot = b.alloca(Type::INT, "x");
    let field = b.gep(slot, &[0, 0], Type::pointer_to(Type::INT));
    let one = b.const_int(Type::INT, 32, 1);
    b.store(one, field);
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    assert_eq!(interp.run_function(f), Err(InterpError::OutOfObject));
}

#[test]
fn slot_of_unknown_struct_is_unshaped() {
    let mut b = IrBuilder::new("t");
    let f = b.create_function("main");
    b.alloca(Type::struct_named("ghost"), "g");
    let module = b.into_module();

    let types = point_types();
    let mut interp = Interpreter::new(&module, &types);
    assert_eq!(
        interp.run_function(f),
        Err(InterpError::Unshaped(Type::struct_named("ghost")))
    );
}
