//! Shared fixtures for form tests.

use kiln_codegen::{BlockId, Instruction};
use kiln_diagnostic::DiagnosticConfig;
use kiln_ir::SyntaxNode;
use kiln_types::{FieldDef, Type};

use crate::{resolve_node, FormRequest, FormResult, UnitConfig, UnitContext};

/// A unit with one open routine; returns its entry block.
pub(crate) fn unit() -> (UnitContext, BlockId) {
    crate::init_tracing();
    let mut cx = UnitConfig::new("test")
        .with_diagnostics(DiagnosticConfig::unlimited())
        .build();
    let entry = cx.enter_function("main");
    (cx, entry)
}

/// `unit()` with `point { x: int, y: int }` registered.
pub(crate) fn unit_with_point() -> (UnitContext, BlockId) {
    let (mut cx, entry) = unit();
    let defined = cx.types_mut().define_struct(
        "point",
        vec![FieldDef::new("x", Type::INT), FieldDef::new("y", Type::INT)],
    );
    assert!(defined.is_ok());
    (cx, entry)
}

pub(crate) fn point() -> Type {
    Type::struct_named("point")
}

pub(crate) fn sym(text: &str) -> SyntaxNode {
    SyntaxNode::symbol(text)
}

pub(crate) fn int(text: &str) -> SyntaxNode {
    SyntaxNode::int(text)
}

pub(crate) fn list<const N: usize>(items: [SyntaxNode; N]) -> SyntaxNode {
    SyntaxNode::list(items.into())
}

/// Evaluate `node` for its value.
pub(crate) fn eval(cx: &mut UnitContext, block: BlockId, node: &SyntaxNode) -> FormResult {
    resolve_node(cx, node, &FormRequest::value(block))
}

pub(crate) fn loads(cx: &UnitContext, block: BlockId) -> usize {
    cx.module().count_instructions(block, Instruction::is_load)
}

pub(crate) fn stores(cx: &UnitContext, block: BlockId) -> usize {
    cx.module().count_instructions(block, Instruction::is_store)
}
