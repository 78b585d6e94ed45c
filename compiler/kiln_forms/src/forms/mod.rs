//! Form dispatch and the contracts shared by every form.
//!
//! An atom goes to the token engine. A list is looked up by its head symbol
//! in the unit's [`FormTable`]; `(core name ...)` strips the prefix and sets
//! [`FormRequest::prefixed_with_core`].

mod address;
mod enum_literal;
mod field;
mod layout;
mod setf;
pub mod token;
mod type_name;

use std::fmt;

use kiln_codegen::{BlockId, ValueId};
use kiln_ir::SyntaxNode;
use kiln_types::Type;
use rustc_hash::FxHashMap;

use crate::{FormErrorKind, FormResult, UnitContext, ValueResult};

pub use field::resolve_field;
pub use setf::assign;
pub use token::{resolve_token, translate_string_literal};
pub use type_name::parse_type;

/// How the caller wants a form evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormRequest {
    /// Insertion point; instructions are appended to this block.
    pub block: BlockId,
    /// Produce the address of the result rather than its value.
    pub get_address: bool,
    /// The form was written `(core name ...)`.
    pub prefixed_with_core: bool,
    /// Contextual type hint for literals.
    pub wanted: Option<Type>,
}

impl FormRequest {
    /// A plain value request with no type hint.
    pub fn value(block: BlockId) -> Self {
        FormRequest {
            block,
            get_address: false,
            prefixed_with_core: false,
            wanted: None,
        }
    }

    /// An address request.
    pub fn address(block: BlockId) -> Self {
        FormRequest {
            get_address: true,
            ..Self::value(block)
        }
    }

    #[must_use]
    pub fn wanting(mut self, ty: Type) -> Self {
        self.wanted = Some(ty);
        self
    }

    /// Request for a sub-form at the same insertion point, with no hint.
    pub(crate) fn nested(&self, get_address: bool) -> Self {
        FormRequest {
            block: self.block,
            get_address,
            prefixed_with_core: false,
            wanted: None,
        }
    }
}

/// Uniform form signature: the whole list node and its arguments (head
/// excluded).
pub type FormFn = fn(&mut UnitContext, &SyntaxNode, &[SyntaxNode], &FormRequest) -> FormResult;

/// Forms available to list dispatch, keyed by head symbol.
#[derive(Clone, Default)]
pub struct FormTable {
    forms: FxHashMap<&'static str, FormFn>,
}

impl fmt::Debug for FormTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.forms.keys().collect();
        names.sort_unstable();
        f.debug_struct("FormTable").field("forms", &names).finish()
    }
}

impl FormTable {
    /// The built-in forms.
    pub fn core() -> Self {
        let mut table = FormTable::default();
        table.register(":", field::form);
        table.register("setf", setf::form);
        table.register("#", address::address_of);
        table.register("@", address::dereference);
        table.register("alignmentof", layout::alignmentof);
        table.register("sizeof", layout::sizeof);
        table.register("offsetof", layout::offsetof);
        table
    }

    /// Add or replace a form.
    pub fn register(&mut self, name: &'static str, form: FormFn) {
        self.forms.insert(name, form);
    }

    pub fn get(&self, name: &str) -> Option<FormFn> {
        self.forms.get(name).copied()
    }
}

/// Evaluate any node.
#[tracing::instrument(level = "debug", skip_all, fields(node = node.describe()))]
pub fn resolve_node(cx: &mut UnitContext, node: &SyntaxNode, req: &FormRequest) -> FormResult {
    cx.builder.position_at_end(req.block);
    let Some(items) = node.as_list() else {
        return resolve_token(cx, node, req);
    };
    let Some(head) = node.head_symbol() else {
        let found = items.first().map_or("empty list", SyntaxNode::describe);
        return Err(cx.fail(FormErrorKind::structural("form name", found), node.span()));
    };
    let (name, args, core) = if head == "core" {
        match items.get(1).and_then(SyntaxNode::as_symbol) {
            Some(name) => (name, &items[2..], true),
            None => {
                return Err(cx.fail(
                    FormErrorKind::structural("form name after `core`", "nothing usable"),
                    node.span(),
                ))
            }
        }
    } else {
        (head, &items[1..], false)
    };
    let Some(form) = cx.forms.get(name) else {
        return Err(cx.fail(FormErrorKind::UnknownForm(name.to_owned()), node.span()));
    };
    let req = FormRequest {
        prefixed_with_core: core,
        ..req.clone()
    };
    form(cx, node, args, &req)
}

/// Fail unless `args` has exactly `expected` elements.
pub(crate) fn expect_arity(
    cx: &mut UnitContext,
    node: &SyntaxNode,
    args: &[SyntaxNode],
    expected: usize,
) -> Result<(), crate::FormError> {
    if args.len() == expected {
        return Ok(());
    }
    let plural = if expected == 1 { "" } else { "s" };
    Err(cx.fail(
        FormErrorKind::structural(
            format!("{expected} argument{plural}"),
            args.len().to_string(),
        ),
        node.span(),
    ))
}

/// Produce the result for storage at `addr` holding a `pointee`.
///
/// Address mode returns `addr` itself. Otherwise arrays decay to a pointer
/// to element 0 (keeping the whole-array address as the lvalue) and
/// anything else is loaded.
pub(crate) fn from_address(
    cx: &mut UnitContext,
    addr: ValueId,
    pointee: Type,
    req: &FormRequest,
) -> ValueResult {
    let addr_ty = Type::pointer_to(pointee.clone());
    if req.get_address {
        return ValueResult::new(req.block, addr, addr_ty);
    }
    if let Some(element) = pointee.element() {
        let decayed_ty = Type::pointer_to(element.clone());
        let decayed = cx.builder.gep(addr, &[0, 0], decayed_ty.clone());
        return ValueResult::new(req.block, decayed, decayed_ty).with_address(addr, addr_ty);
    }
    let loaded = cx.builder.load(addr);
    ValueResult::new(req.block, loaded, pointee).with_address(addr, addr_ty)
}
