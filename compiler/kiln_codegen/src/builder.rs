//! ID-based instruction builder.
//!
//! `IrBuilder` owns the unit's [`Module`] and an insertion point. All
//! emission goes through it; callers only hold `Copy` IDs.

use std::cell::Cell;

use kiln_types::Type;
use smallvec::SmallVec;

use crate::module::{Block, Constant, Function, GlobalDef, Instruction, Linkage, Module};
use crate::{BlockId, FunctionId, GlobalId, ValueData, ValueId, ValueKind};

/// Instruction builder positioned inside a routine.
pub struct IrBuilder {
    module: Module,
    /// Currently-active function (set by `position_at_end`).
    current_function: Option<FunctionId>,
    /// Currently-active basic block.
    current_block: Option<BlockId>,
    /// Count of instructions emitted with no insertion point.
    ///
    /// When > 0 the module is malformed: some instruction is not attached
    /// to any block.
    codegen_errors: Cell<u32>,
}

impl IrBuilder {
    /// Create a builder for an empty module.
    pub fn new(module_name: impl Into<String>) -> Self {
        IrBuilder {
            module: Module::new(module_name),
            current_function: None,
            current_block: None,
            codegen_errors: Cell::new(0),
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    /// Number of malformed emissions.
    pub fn codegen_error_count(&self) -> u32 {
        self.codegen_errors.get()
    }

    fn record_codegen_error(&self) {
        self.codegen_errors.set(self.codegen_errors.get() + 1);
    }

    // -----------------------------------------------------------------------
    // Functions and blocks
    // -----------------------------------------------------------------------

    /// Create a function with an `entry` block and position at its end.
    pub fn create_function(&mut self, name: impl Into<String>) -> FunctionId {
        let id = FunctionId::from_len(self.module.functions.len());
        self.module.functions.push(Function {
            name: name.into(),
            blocks: Vec::new(),
        });
        let entry = self.append_block(id, "entry");
        self.position_at_end(entry);
        id
    }

    /// Append a new empty block to `function`.
    pub fn append_block(&mut self, function: FunctionId, label: impl Into<String>) -> BlockId {
        let id = BlockId::from_len(self.module.blocks.len());
        self.module.blocks.push(Block {
            function,
            label: label.into(),
            instructions: Vec::new(),
        });
        self.module.functions[function.index()].blocks.push(id);
        id
    }

    /// Make `block` the insertion point.
    pub fn position_at_end(&mut self, block: BlockId) {
        self.current_function = Some(self.module.block(block).function);
        self.current_block = Some(block);
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn current_function(&self) -> Option<FunctionId> {
        self.current_function
    }

    // -----------------------------------------------------------------------
    // Constants and globals
    // -----------------------------------------------------------------------

    fn push_value(&mut self, kind: ValueKind, ty: Type, block: Option<BlockId>) -> ValueId {
        let id = ValueId::from_len(self.module.values.len());
        self.module.values.push(ValueData { kind, ty, block });
        id
    }

    /// Integer constant of `bits` width typed as `ty`.
    pub fn const_int(&mut self, ty: Type, bits: u32, value: i128) -> ValueId {
        self.push_value(ValueKind::Constant(Constant::Int { bits, value }), ty, None)
    }

    /// Floating-point constant; `constant` must already be a `Constant::Float`.
    pub fn const_float(&mut self, ty: Type, constant: Constant) -> ValueId {
        debug_assert!(matches!(constant, Constant::Float { .. }));
        self.push_value(ValueKind::Constant(constant), ty, None)
    }

    /// Struct constant.
    pub fn const_struct(&mut self, ty: Type, fields: Vec<Constant>) -> ValueId {
        self.push_value(ValueKind::Constant(Constant::Struct(fields)), ty, None)
    }

    /// Register a global. Returns `None` if the name is taken.
    pub fn add_global(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        linkage: Linkage,
        constant: bool,
        init: Option<Constant>,
    ) -> Option<GlobalId> {
        let name = name.into();
        if self.module.global_names.contains_key(&name) {
            return None;
        }
        let id = GlobalId::from_len(self.module.globals.len());
        let address = self.push_value(ValueKind::GlobalAddress(id), Type::pointer_to(ty.clone()), None);
        tracing::trace!(%name, %ty, "global registered");
        self.module.global_names.insert(name.clone(), id);
        self.module.globals.push(GlobalDef {
            name,
            ty,
            linkage,
            constant,
            init,
            address,
        });
        Some(id)
    }

    /// The value evaluating to a global's address.
    pub fn global_address(&self, global: GlobalId) -> ValueId {
        self.module.global(global).address
    }

    // -----------------------------------------------------------------------
    // Memory
    // -----------------------------------------------------------------------

    fn push_instruction(&mut self, inst: Instruction, ty: Type) -> ValueId {
        let block = self.current_block;
        let id = self.push_value(ValueKind::Instruction(inst), ty, block);
        match block {
            Some(block) => self.module.blocks[block.index()].instructions.push(id),
            None => {
                tracing::error!(value = id.raw(), "instruction emitted with no insertion point");
                self.record_codegen_error();
            }
        }
        id
    }

    /// Stack slot for one `ty`; yields a `(p ty)`.
    pub fn alloca(&mut self, ty: Type, name: &str) -> ValueId {
        let ptr_ty = Type::pointer_to(ty.clone());
        self.push_instruction(
            Instruction::Alloca {
                allocated: ty,
                name: name.to_owned(),
            },
            ptr_ty,
        )
    }

    /// Load through `ptr`; the result has `ptr`'s pointee type.
    ///
    /// Loading through a non-pointer records a codegen error and
    /// yields a `void`-typed value.
    pub fn load(&mut self, ptr: ValueId) -> ValueId {
        let ty = match self.module.type_of(ptr).pointee() {
            Some(pointee) => pointee.clone(),
            None => {
                tracing::error!(ty = %self.module.type_of(ptr), "load from non-pointer");
                self.record_codegen_error();
                Type::VOID
            }
        };
        tracing::trace!(ptr = ptr.raw(), %ty, "load");
        self.push_instruction(Instruction::Load { ptr }, ty)
    }

    /// Store `value` through `ptr`.
    pub fn store(&mut self, value: ValueId, ptr: ValueId) -> ValueId {
        if !self.module.type_of(ptr).is_pointer() {
            tracing::error!(ty = %self.module.type_of(ptr), "store to non-pointer");
            self.record_codegen_error();
        }
        tracing::trace!(value = value.raw(), ptr = ptr.raw(), "store");
        self.push_instruction(Instruction::Store { value, ptr }, Type::VOID)
    }

    /// Indexed address computation yielding a value of `result_ty`.
    pub fn gep(&mut self, ptr: ValueId, indices: &[u32], result_ty: Type) -> ValueId {
        tracing::trace!(ptr = ptr.raw(), ?indices, %result_ty, "gep");
        self.push_instruction(
            Instruction::Gep {
                ptr,
                indices: SmallVec::from_slice(indices),
            },
            result_ty,
        )
    }
}
