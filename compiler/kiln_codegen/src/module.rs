//! Instruction storage: values, globals, functions and blocks.

use kiln_types::Type;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{BlockId, FunctionId, GlobalId, ValueId};

/// Precision of a floating-point constant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FloatKind {
    Single,
    Double,
    Extended,
}

/// A constant in the target representation.
#[derive(Clone, PartialEq, Debug)]
pub enum Constant {
    /// Integer of `bits` width; `value` is the mathematical value.
    Int { bits: u32, value: i128 },
    /// Floating-point value, already rounded to `kind`'s precision.
    Float { kind: FloatKind, value: f64 },
    /// Byte array, e.g. a translated string literal with its terminator.
    Bytes(Vec<u8>),
    /// Struct value with one constant per field.
    Struct(Vec<Constant>),
}

/// Symbol visibility of a global.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Linkage {
    /// Visible only inside the unit.
    Internal,
    /// Visible to other units at link time.
    External,
}

/// A module-level variable.
#[derive(Clone, PartialEq, Debug)]
pub struct GlobalDef {
    pub name: String,
    /// Type of the stored object (not of its address).
    pub ty: Type,
    pub linkage: Linkage,
    /// Immutable after initialization.
    pub constant: bool,
    pub init: Option<Constant>,
    /// The value that evaluates to this global's address.
    pub address: ValueId,
}

/// A memory or address instruction.
#[derive(Clone, PartialEq, Debug)]
pub enum Instruction {
    /// Stack slot for one object of `allocated` type.
    Alloca { allocated: Type, name: String },
    /// Read the object `ptr` points at.
    Load { ptr: ValueId },
    /// Write `value` into the object `ptr` points at.
    Store { value: ValueId, ptr: ValueId },
    /// Indexed address computation: the first index steps over whole
    /// pointees, each following index selects an element or field.
    Gep {
        ptr: ValueId,
        indices: SmallVec<[u32; 2]>,
    },
}

impl Instruction {
    pub fn is_load(&self) -> bool {
        matches!(self, Instruction::Load { .. })
    }

    pub fn is_store(&self) -> bool {
        matches!(self, Instruction::Store { .. })
    }
}

/// What a value is.
#[derive(Clone, PartialEq, Debug)]
pub enum ValueKind {
    Constant(Constant),
    GlobalAddress(GlobalId),
    Instruction(Instruction),
}

/// A value and its language-level type.
#[derive(Clone, PartialEq, Debug)]
pub struct ValueData {
    pub kind: ValueKind,
    pub ty: Type,
    /// Block the instruction was placed in; `None` for constants and globals.
    pub block: Option<BlockId>,
}

/// A basic block: instructions in emission order.
#[derive(Clone, PartialEq, Debug)]
pub struct Block {
    pub function: FunctionId,
    pub label: String,
    pub instructions: Vec<ValueId>,
}

/// A routine under construction.
#[derive(Clone, PartialEq, Debug)]
pub struct Function {
    pub name: String,
    pub blocks: Vec<BlockId>,
}

/// The output of one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub name: String,
    pub(crate) values: Vec<ValueData>,
    pub(crate) globals: Vec<GlobalDef>,
    pub(crate) global_names: FxHashMap<String, GlobalId>,
    pub(crate) functions: Vec<Function>,
    pub(crate) blocks: Vec<Block>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Data of a value.
    pub fn value(&self, id: ValueId) -> &ValueData {
        debug_assert!(
            id.index() < self.values.len(),
            "ValueId {} out of bounds (module has {} values)",
            id.raw(),
            self.values.len()
        );
        &self.values[id.index()]
    }

    /// Language-level type of a value.
    pub fn type_of(&self, id: ValueId) -> &Type {
        &self.value(id).ty
    }

    /// The instruction behind a value, if it is one.
    pub fn instruction(&self, id: ValueId) -> Option<&Instruction> {
        match &self.value(id).kind {
            ValueKind::Instruction(inst) => Some(inst),
            _ => None,
        }
    }

    /// The constant behind a value, if it is one.
    pub fn constant(&self, id: ValueId) -> Option<&Constant> {
        match &self.value(id).kind {
            ValueKind::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn global(&self, id: GlobalId) -> &GlobalDef {
        &self.globals[id.index()]
    }

    pub fn global_by_name(&self, name: &str) -> Option<GlobalId> {
        self.global_names.get(name).copied()
    }

    pub fn globals(&self) -> impl Iterator<Item = (GlobalId, &GlobalDef)> {
        self.globals
            .iter()
            .enumerate()
            .map(|(i, g)| (GlobalId::from_len(i), g))
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FunctionId::from_len(i), f))
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Instructions of a block in emission order.
    pub fn instructions(&self, block: BlockId) -> impl Iterator<Item = (ValueId, &Instruction)> {
        self.block(block)
            .instructions
            .iter()
            .filter_map(|&id| self.instruction(id).map(|inst| (id, inst)))
    }

    /// Number of instructions in `block` matching `pred`.
    pub fn count_instructions(&self, block: BlockId, pred: impl Fn(&Instruction) -> bool) -> usize {
        self.instructions(block).filter(|(_, inst)| pred(inst)).count()
    }
}
