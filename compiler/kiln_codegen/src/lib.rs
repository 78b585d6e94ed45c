//! Target representation for Kiln code generation.
//!
//! Forms never touch instruction storage directly. They go through an
//! [`IrBuilder`] positioned at an insertion point and receive opaque
//! [`ValueId`] handles back:
//!
//! | Category | Methods |
//! |----------|---------|
//! | Constants | `const_int`, `const_float`, `const_struct` |
//! | Globals | `add_global`, `global_address` |
//! | Memory | `alloca`, `load`, `store`, `gep` |
//! | Blocks | `create_function`, `append_block`, `position_at_end` |
//!
//! The [`Interpreter`] executes straight-line code in a [`Module`] so the
//! effect of emitted loads and stores can be checked without a native
//! backend.

mod builder;
mod interp;
mod module;
mod printer;
mod value_id;

pub use builder::IrBuilder;
pub use interp::{InterpError, Interpreter, Pointer, Root, RtValue};
pub use module::{
    Block, Constant, FloatKind, Function, GlobalDef, Instruction, Linkage, Module, ValueData,
    ValueKind,
};
pub use value_id::{BlockId, FunctionId, GlobalId, ValueId};
