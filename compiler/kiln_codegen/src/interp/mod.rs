//! Reference interpreter for straight-line module code.
//!
//! Memory is modeled per root object (a stack slot or a global) as a tree
//! of [`RtValue`]s; a [`Pointer`] addresses a node in that tree by path.
//! Globals start out as their initializer. Stack slots and uninitialized
//! globals start with the shape of their type (arrays and structs as
//! aggregates of `Undef` leaves); addressing outside that shape fails.

use rustc_hash::FxHashMap;
use thiserror::Error;

use kiln_types::{Type, TypeRegistry};

use crate::module::{Constant, Instruction, Module, ValueKind};
use crate::{FunctionId, GlobalId, ValueId};

/// Object a pointer is derived from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Root {
    Stack(ValueId),
    Global(GlobalId),
}

/// An address: a root object and a path of element/field indices into it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Pointer {
    pub root: Root,
    pub path: Vec<u64>,
}

/// A runtime value.
#[derive(Clone, PartialEq, Debug)]
pub enum RtValue {
    Int(i128),
    Float(f64),
    Ptr(Pointer),
    Aggregate(Vec<RtValue>),
    Undef,
}

impl RtValue {
    pub fn as_int(&self) -> Option<i128> {
        match self {
            RtValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn from_constant(constant: &Constant) -> RtValue {
        match constant {
            Constant::Int { value, .. } => RtValue::Int(*value),
            Constant::Float { value, .. } => RtValue::Float(*value),
            Constant::Bytes(bytes) => {
                RtValue::Aggregate(bytes.iter().map(|&b| RtValue::Int(i128::from(b))).collect())
            }
            Constant::Struct(fields) => {
                RtValue::Aggregate(fields.iter().map(RtValue::from_constant).collect())
            }
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum InterpError {
    #[error("value %{0} used before it was computed")]
    Undefined(u32),
    #[error("value %{0} is not a pointer")]
    NotAPointer(u32),
    #[error("address steps outside its object")]
    OutOfObject,
    #[error("indexing into a scalar")]
    NotAggregate,
    #[error("no runtime shape for type `{0}`")]
    Unshaped(Type),
}

/// Largest array the interpreter will lay out element by element.
const MAX_SHAPED_ELEMENTS: u64 = 1 << 16;

/// Nesting limit for shaping by-value aggregates.
const MAX_SHAPE_DEPTH: u32 = 32;

/// Executes the instructions of a [`Module`].
pub struct Interpreter<'m> {
    module: &'m Module,
    types: &'m TypeRegistry,
    values: FxHashMap<ValueId, RtValue>,
    memory: FxHashMap<Root, RtValue>,
}

impl<'m> Interpreter<'m> {
    /// `types` supplies the field lists of the structs `module` names.
    pub fn new(module: &'m Module, types: &'m TypeRegistry) -> Self {
        Interpreter {
            module,
            types,
            values: FxHashMap::default(),
            memory: FxHashMap::default(),
        }
    }

    /// Run every block of `function` in order.
    pub fn run_function(&mut self, function: FunctionId) -> Result<(), InterpError> {
        let module = self.module;
        for &block in &module.function(function).blocks {
            for (id, inst) in module.instructions(block) {
                self.step(id, inst)?;
            }
        }
        Ok(())
    }

    /// The runtime value of `id`, evaluating constants and global
    /// addresses on demand.
    pub fn value(&self, id: ValueId) -> Result<RtValue, InterpError> {
        match &self.module.value(id).kind {
            ValueKind::Constant(c) => Ok(RtValue::from_constant(c)),
            ValueKind::GlobalAddress(g) => Ok(RtValue::Ptr(Pointer {
                root: Root::Global(*g),
                path: Vec::new(),
            })),
            ValueKind::Instruction(_) => self
                .values
                .get(&id)
                .cloned()
                .ok_or(InterpError::Undefined(id.raw())),
        }
    }

    /// Read the object `ptr` addresses.
    pub fn read(&self, ptr: &Pointer) -> Result<RtValue, InterpError> {
        let mut current = match self.memory.get(&ptr.root) {
            Some(v) => v.clone(),
            None => self.initial(ptr.root)?,
        };
        for &index in &ptr.path {
            current = match current {
                RtValue::Aggregate(mut items) => {
                    let i = usize::try_from(index).map_err(|_| InterpError::OutOfObject)?;
                    if i >= items.len() {
                        return Err(InterpError::OutOfObject);
                    }
                    items.swap_remove(i)
                }
                RtValue::Undef => RtValue::Undef,
                _ => return Err(InterpError::NotAggregate),
            };
        }
        Ok(current)
    }

    fn initial(&self, root: Root) -> Result<RtValue, InterpError> {
        match root {
            Root::Stack(_) => Ok(RtValue::Undef),
            Root::Global(g) => {
                let global = self.module.global(g);
                match &global.init {
                    Some(init) => Ok(RtValue::from_constant(init)),
                    None => self.shape(&global.ty, 0),
                }
            }
        }
    }

    /// Uninitialized memory laid out like `ty`.
    fn shape(&self, ty: &Type, depth: u32) -> Result<RtValue, InterpError> {
        let unshaped = || InterpError::Unshaped(ty.clone());
        if depth > MAX_SHAPE_DEPTH {
            return Err(unshaped());
        }
        match ty {
            Type::Array { element, len } => {
                if *len > MAX_SHAPED_ELEMENTS {
                    return Err(unshaped());
                }
                let element = self.shape(element, depth + 1)?;
                let len = usize::try_from(*len).map_err(|_| unshaped())?;
                Ok(RtValue::Aggregate(vec![element; len]))
            }
            Type::Struct(name) => {
                let fields = self
                    .types
                    .struct_def(name)
                    .and_then(|def| def.fields.as_deref())
                    .ok_or_else(unshaped)?;
                let items = fields
                    .iter()
                    .map(|field| self.shape(&field.ty, depth + 1))
                    .collect::<Result<_, _>>()?;
                Ok(RtValue::Aggregate(items))
            }
            Type::Enum(_) => Ok(RtValue::Aggregate(vec![RtValue::Undef])),
            _ => Ok(RtValue::Undef),
        }
    }

    fn write(&mut self, ptr: &Pointer, value: RtValue) -> Result<(), InterpError> {
        let initial = match self.memory.get(&ptr.root) {
            Some(_) => None,
            None => Some(self.initial(ptr.root)?),
        };
        let mut slot = self
            .memory
            .entry(ptr.root)
            .or_insert_with(|| initial.unwrap_or(RtValue::Undef));
        for &index in &ptr.path {
            let i = usize::try_from(index).map_err(|_| InterpError::OutOfObject)?;
            slot = match slot {
                RtValue::Aggregate(items) => items.get_mut(i).ok_or(InterpError::OutOfObject)?,
                RtValue::Undef => return Err(InterpError::OutOfObject),
                _ => return Err(InterpError::NotAggregate),
            };
        }
        *slot = value;
        Ok(())
    }

    fn pointer(&self, id: ValueId) -> Result<Pointer, InterpError> {
        match self.value(id)? {
            RtValue::Ptr(p) => Ok(p),
            _ => Err(InterpError::NotAPointer(id.raw())),
        }
    }

    fn step(&mut self, id: ValueId, inst: &Instruction) -> Result<(), InterpError> {
        let result = match inst {
            Instruction::Alloca { allocated, .. } => {
                let slot = self.shape(allocated, 0)?;
                self.memory.insert(Root::Stack(id), slot);
                RtValue::Ptr(Pointer {
                    root: Root::Stack(id),
                    path: Vec::new(),
                })
            }
            Instruction::Load { ptr } => {
                let ptr = self.pointer(*ptr)?;
                self.read(&ptr)?
            }
            Instruction::Store { value, ptr } => {
                let ptr = self.pointer(*ptr)?;
                let value = self.value(*value)?;
                self.write(&ptr, value)?;
                RtValue::Undef
            }
            Instruction::Gep { ptr, indices } => {
                let mut ptr = self.pointer(*ptr)?;
                let Some((&first, rest)) = indices.split_first() else {
                    return Err(InterpError::OutOfObject);
                };
                if first != 0 {
                    match ptr.path.last_mut() {
                        Some(last) => *last += u64::from(first),
                        None => return Err(InterpError::OutOfObject),
                    }
                }
                ptr.path.extend(rest.iter().map(|&i| u64::from(i)));
                RtValue::Ptr(ptr)
            }
        };
        tracing::trace!(value = id.raw(), ?result, "interp step");
        self.values.insert(id, result);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
