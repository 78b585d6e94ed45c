//! Textual dump of a [`Module`], loosely modeled on LLVM assembly.

use std::fmt;

use crate::module::{Constant, Instruction, Linkage, Module, ValueKind};
use crate::ValueId;

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int { bits, value } => write!(f, "i{bits} {value}"),
            Constant::Float { value, .. } => write!(f, "{value:?}"),
            Constant::Bytes(bytes) => {
                f.write_str("c\"")?;
                for &b in bytes {
                    if (b.is_ascii_graphic() && b != b'"' && b != b'\\') || b == b' ' {
                        write!(f, "{}", char::from(b))?;
                    } else {
                        write!(f, "\\{b:02X}")?;
                    }
                }
                f.write_str("\"")
            }
            Constant::Struct(fields) => {
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

struct Operand<'m>(&'m Module, ValueId);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Operand(module, id) = *self;
        match &module.value(id).kind {
            ValueKind::Constant(c) => write!(f, "{c}"),
            ValueKind::GlobalAddress(g) => write!(f, "@{}", module.global(*g).name),
            ValueKind::Instruction(_) => write!(f, "%{}", id.raw()),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for (_, global) in self.globals() {
            let linkage = match global.linkage {
                Linkage::Internal => "internal",
                Linkage::External => "external",
            };
            let kind = if global.constant { "constant" } else { "global" };
            write!(f, "@{} = {linkage} {kind} {}", global.name, global.ty)?;
            if let Some(init) = &global.init {
                write!(f, " {init}")?;
            }
            writeln!(f)?;
        }
        for (_, function) in self.functions() {
            writeln!(f, "define {} {{", function.name)?;
            for &block in &function.blocks {
                writeln!(f, "{}:", self.block(block).label)?;
                for (id, inst) in self.instructions(block) {
                    let ty = self.type_of(id);
                    match inst {
                        Instruction::Alloca { allocated, name } => {
                            writeln!(f, "  %{} = alloca {allocated} ; {name}", id.raw())?;
                        }
                        Instruction::Load { ptr } => {
                            writeln!(f, "  %{} = load {ty}, {}", id.raw(), Operand(self, *ptr))?;
                        }
                        Instruction::Store { value, ptr } => {
                            writeln!(
                                f,
                                "  store {}, {}",
                                Operand(self, *value),
                                Operand(self, *ptr)
                            )?;
                        }
                        Instruction::Gep { ptr, indices } => {
                            write!(f, "  %{} = gep {ty}, {}", id.raw(), Operand(self, *ptr))?;
                            for index in indices {
                                write!(f, ", {index}")?;
                            }
                            writeln!(f)?;
                        }
                    }
                }
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}
