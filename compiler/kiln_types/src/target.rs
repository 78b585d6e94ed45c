//! Platform description supplied at unit-compile time.
//!
//! Every width the engine needs comes from here, so the forms themselves
//! never assume a platform.

use crate::PrimitiveKind;

/// Storage of `long-double` on the target.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LongDoubleRepr {
    /// x87 80-bit extended precision, padded to `storage_bytes`.
    X87Extended { storage_bytes: u64, align: u64 },
    /// IEEE 754 binary128.
    IeeeQuad,
    /// Same as `double`.
    Double,
}

/// Native widths of the compilation target.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TargetDescriptor {
    /// Short name, for diagnostics and logs.
    pub name: &'static str,
    /// Width of `int`/`uint` in bits.
    pub native_int_bits: u32,
    /// Width of pointers (and `size`/`intptr`/`ptrdiff`) in bits.
    pub pointer_bits: u32,
    pub long_double: LongDoubleRepr,
    /// Upper bound on scalar alignment in bytes.
    pub max_scalar_align: u64,
}

impl Default for TargetDescriptor {
    fn default() -> Self {
        Self::x86_64()
    }
}

impl TargetDescriptor {
    pub fn x86_64() -> Self {
        TargetDescriptor {
            name: "x86_64",
            native_int_bits: 32,
            pointer_bits: 64,
            long_double: LongDoubleRepr::X87Extended {
                storage_bytes: 16,
                align: 16,
            },
            max_scalar_align: 16,
        }
    }

    pub fn i686() -> Self {
        TargetDescriptor {
            name: "i686",
            native_int_bits: 32,
            pointer_bits: 32,
            long_double: LongDoubleRepr::X87Extended {
                storage_bytes: 12,
                align: 4,
            },
            max_scalar_align: 4,
        }
    }

    pub fn aarch64() -> Self {
        TargetDescriptor {
            name: "aarch64",
            native_int_bits: 32,
            pointer_bits: 64,
            long_double: LongDoubleRepr::IeeeQuad,
            max_scalar_align: 16,
        }
    }

    /// Pointer size in bytes.
    pub fn pointer_bytes(&self) -> u64 {
        u64::from(self.pointer_bits / 8)
    }

    /// Value width in bits of a scalar kind; `None` for `void`.
    pub fn bit_width(&self, kind: PrimitiveKind) -> Option<u32> {
        let bits = match kind {
            PrimitiveKind::Void => return None,
            PrimitiveKind::Bool => 1,
            PrimitiveKind::Char | PrimitiveKind::Int8 | PrimitiveKind::UInt8 => 8,
            PrimitiveKind::Int16 | PrimitiveKind::UInt16 => 16,
            PrimitiveKind::Int32 | PrimitiveKind::UInt32 | PrimitiveKind::Float => 32,
            PrimitiveKind::Int64 | PrimitiveKind::UInt64 | PrimitiveKind::Double => 64,
            PrimitiveKind::Int128 | PrimitiveKind::UInt128 => 128,
            PrimitiveKind::Int | PrimitiveKind::UInt => self.native_int_bits,
            PrimitiveKind::IntPtr | PrimitiveKind::Size | PrimitiveKind::PtrDiff => {
                self.pointer_bits
            }
            PrimitiveKind::LongDouble => match self.long_double {
                LongDoubleRepr::X87Extended { .. } => 80,
                LongDoubleRepr::IeeeQuad => 128,
                LongDoubleRepr::Double => 64,
            },
        };
        Some(bits)
    }

    /// Storage size in bytes of a scalar kind; `None` for `void`.
    pub fn scalar_size(&self, kind: PrimitiveKind) -> Option<u64> {
        match (kind, self.long_double) {
            (PrimitiveKind::Void, _) => None,
            (PrimitiveKind::Bool, _) => Some(1),
            (PrimitiveKind::LongDouble, LongDoubleRepr::X87Extended { storage_bytes, .. }) => {
                Some(storage_bytes)
            }
            _ => self.bit_width(kind).map(|bits| u64::from(bits.div_ceil(8))),
        }
    }

    /// Alignment in bytes of a scalar kind; `None` for `void`.
    pub fn scalar_align(&self, kind: PrimitiveKind) -> Option<u64> {
        if let (PrimitiveKind::LongDouble, LongDoubleRepr::X87Extended { align, .. }) =
            (kind, self.long_double)
        {
            return Some(align);
        }
        self.scalar_size(kind)
            .map(|size| size.min(self.max_scalar_align))
    }
}
