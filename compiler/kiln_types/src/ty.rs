//! The `Type` sum type.
//!
//! Struct and enum types are nominal references into the
//! [`TypeRegistry`](crate::TypeRegistry); everything else is structural.
//! Equality and hashing are derived, so two types are equal exactly when
//! they have the same shape and the same names.

use std::fmt;

/// Built-in scalar kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    /// Native `int`; width comes from the target.
    Int,
    /// Native `uint`; width comes from the target.
    UInt,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Int128,
    UInt128,
    /// Pointer-sized signed integer.
    IntPtr,
    /// Pointer-sized unsigned integer; the type of layout queries.
    Size,
    /// Pointer-sized signed difference.
    PtrDiff,
    Float,
    Double,
    /// Extended precision; representation comes from the target.
    LongDouble,
}

impl PrimitiveKind {
    const ALL: [PrimitiveKind; 21] = [
        PrimitiveKind::Void,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::UInt,
        PrimitiveKind::Int8,
        PrimitiveKind::UInt8,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Int128,
        PrimitiveKind::UInt128,
        PrimitiveKind::IntPtr,
        PrimitiveKind::Size,
        PrimitiveKind::PtrDiff,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::LongDouble,
    ];

    /// Source-level name.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::UInt => "uint",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::UInt8 => "uint8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::UInt16 => "uint16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::UInt32 => "uint32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::UInt64 => "uint64",
            PrimitiveKind::Int128 => "int128",
            PrimitiveKind::UInt128 => "uint128",
            PrimitiveKind::IntPtr => "intptr",
            PrimitiveKind::Size => "size",
            PrimitiveKind::PtrDiff => "ptrdiff",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::LongDouble => "long-double",
        }
    }

    /// Look up a primitive by its source-level name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Integer-like kinds accept integer literals. `char` counts; `bool` does not.
    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            PrimitiveKind::Void
                | PrimitiveKind::Bool
                | PrimitiveKind::Float
                | PrimitiveKind::Double
                | PrimitiveKind::LongDouble
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Float | PrimitiveKind::Double | PrimitiveKind::LongDouble
        )
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Char
                | PrimitiveKind::Int
                | PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Int128
                | PrimitiveKind::IntPtr
                | PrimitiveKind::PtrDiff
        )
    }
}

/// A Kiln type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Primitive(PrimitiveKind),
    /// Pointer; `is_const` qualifies the pointee.
    Pointer { pointee: Box<Type>, is_const: bool },
    Array { element: Box<Type>, len: u64 },
    /// Named struct, fields live in the registry.
    Struct(String),
    /// Named enum, represented by a single-field struct of its underlying integer.
    Enum(String),
    /// Unresolved generic parameter.
    Param(String),
}

impl Type {
    pub const BOOL: Type = Type::Primitive(PrimitiveKind::Bool);
    pub const CHAR: Type = Type::Primitive(PrimitiveKind::Char);
    pub const INT: Type = Type::Primitive(PrimitiveKind::Int);
    pub const SIZE: Type = Type::Primitive(PrimitiveKind::Size);
    pub const FLOAT: Type = Type::Primitive(PrimitiveKind::Float);
    pub const DOUBLE: Type = Type::Primitive(PrimitiveKind::Double);
    pub const LONG_DOUBLE: Type = Type::Primitive(PrimitiveKind::LongDouble);
    pub const VOID: Type = Type::Primitive(PrimitiveKind::Void);

    /// `(p T)`
    pub fn pointer_to(pointee: Type) -> Type {
        Type::Pointer {
            pointee: Box::new(pointee),
            is_const: false,
        }
    }

    /// `(p (const T))`
    pub fn const_pointer_to(pointee: Type) -> Type {
        Type::Pointer {
            pointee: Box::new(pointee),
            is_const: true,
        }
    }

    /// `(array-of N T)`
    pub fn array_of(element: Type, len: u64) -> Type {
        Type::Array {
            element: Box::new(element),
            len,
        }
    }

    pub fn struct_named(name: impl Into<String>) -> Type {
        Type::Struct(name.into())
    }

    pub fn enum_named(name: impl Into<String>) -> Type {
        Type::Enum(name.into())
    }

    /// The primitive kind, if this is a primitive.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.primitive().is_some_and(PrimitiveKind::is_integer)
    }

    pub fn is_floating(&self) -> bool {
        self.primitive().is_some_and(PrimitiveKind::is_floating)
    }

    pub fn is_char(&self) -> bool {
        *self == Type::CHAR
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    /// What a pointer points at.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer { pointee, .. } => Some(pointee),
            _ => None,
        }
    }

    /// Element type of an array.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Name of the struct this type refers to, if any.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Type::Struct(name) => Some(name),
            _ => None,
        }
    }

    /// Name of the enum this type refers to, if any.
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            Type::Enum(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(kind) => f.write_str(kind.name()),
            Type::Pointer {
                pointee,
                is_const: false,
            } => write!(f, "(p {pointee})"),
            Type::Pointer {
                pointee,
                is_const: true,
            } => write!(f, "(p (const {pointee}))"),
            Type::Array { element, len } => write!(f, "(array-of {len} {element})"),
            Type::Struct(name) | Type::Enum(name) | Type::Param(name) => f.write_str(name),
        }
    }
}
