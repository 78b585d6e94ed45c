//! Type system for Kiln.
//!
//! - [`Type`]: the recursive type sum, compared structurally
//! - [`TargetDescriptor`]: platform widths, supplied once per unit
//! - [`TypeRegistry`]: struct and enum definitions, looked up by name
//! - [`LayoutCache`]: alignment/size/offset queries, memoized per unit
//!
//! # Architecture
//!
//! ```text
//! Type (by-name references to structs/enums)
//!     └── TypeRegistry (definitions: ordered fields, enum members)
//!     └── LayoutCache (measures through TargetDescriptor)
//! ```

mod layout;
mod registry;
mod target;
mod ty;

pub use layout::{LayoutCache, LayoutError};
pub use registry::{EnumDef, FieldDef, RegistryError, StructDef, TypeRegistry};
pub use target::{LongDoubleRepr, TargetDescriptor};
pub use ty::{PrimitiveKind, Type};
