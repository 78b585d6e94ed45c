//! Layout queries: alignment, size and field offsets.
//!
//! Queries resolve through pointer, array, struct and enum indirection to
//! the concrete representation, then measure it with the unit's
//! [`TargetDescriptor`]. Results for complete types are memoized by type;
//! failures are not cached, so a struct completed later measures fine.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{TargetDescriptor, Type, TypeRegistry};

/// Why a type cannot be measured.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("type `{0}` is declared but has no definition")]
    Incomplete(Type),
    #[error("type `{0}` has unresolved generic parameters")]
    Generic(Type),
    #[error("type `{0}` has no size")]
    Unsized(Type),
    #[error("type `{0}` is not defined")]
    Unknown(Type),
    #[error("type `{0}` contains itself")]
    Recursive(Type),
    #[error("type `{0}` is too large to measure")]
    TooLarge(Type),
}

/// Per-unit memo of layout results.
#[derive(Clone, Debug, Default)]
pub struct LayoutCache {
    align: FxHashMap<Type, u64>,
    size: FxHashMap<Type, u64>,
    /// Types currently being measured (cycle detection).
    computing: FxHashSet<Type>,
}

/// Field types of a measurable aggregate, or the scalar it reduces to.
enum Repr<'a> {
    Scalar { size: u64, align: u64 },
    Array { element: &'a Type, len: u64 },
    Fields(Vec<&'a Type>),
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alignment of `ty` in bytes.
    pub fn alignment_of(
        &mut self,
        ty: &Type,
        types: &TypeRegistry,
        target: &TargetDescriptor,
    ) -> Result<u64, LayoutError> {
        if let Some(&align) = self.align.get(ty) {
            return Ok(align);
        }
        self.enter(ty)?;
        let result = self.compute_alignment(ty, types, target);
        self.computing.remove(ty);
        let align = result?;
        tracing::trace!(%ty, align, "alignment computed");
        self.align.insert(ty.clone(), align);
        Ok(align)
    }

    /// Size of `ty` in bytes, including trailing padding.
    pub fn size_of(
        &mut self,
        ty: &Type,
        types: &TypeRegistry,
        target: &TargetDescriptor,
    ) -> Result<u64, LayoutError> {
        if let Some(&size) = self.size.get(ty) {
            return Ok(size);
        }
        self.enter(ty)?;
        let result = self.compute_size(ty, types, target);
        self.computing.remove(ty);
        let size = result?;
        tracing::trace!(%ty, size, "size computed");
        self.size.insert(ty.clone(), size);
        Ok(size)
    }

    /// Byte offset of the field at `index` within struct `ty`.
    pub fn field_offset(
        &mut self,
        ty: &Type,
        index: usize,
        types: &TypeRegistry,
        target: &TargetDescriptor,
    ) -> Result<u64, LayoutError> {
        let Repr::Fields(fields) = repr(ty, types, target)? else {
            return Err(LayoutError::Unknown(ty.clone()));
        };
        let too_large = || LayoutError::TooLarge(ty.clone());
        let mut offset: u64 = 0;
        for (i, field) in fields.into_iter().enumerate() {
            let align = self.alignment_of(field, types, target)?;
            offset = offset.checked_next_multiple_of(align).ok_or_else(too_large)?;
            if i == index {
                return Ok(offset);
            }
            let size = self.size_of(field, types, target)?;
            offset = offset.checked_add(size).ok_or_else(too_large)?;
        }
        Err(LayoutError::Unknown(ty.clone()))
    }

    fn enter(&mut self, ty: &Type) -> Result<(), LayoutError> {
        if self.computing.insert(ty.clone()) {
            Ok(())
        } else {
            tracing::warn!(%ty, "recursive type in layout query");
            Err(LayoutError::Recursive(ty.clone()))
        }
    }

    fn compute_alignment(
        &mut self,
        ty: &Type,
        types: &TypeRegistry,
        target: &TargetDescriptor,
    ) -> Result<u64, LayoutError> {
        match repr(ty, types, target)? {
            Repr::Scalar { align, .. } => Ok(align),
            Repr::Array { element, .. } => self.alignment_of(element, types, target),
            Repr::Fields(fields) => {
                let mut align: u64 = 1;
                for field in fields {
                    align = align.max(self.alignment_of(field, types, target)?);
                }
                Ok(align)
            }
        }
    }

    fn compute_size(
        &mut self,
        ty: &Type,
        types: &TypeRegistry,
        target: &TargetDescriptor,
    ) -> Result<u64, LayoutError> {
        let too_large = || LayoutError::TooLarge(ty.clone());
        match repr(ty, types, target)? {
            Repr::Scalar { size, .. } => Ok(size),
            Repr::Array { element, len } => self
                .size_of(element, types, target)?
                .checked_mul(len)
                .ok_or_else(too_large),
            Repr::Fields(fields) => {
                let mut offset: u64 = 0;
                let mut struct_align: u64 = 1;
                for field in fields {
                    let align = self.alignment_of(field, types, target)?;
                    struct_align = struct_align.max(align);
                    let size = self.size_of(field, types, target)?;
                    offset = offset
                        .checked_next_multiple_of(align)
                        .and_then(|start| start.checked_add(size))
                        .ok_or_else(too_large)?;
                }
                offset
                    .checked_next_multiple_of(struct_align)
                    .ok_or_else(too_large)
            }
        }
    }
}

/// Reduce a type to what layout actually measures.
fn repr<'a>(
    ty: &'a Type,
    types: &'a TypeRegistry,
    target: &TargetDescriptor,
) -> Result<Repr<'a>, LayoutError> {
    match ty {
        Type::Primitive(kind) => {
            match (target.scalar_size(*kind), target.scalar_align(*kind)) {
                (Some(size), Some(align)) => Ok(Repr::Scalar { size, align }),
                _ => Err(LayoutError::Unsized(ty.clone())),
            }
        }
        Type::Pointer { .. } => Ok(Repr::Scalar {
            size: target.pointer_bytes(),
            align: target.pointer_bytes().min(target.max_scalar_align),
        }),
        Type::Array { element, len } => Ok(Repr::Array { element, len: *len }),
        Type::Struct(name) => {
            let def = types
                .struct_def(name)
                .ok_or_else(|| LayoutError::Unknown(ty.clone()))?;
            if def.is_generic() {
                return Err(LayoutError::Generic(ty.clone()));
            }
            let fields = def
                .fields
                .as_deref()
                .ok_or_else(|| LayoutError::Incomplete(ty.clone()))?;
            Ok(Repr::Fields(fields.iter().map(|field| &field.ty).collect()))
        }
        Type::Enum(name) => {
            let def = types
                .enum_def(name)
                .ok_or_else(|| LayoutError::Unknown(ty.clone()))?;
            let size = target
                .scalar_size(def.underlying)
                .ok_or_else(|| LayoutError::Unsized(ty.clone()))?;
            let align = target
                .scalar_align(def.underlying)
                .ok_or_else(|| LayoutError::Unsized(ty.clone()))?;
            Ok(Repr::Scalar { size, align })
        }
        Type::Param(_) => Err(LayoutError::Generic(ty.clone())),
    }
}
