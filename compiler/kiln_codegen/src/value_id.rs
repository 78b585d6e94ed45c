//! Opaque ID newtypes for values, globals, blocks and functions.
//!
//! Each ID is a `u32` index into the corresponding arena `Vec` of a
//! [`Module`](crate::Module). IDs are `Copy` and only meaningful for the
//! module that issued them.

/// Opaque handle to a value (constant, global address or instruction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(u32);

/// Opaque handle to a global definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalId(u32);

/// Opaque handle to a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

/// Opaque handle to a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(u32);

macro_rules! impl_id {
    ($($id:ident),*) => {$(
        impl $id {
            /// The raw index.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }

            /// Next ID for an arena currently holding `len` entries.
            #[inline]
            pub(crate) fn from_len(len: usize) -> Self {
                debug_assert!(u32::try_from(len).is_ok(), "arena overflow");
                #[allow(clippy::cast_possible_truncation, reason = "checked above")]
                Self(len as u32)
            }
        }
    )*};
}

impl_id!(ValueId, GlobalId, BlockId, FunctionId);
