//! Outcome of evaluating a form.

use kiln_codegen::{BlockId, ValueId};
use kiln_types::Type;

use crate::FormError;

/// Result type of every form.
pub type FormResult = Result<ValueResult, FormError>;

/// Recoverable storage behind a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressOf {
    pub value: ValueId,
    /// Pointer type of `value`. For a decayed array this is the pointer to
    /// the whole array, not to its first element.
    pub ty: Type,
}

/// A typed value produced by a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueResult {
    /// Block the value is available in.
    pub block: BlockId,
    pub value: ValueId,
    pub ty: Type,
    /// Present iff the value is an lvalue.
    pub address_of: Option<AddressOf>,
}

impl ValueResult {
    pub fn new(block: BlockId, value: ValueId, ty: Type) -> Self {
        ValueResult {
            block,
            value,
            ty,
            address_of: None,
        }
    }

    /// Mark the value as an lvalue stored at `value` of pointer type `ty`.
    #[must_use]
    pub fn with_address(mut self, value: ValueId, ty: Type) -> Self {
        self.address_of = Some(AddressOf { value, ty });
        self
    }

    pub fn is_lvalue(&self) -> bool {
        self.address_of.is_some()
    }
}
