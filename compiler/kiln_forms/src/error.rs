//! Form failures.
//!
//! A [`FormError`] is only ever built by [`UnitContext::fail`], which
//! records the matching diagnostic first; the embedded [`ErrorGuaranteed`]
//! is the proof.
//!
//! [`UnitContext::fail`]: crate::UnitContext::fail

use kiln_diagnostic::{ErrorCode, ErrorGuaranteed};
use kiln_ir::{Span, TokenKind};
use kiln_types::{LayoutError, Type};

/// What went wrong, with the names and types involved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormErrorKind {
    /// Node of the wrong shape: a list where an atom is needed, wrong arity.
    #[error("expected {expected}, found {found}")]
    Structural { expected: String, found: String },
    #[error("expected {expected}, found {found}")]
    TokenCategory {
        expected: TokenKind,
        found: TokenKind,
    },
    #[error("`{0}` is not in scope")]
    UnresolvedName(String),
    #[error("invalid character literal `{0}`")]
    InvalidEscape(String),
    #[error("expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: Type, found: Type },
    #[error("{0}")]
    UnsupportedType(#[from] LayoutError),
    #[error("cannot construct a `{ty}` literal from `{text}`")]
    LiteralConstruction { ty: Type, text: String },
    #[error("`{0}` is not a struct")]
    NotAStruct(Type),
    #[error("struct `{strukt}` has no field `{field}`")]
    NoSuchField { strukt: String, field: String },
    #[error("`{0}` is not a pointer")]
    NotAPointer(Type),
    #[error("expression does not produce an assignable address")]
    NotAddressable,
    #[error("`{0}` is already defined")]
    Redefinition(String),
    #[error("unknown form `{0}`")]
    UnknownForm(String),
    #[error("unknown type `{0}`")]
    UnknownType(String),
}

impl FormErrorKind {
    /// Diagnostic code recorded for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            FormErrorKind::Structural { .. } => ErrorCode::E1001,
            FormErrorKind::TokenCategory { .. } => ErrorCode::E1002,
            FormErrorKind::UnknownForm(_) => ErrorCode::E1003,
            FormErrorKind::LiteralConstruction { .. } => ErrorCode::E0003,
            FormErrorKind::InvalidEscape(_) => ErrorCode::E0005,
            FormErrorKind::TypeMismatch { .. } | FormErrorKind::NotAPointer(_) => ErrorCode::E2001,
            FormErrorKind::UnknownType(_) => ErrorCode::E2002,
            FormErrorKind::UnresolvedName(_) => ErrorCode::E2003,
            FormErrorKind::Redefinition(_) => ErrorCode::E2006,
            FormErrorKind::UnsupportedType(_) => ErrorCode::E2019,
            FormErrorKind::NotAStruct(_) => ErrorCode::E2020,
            FormErrorKind::NoSuchField { .. } => ErrorCode::E2021,
            FormErrorKind::NotAddressable => ErrorCode::E2022,
        }
    }

    pub(crate) fn structural(expected: impl Into<String>, found: impl Into<String>) -> Self {
        FormErrorKind::Structural {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A recorded form failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct FormError {
    pub kind: FormErrorKind,
    pub span: Span,
    pub(crate) guarantee: ErrorGuaranteed,
}

impl FormError {
    /// Proof that the failure was recorded.
    pub fn guarantee(&self) -> ErrorGuaranteed {
        self.guarantee
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }
}
