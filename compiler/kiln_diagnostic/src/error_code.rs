use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Literal errors
/// - E1xxx: Form-shape errors
/// - E2xxx: Name and type errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Literal Errors (E0xxx)
    /// Literal cannot be constructed at the wanted type
    E0003,
    /// Invalid character literal
    E0005,

    // Form Errors (E1xxx)
    /// Unexpected element (list where an atom is required, wrong arity)
    E1001,
    /// Token of the wrong category
    E1002,
    /// Unknown form name
    E1003,

    // Name and Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Unknown type name
    E2002,
    /// Unknown identifier
    E2003,
    /// Duplicate definition
    E2006,
    /// Type has no concrete layout
    E2019,
    /// Field access on a non-struct
    E2020,
    /// Struct has no such field
    E2021,
    /// Expression does not produce an address
    E2022,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E2020 => "E2020",
            ErrorCode::E2021 => "E2021",
            ErrorCode::E2022 => "E2022",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Check if this is a form-shape error (E1xxx range).
    pub fn is_form_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Short title shown next to the code.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCode::E0003 => "cannot construct literal",
            ErrorCode::E0005 => "invalid character literal",
            ErrorCode::E1001 => "unexpected element",
            ErrorCode::E1002 => "unexpected token",
            ErrorCode::E1003 => "unknown form",
            ErrorCode::E2001 => "type mismatch",
            ErrorCode::E2002 => "unknown type",
            ErrorCode::E2003 => "unknown identifier",
            ErrorCode::E2006 => "duplicate definition",
            ErrorCode::E2019 => "unsupported type",
            ErrorCode::E2020 => "not a struct",
            ErrorCode::E2021 => "no such field",
            ErrorCode::E2022 => "not addressable",
            ErrorCode::E9001 => "internal compiler error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E2003.to_string(), "E2003");
        assert_eq!(ErrorCode::E0005.as_str(), "E0005");
    }

    #[test]
    fn test_form_error_range() {
        assert!(ErrorCode::E1001.is_form_error());
        assert!(ErrorCode::E1003.is_form_error());
        assert!(!ErrorCode::E2001.is_form_error());
        assert!(!ErrorCode::E9001.is_form_error());
    }
}
