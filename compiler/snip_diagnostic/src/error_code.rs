//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the compiler phase.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Semantic (name, type and flow) errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid character literal
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Unterminated block comment
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token (`X expected`)
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected type
    E1005,
    /// Unsupported member or nested type
    E1006,
    /// Field declarations are not supported
    E1007,

    // Semantic Errors (E2xxx)
    /// Name does not exist in the current context
    E2001,
    /// Type or namespace not found
    E2002,
    /// Cannot implicitly convert type
    E2003,
    /// Cannot convert type (explicit cast)
    E2004,
    /// Operator cannot be applied to operands
    E2005,
    /// Local already defined in this or an enclosing scope
    E2006,
    /// Type does not contain a definition for member
    E2007,
    /// No overload takes N arguments
    E2008,
    /// Argument cannot be converted
    E2009,
    /// Not all code paths return a value
    E2010,
    /// No enclosing loop for break or continue
    E2011,
    /// Object reference required for instance method
    E2012,
    /// Type already defines a member with this name
    E2013,
    /// Invalid assignment target
    E2014,
    /// Invalid return statement for the method's return type
    E2015,
    /// Invalid local variable declaration
    E2016,
    /// Thrown value is not an exception
    E2017,
    /// Expression is not valid as a statement
    E2018,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Check if this is a lexer error (E0xxx).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a parser error (E1xxx).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a semantic error (E2xxx).
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
