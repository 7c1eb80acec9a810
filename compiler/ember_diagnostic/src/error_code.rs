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
/// - E2xxx: Semantic / type errors
/// - E5xxx: Backend errors
/// - E9xxx: Driver errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unrecognized character in source
    E0001,
    /// Unterminated string or character literal
    E0002,
    /// Malformed or overflowing integer literal
    E0003,
    /// Invalid escape sequence or character literal
    E0004,
    /// Floating literal written with a base prefix
    E0005,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Invalid type width
    E1002,
    /// Unexpected end of file
    E1003,
    /// Unterminated scope
    E1004,

    // Semantic Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Operator not applicable to type
    E2002,
    /// Assignment to something that is not a variable
    E2003,
    /// Literal out of range for its type
    E2004,
    /// Division by zero in a constant expression
    E2005,
    /// Duplicate definition
    E2006,
    /// Type cannot be stored in a variable
    E2007,
    /// String literal used as a value
    E2008,
    /// Function call
    E2009,
    /// Invalid entry point signature
    E2010,
    /// Non-void function does not return a value
    E2011,
    /// Return value does not match the function
    E2012,
    /// Undeclared name
    E2013,

    // Backend Errors (E5xxx)
    /// Module verification failed
    E5001,

    // Driver Errors (E9xxx)
    /// Source file could not be read
    E9001,
    /// Output file could not be written
    E9002,
    /// Driver built without a code generator
    E9003,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
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
            ErrorCode::E5001 => "E5001",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
        }
    }

    /// One-line description of the error class.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unrecognized character",
            ErrorCode::E0002 => "unterminated literal",
            ErrorCode::E0003 => "invalid integer literal",
            ErrorCode::E0004 => "invalid character literal",
            ErrorCode::E0005 => "based floating literal",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "invalid type",
            ErrorCode::E1003 => "unexpected end of file",
            ErrorCode::E1004 => "unterminated scope",
            ErrorCode::E2001 => "type mismatch",
            ErrorCode::E2002 => "operator not applicable",
            ErrorCode::E2003 => "invalid assignment target",
            ErrorCode::E2004 => "literal out of range",
            ErrorCode::E2005 => "constant division by zero",
            ErrorCode::E2006 => "duplicate definition",
            ErrorCode::E2007 => "unsupported variable type",
            ErrorCode::E2008 => "string literal in expression",
            ErrorCode::E2009 => "function calls are not supported",
            ErrorCode::E2010 => "invalid entry point",
            ErrorCode::E2011 => "missing return",
            ErrorCode::E2012 => "mismatched return",
            ErrorCode::E2013 => "undeclared name",
            ErrorCode::E5001 => "invalid backend module",
            ErrorCode::E9001 => "cannot read source file",
            ErrorCode::E9002 => "cannot write output file",
            ErrorCode::E9003 => "code generation unavailable",
        }
    }

    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a parser error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a semantic error (E2xxx range).
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
