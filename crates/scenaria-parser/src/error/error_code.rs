//! Error codes reported by the Scenaria front-end.
//!
//! Codes are grouped by phase:
//! - `E0xx` lexer
//! - `E1xx` grammar
//! - `E2xx` semantic checks
//! - `E3xx` definition policy

use std::fmt;

/// Stable identifier of a kind of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer
    /// A text literal was opened with `'` and never closed on the same line.
    E001,
    /// A character that starts no token.
    E002,
    /// An escape other than `\'`, `\\`, `\n` or `\t` inside a text literal.
    E003,

    // Grammar
    /// A token the grammar does not allow at this position.
    E100,
    /// The source ended in the middle of a construct.
    E101,

    // Semantics
    /// An identifier that names nothing declared so far.
    E200,
    /// A relationship endpoint of the wrong actor kind.
    ///
    /// Channels connect agents and users. Data flows connect an agent or
    /// user with a store.
    E201,
    /// A response step whose request/response channel does not exist yet.
    E202,
    /// An identifier that names a container where an actor is required.
    E203,

    // Definitions
    /// An actor, annotation or container id defined twice while
    /// re-declaration is rejected.
    E301,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E301 => "E301",
        }
    }

    /// Short description, used as the default label text.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated text literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E200 => "undefined identifier",
            ErrorCode::E201 => "invalid relationship endpoint",
            ErrorCode::E202 => "response without a prior request",
            ErrorCode::E203 => "not an actor",
            ErrorCode::E301 => "duplicate definition",
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
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E202.to_string(), "E202");
        assert_eq!(ErrorCode::E301.as_str(), "E301");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated text literal");
        assert_eq!(ErrorCode::E202.description(), "response without a prior request");
    }
}
