//! Error codes for the Buswire diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Literal errors
//! - `E1xx` - Statement syntax errors
//! - `E2xx` - Name resolution errors raised while running a script

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Literal Errors (E0xx)
    // =========================================================================
    /// Unterminated or malformed string literal.
    ///
    /// Only `\"` and `\\` escapes are accepted and a string must close on
    /// the line it opens.
    E001,

    // =========================================================================
    // Statement Errors (E1xx)
    // =========================================================================
    /// Unexpected input.
    ///
    /// The parser found something it did not expect at this position.
    E100,

    /// Incomplete statement.
    ///
    /// The line ended before the statement was complete.
    E101,

    // =========================================================================
    // Resolution Errors (E2xx)
    // =========================================================================
    /// Undefined alias.
    E200,

    /// Alias refers to the wrong kind of entity.
    ///
    /// For example a block alias used where a port is expected.
    E201,

    /// No net with this name on the bus.
    E202,

    /// No pin with this name on the port.
    E203,

    /// Alias defined twice.
    E204,

    /// Connection rejected.
    ///
    /// A port cannot be connected to itself.
    E205,

    /// Alias refers to a deleted entity.
    E206,
}

impl ErrorCode {
    /// Returns the error code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
        }
    }

    /// Returns a brief description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid string literal",
            ErrorCode::E100 => "unexpected input",
            ErrorCode::E101 => "incomplete statement",
            ErrorCode::E200 => "undefined alias",
            ErrorCode::E201 => "alias kind mismatch",
            ErrorCode::E202 => "unknown net",
            ErrorCode::E203 => "unknown pin",
            ErrorCode::E204 => "duplicate alias",
            ErrorCode::E205 => "connection rejected",
            ErrorCode::E206 => "stale alias",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
