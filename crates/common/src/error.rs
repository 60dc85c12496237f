//! Error codes and operand decoding errors for IPPcode18 programs.

use std::fmt;

use thiserror::Error;

/// The numeric outcome contract of a run.
///
/// Every fault maps to exactly one of these codes, and the process exit
/// status is the code's value.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Missing or malformed command-line arguments.
    Usage = 10,
    /// An input file (source or READ input) could not be opened.
    InputAccess = 11,
    /// An output file (statistics) could not be written.
    OutputAccess = 12,
    /// Source text has no `.IPPcode18` header or cannot be tokenized.
    SourceSyntax = 21,
    /// The decoded program is structurally malformed (duplicate positions).
    SourceFormat = 31,
    /// Wrong operand count, shape or literal; unknown opcode; bad name.
    Syntax = 32,
    /// Undefined or duplicate label, variable redefinition.
    Semantic = 52,
    /// Operand type does not match the opcode's contract.
    OperandType = 53,
    /// Variable not declared, or its frame is not active.
    UndefinedVariable = 54,
    /// Frame stack misuse.
    FrameAccess = 55,
    /// Pop on an empty stack, or read of an uninitialized variable.
    MissingValue = 56,
    /// Division by zero or integer overflow.
    Arithmetic = 57,
    /// String index out of range or invalid character code.
    StringBounds = 58,
    /// I/O failure on one of the interpreter's streams.
    Internal = 99,
}

impl ErrorCode {
    /// Numeric exit status for this code.
    pub fn value(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Errors from decoding the `\DDD` escapes of a string literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// A backslash is not followed by exactly three decimal digits.
    #[error("malformed escape sequence at byte {offset}")]
    MalformedEscape { offset: usize },

    /// The escape names a value that is not a character.
    #[error("escape \\{code:03} is not a valid character")]
    InvalidCharCode { code: u32 },
}

/// Errors from decoding a raw operand against the slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperandError {
    /// The operand kind tag is not one of `var label type int bool string`.
    #[error("unknown operand kind '{0}'")]
    UnknownKind(String),

    /// The operand kind is not accepted in this slot.
    #[error("expected {expected}, found {found} operand")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    /// Variable reference without a valid `GF@`/`LF@`/`TF@` prefix and name.
    #[error("malformed variable '{0}'")]
    MalformedVariable(String),

    /// Label name does not match the identifier grammar.
    #[error("malformed label '{0}'")]
    MalformedLabel(String),

    /// Type operand is not `int`, `bool` or `string`.
    #[error("unknown type name '{0}'")]
    UnknownType(String),

    /// Integer literal is not `[+-]?digits` or does not fit in 64 bits.
    #[error("invalid int literal '{0}'")]
    InvalidInt(String),

    /// Boolean literal is neither `true` nor `false`.
    #[error("invalid bool literal '{0}'")]
    InvalidBool(String),

    /// String literal has a bad escape.
    #[error("invalid string literal: {0}")]
    InvalidString(#[from] LiteralError),
}
