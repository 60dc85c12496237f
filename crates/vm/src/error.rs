//! Runtime errors for the IPPcode18 interpreter.
//!
//! These are errors that can only happen at runtime, not during static
//! verification. Every error includes the instruction position (`at`).

use ippcode_common::{ErrorCode, ValueType};
use thiserror::Error;

use crate::frames::FrameError;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Frame or variable access failed.
    #[error("{source} at position {at}")]
    Frame {
        at: u64,
        #[source]
        source: FrameError,
    },

    /// An operand has a type the opcode does not accept.
    #[error("{opcode} at position {at}: unexpected operand of type {found}")]
    TypeMismatch {
        at: u64,
        opcode: &'static str,
        found: ValueType,
    },

    /// Two operands that must share a type do not.
    #[error("{opcode} at position {at}: cannot compare {left} with {right}")]
    OperandTypesDiffer {
        at: u64,
        opcode: &'static str,
        left: ValueType,
        right: ValueType,
    },

    /// POPS on an empty data stack.
    #[error("data stack is empty at position {at}")]
    DataStackEmpty { at: u64 },

    /// RETURN with an empty call stack.
    #[error("call stack is empty at position {at}")]
    CallStackEmpty { at: u64 },

    /// IDIV with a zero divisor.
    #[error("division by zero at position {at}")]
    DivisionByZero { at: u64 },

    /// Integer result does not fit in 64 bits.
    #[error("{opcode} overflowed at position {at}")]
    Overflow { at: u64, opcode: &'static str },

    /// Character index outside the string.
    #[error("index {index} out of range for string of length {length} at position {at}")]
    IndexOutOfRange { at: u64, index: i64, length: usize },

    /// INT2CHAR of a value with no character mapping.
    #[error("{code} is not a valid character code at position {at}")]
    InvalidCharCode { at: u64, code: i64 },

    /// SETCHAR with an empty replacement string.
    #[error("SETCHAR with empty replacement string at position {at}")]
    EmptyReplacement { at: u64 },

    /// Jump or call to a label missing from the label table.
    #[error("undefined label '{label}' at position {at}")]
    UndefinedLabel { at: u64, label: String },

    /// Instruction operands do not match the opcode signature.
    #[error("malformed {opcode} at position {at}")]
    MalformedInstruction { at: u64, opcode: &'static str },

    /// CALL at the highest representable position has nowhere to return to.
    #[error("no resume position after CALL at position {at}")]
    PositionOverflow { at: u64 },

    /// Reading input or writing output failed.
    #[error("I/O error at position {at}: {message}")]
    Io { at: u64, message: String },
}

impl RuntimeError {
    /// Outcome code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RuntimeError::Frame { source, .. } => source.code(),
            RuntimeError::TypeMismatch { .. } | RuntimeError::OperandTypesDiffer { .. } => {
                ErrorCode::OperandType
            }
            RuntimeError::DataStackEmpty { .. } | RuntimeError::CallStackEmpty { .. } => {
                ErrorCode::MissingValue
            }
            RuntimeError::DivisionByZero { .. } | RuntimeError::Overflow { .. } => {
                ErrorCode::Arithmetic
            }
            RuntimeError::IndexOutOfRange { .. }
            | RuntimeError::InvalidCharCode { .. }
            | RuntimeError::EmptyReplacement { .. } => ErrorCode::StringBounds,
            RuntimeError::UndefinedLabel { .. } => ErrorCode::Semantic,
            RuntimeError::MalformedInstruction { .. } => ErrorCode::Syntax,
            RuntimeError::PositionOverflow { .. } | RuntimeError::Io { .. } => {
                ErrorCode::Internal
            }
        }
    }
}
