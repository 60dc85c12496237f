//! Verification errors for the IPPcode18 verifier.
//!
//! Every error includes the position (`at`) of the offending instruction.
//! The verifier collects ALL errors, not just the first.

use ippcode_common::{ErrorCode, OperandError};
use thiserror::Error;

/// Errors found during static verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Structural ---
    /// Two instructions share one position number.
    #[error("duplicate instruction position {at}")]
    DuplicatePosition { at: u64 },

    // --- Syntax ---
    /// Opcode name is not part of the instruction set.
    #[error("unknown opcode '{opcode}' at position {at}")]
    UnknownOpcode { at: u64, opcode: String },

    /// Wrong number of operands for the opcode.
    #[error("{opcode} at position {at} expects {expected} operand(s), found {found}")]
    OperandCount {
        at: u64,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// Operand does not fit its slot, or its literal is malformed.
    #[error("operand {index} of {opcode} at position {at}: {source}")]
    BadOperand {
        at: u64,
        opcode: &'static str,
        index: usize,
        #[source]
        source: OperandError,
    },

    // --- Labels ---
    /// The same label is declared more than once.
    #[error("duplicate label '{label}' at position {at} (first declared at {first})")]
    DuplicateLabel { at: u64, label: String, first: u64 },

    /// A jump or call names a label that is never declared.
    #[error("undefined label '{label}' at position {at}")]
    UndefinedLabel { at: u64, label: String },
}

impl VerifyError {
    /// Outcome code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            VerifyError::DuplicatePosition { .. } => ErrorCode::SourceFormat,
            VerifyError::UnknownOpcode { .. }
            | VerifyError::OperandCount { .. }
            | VerifyError::BadOperand { .. } => ErrorCode::Syntax,
            VerifyError::DuplicateLabel { .. } | VerifyError::UndefinedLabel { .. } => {
                ErrorCode::Semantic
            }
        }
    }

    /// Position of the instruction the error refers to.
    pub fn position(&self) -> u64 {
        match self {
            VerifyError::DuplicatePosition { at }
            | VerifyError::UnknownOpcode { at, .. }
            | VerifyError::OperandCount { at, .. }
            | VerifyError::BadOperand { at, .. }
            | VerifyError::DuplicateLabel { at, .. }
            | VerifyError::UndefinedLabel { at, .. } => *at,
        }
    }
}
