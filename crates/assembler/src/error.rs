//! Error types for the IPPcode18 source loader.

use ippcode_common::ErrorCode;
use thiserror::Error;

/// Errors produced while reading IPPcode18 source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The source has no instructions and no header.
    #[error("missing .IPPcode18 header")]
    MissingHeader,

    /// The first meaningful line is not the language header.
    #[error("line {line}: expected .IPPcode18 header, found '{found}'")]
    InvalidHeader { line: usize, found: String },

    /// A line does not start with an opcode.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
}

impl AsmError {
    /// Outcome code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::SourceSyntax
    }
}
