//! IPPcode18 common types and operand decoding.
//!
//! This crate provides the data structures shared by the verifier, the
//! interpreter and the source loader:
//!
//! - [`Opcode`]: the closed set of 34 opcodes and their operand signatures
//! - [`Operand`] / [`Arg`]: raw operands and their decoded form
//! - [`Instruction`] / [`Program`]: the undecoded program
//! - [`Value`] / [`ValueType`]: runtime values
//! - [`ErrorCode`]: the numeric outcome contract
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod error;
pub mod instruction;
pub mod literal;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod value;
pub mod value_type;

// Re-export commonly used types at the crate root.
pub use error::{ErrorCode, LiteralError, OperandError};
pub use instruction::Instruction;
pub use opcode::{Opcode, Slot};
pub use operand::{Arg, FrameKind, Operand, OperandKind, VarRef};
pub use program::Program;
pub use value::Value;
pub use value_type::ValueType;
