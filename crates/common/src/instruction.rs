//! Instruction records as produced by the source loader.

use crate::operand::Operand;

/// One undecoded instruction.
///
/// `position` is the control-flow address of the instruction. Positions
/// need not be contiguous, and need not start at any particular value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Authoritative position number.
    pub position: u64,
    /// Opcode mnemonic as written in the source.
    pub opcode: String,
    /// Operands in source order.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(position: u64, opcode: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self {
            position,
            opcode: opcode.into(),
            operands,
        }
    }
}
