//! Program representation: an ordered sequence of instructions.

use crate::instruction::Instruction;
use crate::operand::Operand;

/// An IPPcode18 program as handed over by the source loader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    /// The instruction stream, in input order.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Build a program with positions `1, 2, 3, ...` in the given order.
    pub fn sequential<I, S>(instructions: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Operand>)>,
        S: Into<String>,
    {
        let instructions = instructions
            .into_iter()
            .zip(1u64..)
            .map(|((opcode, operands), position)| Instruction::new(position, opcode, operands))
            .collect();
        Self { instructions }
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
