//! The verified, decoded form of a program consumed by the interpreter.

use std::collections::BTreeMap;
use std::ops::Bound;

use ippcode_common::{Arg, Opcode};

use crate::labels::LabelTable;

/// One instruction after its opcode and operands have been decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedInstruction {
    /// Position number carried over from the source.
    pub position: u64,
    /// Decoded opcode.
    pub opcode: Opcode,
    /// Decoded operands, one per slot of the opcode's signature.
    pub args: Vec<Arg>,
}

/// A program that passed static verification.
///
/// Instructions are indexed by position, so lookups of an exact position
/// and of the next higher position are both logarithmic.
#[derive(Debug, Clone, Default)]
pub struct CheckedProgram {
    instructions: BTreeMap<u64, CheckedInstruction>,
    labels: LabelTable,
}

impl CheckedProgram {
    pub(crate) fn new(instructions: Vec<CheckedInstruction>, labels: LabelTable) -> Self {
        let instructions = instructions
            .into_iter()
            .map(|instr| (instr.position, instr))
            .collect();
        Self {
            instructions,
            labels,
        }
    }

    /// Instruction at exactly `position`.
    pub fn get(&self, position: u64) -> Option<&CheckedInstruction> {
        self.instructions.get(&position)
    }

    /// Instruction with the smallest position strictly greater than `position`.
    pub fn next_after(&self, position: u64) -> Option<&CheckedInstruction> {
        self.instructions
            .range((Bound::Excluded(position), Bound::Unbounded))
            .next()
            .map(|(_, instr)| instr)
    }

    /// Lowest position in the program.
    pub fn first_position(&self) -> Option<u64> {
        self.instructions.keys().next().copied()
    }

    /// The label table built during verification.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions in position order.
    pub fn iter(&self) -> impl Iterator<Item = &CheckedInstruction> {
        self.instructions.values()
    }
}
