//! Label table construction and jump target resolution.

use std::collections::HashMap;

use ippcode_common::{Arg, Opcode};

use crate::checked::CheckedInstruction;
use crate::error::VerifyError;

/// Maps label names to the position of their LABEL instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    positions: HashMap<String, u64>,
}

impl LabelTable {
    /// Position of the LABEL instruction declaring `name`.
    pub fn resolve(&self, name: &str) -> Option<u64> {
        self.positions.get(name).copied()
    }

    /// Number of declared labels.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Build the label table from every LABEL instruction.
///
/// `instrs` must be in position order, so the first declaration of a
/// duplicated label is the one with the lowest position.
pub fn build_labels(instrs: &[CheckedInstruction]) -> (LabelTable, Vec<VerifyError>) {
    let mut table = LabelTable::default();
    let mut errors = Vec::new();

    for instr in instrs.iter().filter(|i| i.opcode == Opcode::Label) {
        let Some(Arg::Label(name)) = instr.args.first() else {
            continue;
        };
        match table.positions.get(name) {
            Some(&first) => errors.push(VerifyError::DuplicateLabel {
                at: instr.position,
                label: name.clone(),
                first,
            }),
            None => {
                table.positions.insert(name.clone(), instr.position);
            }
        }
    }

    (table, errors)
}

/// Check that every CALL/JUMP/JUMPIFEQ/JUMPIFNEQ names a declared label.
pub fn check_targets(instrs: &[CheckedInstruction], table: &LabelTable) -> Vec<VerifyError> {
    instrs
        .iter()
        .filter(|i| i.opcode != Opcode::Label)
        .flat_map(|instr| {
            instr.args.iter().filter_map(move |arg| match arg {
                Arg::Label(name) if table.resolve(name).is_none() => {
                    Some(VerifyError::UndefinedLabel {
                        at: instr.position,
                        label: name.clone(),
                    })
                }
                _ => None,
            })
        })
        .collect()
}
