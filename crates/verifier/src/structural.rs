//! Structural validation pass for IPPcode18 programs.
//!
//! Checks positions, opcode names, operand counts and operand shapes, and
//! decodes every instruction that passes. Variable values are never
//! consulted here.

use std::collections::HashSet;

use ippcode_common::{operand, Instruction, Opcode};

use crate::checked::CheckedInstruction;
use crate::error::VerifyError;

/// Run the structural validation pass.
///
/// Returns the successfully decoded instructions, sorted by position, and
/// any errors found, ordered by position.
pub fn check_structural(instrs: &[Instruction]) -> (Vec<CheckedInstruction>, Vec<VerifyError>) {
    let mut errors = Vec::new();
    let mut decoded = Vec::with_capacity(instrs.len());
    let mut seen = HashSet::with_capacity(instrs.len());

    for instr in instrs {
        if !seen.insert(instr.position) {
            errors.push(VerifyError::DuplicatePosition { at: instr.position });
            continue;
        }

        match check_instruction(instr) {
            Ok(checked) => decoded.push(checked),
            Err(mut instr_errors) => errors.append(&mut instr_errors),
        }
    }

    decoded.sort_by_key(|i| i.position);
    errors.sort_by_key(VerifyError::position);
    (decoded, errors)
}

/// Decode one instruction, reporting every bad operand.
pub fn check_instruction(instr: &Instruction) -> Result<CheckedInstruction, Vec<VerifyError>> {
    let at = instr.position;
    let opcode: Opcode = instr.opcode.parse().map_err(|_| {
        vec![VerifyError::UnknownOpcode {
            at,
            opcode: instr.opcode.clone(),
        }]
    })?;

    let signature = opcode.signature();
    if signature.len() != instr.operands.len() {
        return Err(vec![VerifyError::OperandCount {
            at,
            opcode: opcode.mnemonic(),
            expected: signature.len(),
            found: instr.operands.len(),
        }]);
    }

    let mut args = Vec::with_capacity(signature.len());
    let mut errors = Vec::new();
    for (index, (raw, &slot)) in instr.operands.iter().zip(signature).enumerate() {
        match operand::decode(raw, slot) {
            Ok(arg) => args.push(arg),
            Err(source) => errors.push(VerifyError::BadOperand {
                at,
                opcode: opcode.mnemonic(),
                index: index + 1,
                source,
            }),
        }
    }

    if errors.is_empty() {
        Ok(CheckedInstruction {
            position: at,
            opcode,
            args,
        })
    } else {
        Err(errors)
    }
}
