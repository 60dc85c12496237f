//! IPPcode18 source loader: text to instruction sequence.
//!
//! The loader is a mechanical translation: one non-blank line becomes one
//! [`Instruction`](ippcode_common::Instruction), positions are assigned
//! `1, 2, 3, ...` in source order. It checks only the header and the shape
//! of each line; operand validity is left to the verifier.
//!
//! # Usage
//!
//! ```
//! use ippcode_assembler::assemble;
//! use ippcode_common::Operand;
//!
//! let text = ".IPPcode18\nDEFVAR GF@x # counter\nMOVE GF@x int@42\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 2);
//! assert_eq!(program.instructions[1].position, 2);
//! assert_eq!(program.instructions[1].operands[1], Operand::int("42"));
//! ```

pub mod error;

mod lexer;
mod parser;

pub use error::AsmError;

use ippcode_common::Program;
use lexer::tokenize_line;
use parser::{is_header, parse_line};

/// Assemble IPPcode18 source text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !tokenize_line(line).is_empty());

    match lines.next() {
        Some((_, line)) if is_header(line) => {}
        Some((line_num, line)) => {
            return Err(AsmError::InvalidHeader {
                line: line_num,
                found: line.trim().to_string(),
            })
        }
        None => return Err(AsmError::MissingHeader),
    }

    let mut instructions = Vec::new();
    for (line_num, line) in lines {
        let position = instructions.len() as u64 + 1;
        if let Some(instr) = parse_line(&tokenize_line(line), line_num, position)? {
            instructions.push(instr);
        }
    }

    Ok(Program::new(instructions))
}
