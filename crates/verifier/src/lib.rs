//! IPPcode18 verifier: static analysis before execution.
//!
//! The verifier checks a [`Program`] for correctness BEFORE any instruction
//! runs. It collects ALL errors (not just the first) and returns them. A
//! program that passes comes back as a [`CheckedProgram`]: decoded
//! instructions indexed by position, plus the label table.
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{Operand, Program};
//! use ippcode_verifier::verify;
//!
//! let program = Program::sequential(vec![
//!     ("LABEL", vec![Operand::label("top")]),
//!     ("JUMP", vec![Operand::label("top")]),
//! ]);
//!
//! let checked = verify(&program).unwrap();
//! assert_eq!(checked.labels().resolve("top"), Some(1));
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: unique positions, known opcodes, operand count and
//!    shape, literal well-formedness
//! 2. **Labels**: label table construction, duplicate declarations
//! 3. **Targets**: every jump/call names a declared label

pub mod checked;
pub mod error;
pub mod labels;
pub mod structural;

pub use checked::{CheckedInstruction, CheckedProgram};
pub use error::VerifyError;
pub use labels::LabelTable;

use ippcode_common::Program;
use tracing::debug;

/// Verify a program for correctness.
///
/// Returns the decoded program if it passes all checks, or
/// `Err(Vec<VerifyError>)` with all errors found: structural errors first,
/// then label errors.
pub fn verify(program: &Program) -> Result<CheckedProgram, Vec<VerifyError>> {
    let mut all_errors = Vec::new();

    // Pass 1: Structural (decodes every well-formed instruction)
    let (decoded, structural_errors) = structural::check_structural(&program.instructions);
    all_errors.extend(structural_errors);

    // Pass 2: Labels
    let (labels, label_errors) = labels::build_labels(&decoded);
    all_errors.extend(label_errors);

    // Pass 3: Targets
    all_errors.extend(labels::check_targets(&decoded, &labels));

    debug!(
        instructions = decoded.len(),
        labels = labels.len(),
        errors = all_errors.len(),
        "verification finished"
    );

    if all_errors.is_empty() {
        Ok(CheckedProgram::new(decoded, labels))
    } else {
        Err(all_errors)
    }
}
