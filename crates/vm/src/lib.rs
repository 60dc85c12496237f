//! IPPcode18 interpreter: executes verified programs.
//!
//! The interpreter is a frame-based machine with:
//! - A global frame, an optional temporary frame and a stack of local frames
//! - A call stack of resume positions for CALL/RETURN
//! - A data stack of values for PUSHS/POPS
//!
//! Control flow is driven by position numbers, not indices: a missing
//! position is skipped (with a warning) to the next higher one, and moving
//! past the highest position ends the program.
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{Operand, Program};
//! use ippcode_vm::{run, Io};
//!
//! let program = Program::sequential(vec![
//!     ("DEFVAR", vec![Operand::var("GF@x")]),
//!     ("MOVE", vec![Operand::var("GF@x"), Operand::int("41")]),
//!     ("ADD", vec![Operand::var("GF@x"), Operand::var("GF@x"), Operand::int("1")]),
//!     ("WRITE", vec![Operand::var("GF@x")]),
//! ]);
//!
//! let mut input = std::io::empty();
//! let mut output = Vec::new();
//! let mut diagnostic = Vec::new();
//! let stats = run(&program, Io::new(&mut input, &mut output, &mut diagnostic)).unwrap();
//!
//! assert_eq!(output, b"42");
//! assert_eq!(stats.instructions, 4);
//! ```

pub mod error;
pub mod execute;
pub mod frames;
pub mod machine;

pub use error::RuntimeError;
pub use frames::{Frame, FrameError, FrameSet};
pub use machine::{Interpreter, Io, Stats};

use ippcode_common::{ErrorCode, Program};
use ippcode_verifier::{verify, VerifyError};
use thiserror::Error;

/// Why a run did not complete normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Static verification rejected the program; nothing was executed.
    #[error("program failed verification with {} error(s)", .0.len())]
    Static(Vec<VerifyError>),

    /// Execution stopped at a runtime error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Fault {
    /// Outcome code: the first static error's code, or the runtime error's.
    pub fn code(&self) -> ErrorCode {
        match self {
            Fault::Static(errors) => errors
                .first()
                .map_or(ErrorCode::Internal, VerifyError::code),
            Fault::Runtime(err) => err.code(),
        }
    }
}

/// Verify and execute a program.
///
/// This is the primary entry point. It:
/// 1. Runs static verification and builds the label table
/// 2. Starts at position `min(1, lowest position)`
/// 3. Executes until control moves past the highest position
/// 4. Returns the execution counters
///
/// # Errors
///
/// Returns [`Fault::Static`] if verification fails and [`Fault::Runtime`]
/// if an instruction faults during execution.
pub fn run(program: &Program, io: Io<'_>) -> Result<Stats, Fault> {
    let checked = verify(program).map_err(Fault::Static)?;
    let mut interpreter = Interpreter::new(&checked, io);
    Ok(interpreter.execute()?)
}
