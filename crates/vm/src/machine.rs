//! Interpreter state: frames, stacks, streams, counters and fetch.

use std::io::{BufRead, Write};

use ippcode_common::{Arg, Value, ValueType, VarRef};
use ippcode_verifier::{CheckedInstruction, CheckedProgram};
use tracing::warn;

use crate::error::RuntimeError;
use crate::frames::{FrameError, FrameSet};

/// Position the dispatch loop starts from unless the program begins lower.
pub const ENTRY_POSITION: u64 = 1;

/// The three streams the interpreter talks to.
pub struct Io<'io> {
    /// Line-oriented input consumed by READ.
    pub input: &'io mut dyn BufRead,
    /// Program output written by WRITE.
    pub output: &'io mut dyn Write,
    /// Warnings, DPRINT and BREAK dumps.
    pub diagnostic: &'io mut dyn Write,
}

impl<'io> Io<'io> {
    pub fn new(
        input: &'io mut dyn BufRead,
        output: &'io mut dyn Write,
        diagnostic: &'io mut dyn Write,
    ) -> Self {
        Self {
            input,
            output,
            diagnostic,
        }
    }
}

/// Execution counters available after (or during) a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Instructions fetched for execution.
    pub instructions: u64,
    /// Successful writes to variable slots.
    pub variable_writes: u64,
}

/// The IPPcode18 interpreter.
pub struct Interpreter<'p, 'io> {
    /// The verified program being executed.
    pub(crate) program: &'p CheckedProgram,
    /// Input, output and diagnostic streams.
    pub(crate) io: Io<'io>,
    /// Global, temporary and local frames.
    pub(crate) frames: FrameSet,
    /// Resume positions pushed by CALL.
    pub(crate) call_stack: Vec<u64>,
    /// Values pushed by PUSHS.
    pub(crate) data_stack: Vec<Value>,
    /// Program counter (a position number, not an index).
    pub(crate) pc: u64,
    pub(crate) stats: Stats,
}

impl<'p, 'io> Interpreter<'p, 'io> {
    /// Create a new interpreter for the given program.
    pub fn new(program: &'p CheckedProgram, io: Io<'io>) -> Self {
        let pc = program
            .first_position()
            .map_or(ENTRY_POSITION, |first| first.min(ENTRY_POSITION));
        Self {
            program,
            io,
            frames: FrameSet::new(),
            call_stack: Vec::new(),
            data_stack: Vec::new(),
            pc,
            stats: Stats::default(),
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Current frame contents, for inspecting state after a run or fault.
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Fetch the instruction at the program counter.
    ///
    /// If no instruction has exactly that position, execution resumes at the
    /// next higher position with a warning on the diagnostic stream. Returns
    /// `None` when no higher position exists.
    pub(crate) fn fetch(&mut self) -> Result<Option<&'p CheckedInstruction>, RuntimeError> {
        let program = self.program;
        if let Some(instr) = program.get(self.pc) {
            return Ok(Some(instr));
        }

        let Some(next) = program.next_after(self.pc) else {
            return Ok(None);
        };
        warn!(
            missing = self.pc,
            resumed = next.position,
            "no instruction at position, resynchronizing"
        );
        writeln!(
            self.io.diagnostic,
            "warning: no instruction at position {}, continuing at position {}",
            self.pc, next.position
        )
        .map_err(|e| self.io_error(e))?;
        self.pc = next.position;
        Ok(Some(next))
    }

    pub(crate) fn io_error(&self, err: std::io::Error) -> RuntimeError {
        RuntimeError::Io {
            at: self.pc,
            message: err.to_string(),
        }
    }

    pub(crate) fn frame_error(&self, source: FrameError) -> RuntimeError {
        RuntimeError::Frame {
            at: self.pc,
            source,
        }
    }

    /// Resolve a symbol operand to its value.
    ///
    /// Variables must be declared and initialized; literals are returned
    /// as they are.
    pub(crate) fn symbol(&self, arg: &Arg, opcode: &'static str) -> Result<Value, RuntimeError> {
        match arg {
            Arg::Var(var) => self
                .frames
                .read(var)
                .cloned()
                .map_err(|e| self.frame_error(e)),
            Arg::Const(value) => Ok(value.clone()),
            Arg::Type(_) | Arg::Label(_) => Err(self.malformed(opcode)),
        }
    }

    /// Resolve a symbol that must be an int.
    pub(crate) fn int_symbol(&self, arg: &Arg, opcode: &'static str) -> Result<i64, RuntimeError> {
        match self.symbol(arg, opcode)? {
            Value::Int(n) => Ok(n),
            other => Err(self.type_mismatch(opcode, other.value_type())),
        }
    }

    /// Resolve a symbol that must be a bool.
    pub(crate) fn bool_symbol(&self, arg: &Arg, opcode: &'static str) -> Result<bool, RuntimeError> {
        match self.symbol(arg, opcode)? {
            Value::Bool(b) => Ok(b),
            other => Err(self.type_mismatch(opcode, other.value_type())),
        }
    }

    /// Resolve a symbol that must be a string.
    pub(crate) fn str_symbol(
        &self,
        arg: &Arg,
        opcode: &'static str,
    ) -> Result<String, RuntimeError> {
        match self.symbol(arg, opcode)? {
            Value::Str(s) => Ok(s),
            other => Err(self.type_mismatch(opcode, other.value_type())),
        }
    }

    /// The destination variable of an instruction.
    pub(crate) fn destination<'a>(
        &self,
        arg: &'a Arg,
        opcode: &'static str,
    ) -> Result<&'a VarRef, RuntimeError> {
        match arg {
            Arg::Var(var) => Ok(var),
            _ => Err(self.malformed(opcode)),
        }
    }

    /// Write a value into a declared variable.
    pub(crate) fn store(
        &mut self,
        arg: &Arg,
        value: Value,
        opcode: &'static str,
    ) -> Result<(), RuntimeError> {
        let var = self.destination(arg, opcode)?;
        self.frames
            .write(var, value)
            .map_err(|e| self.frame_error(e))?;
        self.stats.variable_writes += 1;
        Ok(())
    }

    /// Position of the LABEL instruction named by `arg`.
    pub(crate) fn target(&self, arg: &Arg, opcode: &'static str) -> Result<u64, RuntimeError> {
        let Arg::Label(name) = arg else {
            return Err(self.malformed(opcode));
        };
        self.program
            .labels()
            .resolve(name)
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                at: self.pc,
                label: name.clone(),
            })
    }

    pub(crate) fn type_mismatch(&self, opcode: &'static str, found: ValueType) -> RuntimeError {
        RuntimeError::TypeMismatch {
            at: self.pc,
            opcode,
            found,
        }
    }

    pub(crate) fn malformed(&self, opcode: &'static str) -> RuntimeError {
        RuntimeError::MalformedInstruction {
            at: self.pc,
            opcode,
        }
    }
}
