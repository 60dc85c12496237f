//! Dispatch loop and opcode executors for the IPPcode18 interpreter.

use std::cmp::Ordering;
use std::io::Write;

use ippcode_common::{Arg, Opcode, Value, ValueType};
use ippcode_verifier::CheckedInstruction;
use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::frames::Frame;
use crate::machine::{Interpreter, Stats};

/// Where control goes after an instruction.
enum Flow {
    /// The position after the current one.
    Next,
    /// A specific position (label target or return address).
    Jump(u64),
}

impl<'p, 'io> Interpreter<'p, 'io> {
    /// Run until the program counter moves past the highest position, or a
    /// runtime error occurs.
    pub fn execute(&mut self) -> Result<Stats, RuntimeError> {
        loop {
            let Some(instr) = self.fetch()? else {
                debug!(
                    instructions = self.stats.instructions,
                    variable_writes = self.stats.variable_writes,
                    "program halted"
                );
                self.flush()?;
                return Ok(self.stats);
            };

            self.stats.instructions += 1;
            trace!(
                position = instr.position,
                opcode = instr.opcode.mnemonic(),
                "dispatch"
            );

            match self.step(instr)? {
                Flow::Next => match instr.position.checked_add(1) {
                    Some(next) => self.pc = next,
                    None => {
                        debug!(position = instr.position, "last representable position");
                        self.flush()?;
                        return Ok(self.stats);
                    }
                },
                Flow::Jump(target) => self.pc = target,
            }
        }
    }

    fn step(&mut self, instr: &'p CheckedInstruction) -> Result<Flow, RuntimeError> {
        let op = instr.opcode.mnemonic();
        match instr.opcode {
            // Frames and calls
            Opcode::Move => {
                let [dst, src] = self.operands::<2>(instr)?;
                let value = self.symbol(src, op)?;
                self.store(dst, value, op)?;
            }
            Opcode::CreateFrame => self.frames.create_frame(),
            Opcode::PushFrame => self
                .frames
                .push_frame()
                .map_err(|e| self.frame_error(e))?,
            Opcode::PopFrame => self
                .frames
                .pop_frame()
                .map_err(|e| self.frame_error(e))?,
            Opcode::DefVar => {
                let [dst] = self.operands::<1>(instr)?;
                let var = self.destination(dst, op)?;
                self.frames
                    .declare(var)
                    .map_err(|e| self.frame_error(e))?;
            }
            Opcode::Call => {
                let [label] = self.operands::<1>(instr)?;
                let target = self.target(label, op)?;
                let resume = instr
                    .position
                    .checked_add(1)
                    .ok_or(RuntimeError::PositionOverflow { at: instr.position })?;
                self.call_stack.push(resume);
                return Ok(Flow::Jump(target));
            }
            Opcode::Return => {
                let resume = self
                    .call_stack
                    .pop()
                    .ok_or(RuntimeError::CallStackEmpty { at: self.pc })?;
                return Ok(Flow::Jump(resume));
            }

            // Data stack
            Opcode::Pushs => {
                let [src] = self.operands::<1>(instr)?;
                let value = self.symbol(src, op)?;
                self.data_stack.push(value);
            }
            Opcode::Pops => {
                let [dst] = self.operands::<1>(instr)?;
                // Check the destination before popping so a fault leaves the stack intact.
                let var = self.destination(dst, op)?;
                self.frames.lookup(var).map_err(|e| self.frame_error(e))?;
                let value = self
                    .data_stack
                    .pop()
                    .ok_or(RuntimeError::DataStackEmpty { at: self.pc })?;
                self.store(dst, value, op)?;
            }

            // Arithmetic
            Opcode::Add => self.exec_arith(instr, i64::checked_add)?,
            Opcode::Sub => self.exec_arith(instr, i64::checked_sub)?,
            Opcode::Mul => self.exec_arith(instr, i64::checked_mul)?,
            Opcode::Idiv => self.exec_idiv(instr)?,

            // Relational
            Opcode::Lt => self.exec_relational(instr, Ordering::is_lt)?,
            Opcode::Gt => self.exec_relational(instr, Ordering::is_gt)?,
            Opcode::Eq => self.exec_relational(instr, Ordering::is_eq)?,

            // Boolean
            Opcode::And => self.exec_logic(instr, |a, b| a && b)?,
            Opcode::Or => self.exec_logic(instr, |a, b| a || b)?,
            Opcode::Not => {
                let [dst, src] = self.operands::<2>(instr)?;
                let value = self.bool_symbol(src, op)?;
                self.store(dst, Value::Bool(!value), op)?;
            }

            // Strings
            Opcode::Int2Char => self.exec_int2char(instr)?,
            Opcode::Stri2Int => self.exec_stri2int(instr)?,
            Opcode::Concat => {
                let [dst, lhs, rhs] = self.operands::<3>(instr)?;
                let mut left = self.str_symbol(lhs, op)?;
                let right = self.str_symbol(rhs, op)?;
                left.push_str(&right);
                self.store(dst, Value::Str(left), op)?;
            }
            Opcode::Strlen => {
                let [dst, src] = self.operands::<2>(instr)?;
                let length = self.str_symbol(src, op)?.chars().count();
                let length = i64::try_from(length)
                    .map_err(|_| RuntimeError::Overflow { at: self.pc, opcode: op })?;
                self.store(dst, Value::Int(length), op)?;
            }
            Opcode::GetChar => self.exec_getchar(instr)?,
            Opcode::SetChar => self.exec_setchar(instr)?,

            // Input and output
            Opcode::Read => self.exec_read(instr)?,
            Opcode::Write => {
                let [src] = self.operands::<1>(instr)?;
                let value = self.symbol(src, op)?;
                write!(self.io.output, "{value}").map_err(|e| self.io_error(e))?;
            }
            Opcode::Type => self.exec_type(instr)?,

            // Control flow
            Opcode::Label => {}
            Opcode::Jump => {
                let [label] = self.operands::<1>(instr)?;
                return Ok(Flow::Jump(self.target(label, op)?));
            }
            Opcode::JumpIfEq | Opcode::JumpIfNeq => {
                let [label, lhs, rhs] = self.operands::<3>(instr)?;
                let left = self.symbol(lhs, op)?;
                let right = self.symbol(rhs, op)?;
                let equal = self.compare(&left, &right, op)?.is_eq();
                if equal == (instr.opcode == Opcode::JumpIfEq) {
                    return Ok(Flow::Jump(self.target(label, op)?));
                }
            }

            // Debugging
            Opcode::Dprint => {
                let [src] = self.operands::<1>(instr)?;
                let value = self.symbol(src, op)?;
                write!(self.io.diagnostic, "{value}").map_err(|e| self.io_error(e))?;
            }
            Opcode::Break => self.exec_break()?,
        }
        Ok(Flow::Next)
    }

    /// Borrow exactly `N` decoded operands.
    fn operands<const N: usize>(
        &self,
        instr: &'p CheckedInstruction,
    ) -> Result<&'p [Arg; N], RuntimeError> {
        <&[Arg; N]>::try_from(instr.args.as_slice())
            .map_err(|_| self.malformed(instr.opcode.mnemonic()))
    }

    fn flush(&mut self) -> Result<(), RuntimeError> {
        self.io.output.flush().map_err(|e| self.io_error(e))?;
        self.io.diagnostic.flush().map_err(|e| self.io_error(e))
    }

    // ---- Arithmetic ----

    fn exec_arith(
        &mut self,
        instr: &'p CheckedInstruction,
        op_fn: fn(i64, i64) -> Option<i64>,
    ) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, lhs, rhs] = self.operands::<3>(instr)?;
        let a = self.int_symbol(lhs, op)?;
        let b = self.int_symbol(rhs, op)?;
        let result = op_fn(a, b).ok_or(RuntimeError::Overflow {
            at: self.pc,
            opcode: op,
        })?;
        self.store(dst, Value::Int(result), op)
    }

    fn exec_idiv(&mut self, instr: &'p CheckedInstruction) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, lhs, rhs] = self.operands::<3>(instr)?;
        let a = self.int_symbol(lhs, op)?;
        let b = self.int_symbol(rhs, op)?;
        if b == 0 {
            return Err(RuntimeError::DivisionByZero { at: self.pc });
        }
        let quotient = floor_div(a, b).ok_or(RuntimeError::Overflow {
            at: self.pc,
            opcode: op,
        })?;
        self.store(dst, Value::Int(quotient), op)
    }

    // ---- Relational and boolean ----

    /// Order two values of the same type.
    ///
    /// Strings compare by character code, booleans with `false < true`.
    fn compare(
        &self,
        left: &Value,
        right: &Value,
        opcode: &'static str,
    ) -> Result<Ordering, RuntimeError> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.chars().cmp(b.chars())),
            _ => Err(RuntimeError::OperandTypesDiffer {
                at: self.pc,
                opcode,
                left: left.value_type(),
                right: right.value_type(),
            }),
        }
    }

    fn exec_relational(
        &mut self,
        instr: &'p CheckedInstruction,
        holds: fn(Ordering) -> bool,
    ) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, lhs, rhs] = self.operands::<3>(instr)?;
        let left = self.symbol(lhs, op)?;
        let right = self.symbol(rhs, op)?;
        let result = holds(self.compare(&left, &right, op)?);
        self.store(dst, Value::Bool(result), op)
    }

    fn exec_logic(
        &mut self,
        instr: &'p CheckedInstruction,
        op_fn: fn(bool, bool) -> bool,
    ) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, lhs, rhs] = self.operands::<3>(instr)?;
        let a = self.bool_symbol(lhs, op)?;
        let b = self.bool_symbol(rhs, op)?;
        self.store(dst, Value::Bool(op_fn(a, b)), op)
    }

    // ---- Strings ----

    /// Character at `index` of `s`, or an out-of-range error.
    fn char_at(&self, s: &str, index: i64) -> Result<char, RuntimeError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| s.chars().nth(i))
            .ok_or_else(|| RuntimeError::IndexOutOfRange {
                at: self.pc,
                index,
                length: s.chars().count(),
            })
    }

    fn exec_int2char(&mut self, instr: &'p CheckedInstruction) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, src] = self.operands::<2>(instr)?;
        let code = self.int_symbol(src, op)?;
        let ch = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::InvalidCharCode { at: self.pc, code })?;
        self.store(dst, Value::Str(ch.to_string()), op)
    }

    fn exec_stri2int(&mut self, instr: &'p CheckedInstruction) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, string, index] = self.operands::<3>(instr)?;
        let s = self.str_symbol(string, op)?;
        let index = self.int_symbol(index, op)?;
        let ch = self.char_at(&s, index)?;
        self.store(dst, Value::Int(i64::from(u32::from(ch))), op)
    }

    fn exec_getchar(&mut self, instr: &'p CheckedInstruction) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, string, index] = self.operands::<3>(instr)?;
        let s = self.str_symbol(string, op)?;
        let index = self.int_symbol(index, op)?;
        let ch = self.char_at(&s, index)?;
        self.store(dst, Value::Str(ch.to_string()), op)
    }

    fn exec_setchar(&mut self, instr: &'p CheckedInstruction) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, index, replacement] = self.operands::<3>(instr)?;
        let target = self.str_symbol(dst, op)?;
        let index = self.int_symbol(index, op)?;
        let replacement = self.str_symbol(replacement, op)?;

        self.char_at(&target, index)?;
        let Some(new_char) = replacement.chars().next() else {
            return Err(RuntimeError::EmptyReplacement { at: self.pc });
        };
        // char_at succeeded, so the index is a valid non-negative char offset.
        let updated: String = target
            .chars()
            .enumerate()
            .map(|(i, c)| if i as i64 == index { new_char } else { c })
            .collect();
        self.store(dst, Value::Str(updated), op)
    }

    // ---- Input, types, debugging ----

    fn exec_read(&mut self, instr: &'p CheckedInstruction) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, ty] = self.operands::<2>(instr)?;
        let Arg::Type(value_type) = ty else {
            return Err(self.malformed(op));
        };

        let mut line = String::new();
        self.io
            .input
            .read_line(&mut line)
            .map_err(|e| self.io_error(e))?;
        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let value = match value_type {
            ValueType::Int => ippcode_common::operand::parse_int(line.trim())
                .map(Value::Int)
                .unwrap_or_else(|_| Value::default_of(ValueType::Int)),
            ValueType::Bool => Value::Bool(line.trim().eq_ignore_ascii_case("true")),
            ValueType::String => Value::Str(line.to_string()),
        };
        self.store(dst, value, op)
    }

    fn exec_type(&mut self, instr: &'p CheckedInstruction) -> Result<(), RuntimeError> {
        let op = instr.opcode.mnemonic();
        let [dst, src] = self.operands::<2>(instr)?;
        // The one read site that accepts an uninitialized variable.
        let name = match src {
            Arg::Var(var) => self
                .frames
                .lookup(var)
                .map_err(|e| self.frame_error(e))?
                .map_or("", |value| value.value_type().name()),
            Arg::Const(value) => value.value_type().name(),
            Arg::Type(_) | Arg::Label(_) => return Err(self.malformed(op)),
        };
        self.store(dst, Value::Str(name.to_string()), op)
    }

    fn exec_break(&mut self) -> Result<(), RuntimeError> {
        let call_stack: Vec<String> = self.call_stack.iter().map(u64::to_string).collect();
        let data_stack: Vec<String> = self.data_stack.iter().map(|v| render(Some(v))).collect();

        let mut dump = format!(
            "BREAK at position {}\n\
             instructions executed: {}\n\
             variable writes: {}\n\
             call stack: [{}]\n\
             data stack: [{}]\n",
            self.pc,
            self.stats.instructions,
            self.stats.variable_writes,
            call_stack.join(", "),
            data_stack.join(", "),
        );
        dump.push_str(&format!("GF: {}\n", render_frame(self.frames.global())));
        match self.frames.temporary() {
            Some(frame) => dump.push_str(&format!("TF: {}\n", render_frame(frame))),
            None => dump.push_str("TF: <inactive>\n"),
        }
        if self.frames.locals().is_empty() {
            dump.push_str("LF: <empty>\n");
        }
        for (depth, frame) in self.frames.locals().iter().enumerate().rev() {
            dump.push_str(&format!("LF[{depth}]: {}\n", render_frame(frame)));
        }

        self.io
            .diagnostic
            .write_all(dump.as_bytes())
            .map_err(|e| self.io_error(e))
    }
}

/// Integer division rounding toward negative infinity.
///
/// Returns `None` for a zero divisor or when the quotient overflows.
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::Str(s)) => format!("string@{s:?}"),
        Some(v) => format!("{}@{v}", v.value_type()),
        None => "<uninitialized>".to_string(),
    }
}

fn render_frame(frame: &Frame) -> String {
    if frame.is_empty() {
        return "{}".to_string();
    }
    let vars: Vec<String> = frame
        .iter()
        .map(|(name, value)| format!("{name} = {}", render(value)))
        .collect();
    format!("{{{}}}", vars.join(", "))
}
