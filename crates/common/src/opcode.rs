//! Opcode definitions for the IPPcode18 instruction set.
//!
//! Every opcode has a fixed operand signature: a list of [`Slot`]s that
//! says what kind of operand each position accepts.

use std::str::FromStr;

/// The kind of operand an opcode accepts in one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A variable reference (`GF@x`).
    Var,
    /// A variable reference or a typed literal.
    Symb,
    /// A label name.
    Label,
    /// A type name (`int`, `bool`, `string`).
    Type,
}

impl Slot {
    /// Human-readable slot name for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Slot::Var => "variable",
            Slot::Symb => "symbol",
            Slot::Label => "label",
            Slot::Type => "type",
        }
    }
}

use Slot::{Label as L, Symb as S, Type as T, Var as V};

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and calls
    /// `MOVE var symb`: copy a value into a variable.
    Move,
    /// Replace the temporary frame with a fresh, empty one.
    CreateFrame,
    /// Move the temporary frame onto the local frame stack.
    PushFrame,
    /// Move the top local frame back into the temporary frame.
    PopFrame,
    /// `DEFVAR var`: declare an uninitialized variable.
    DefVar,
    /// `CALL label`: push the resume position and jump.
    Call,
    /// Pop a resume position and jump to it.
    Return,

    // Data stack
    /// `PUSHS symb`
    Pushs,
    /// `POPS var`
    Pops,

    // Arithmetic, relational, logical
    /// `ADD var symb symb`
    Add,
    /// `SUB var symb symb`
    Sub,
    /// `MUL var symb symb`
    Mul,
    /// `IDIV var symb symb`: floor division.
    Idiv,
    /// `LT var symb symb`
    Lt,
    /// `GT var symb symb`
    Gt,
    /// `EQ var symb symb`
    Eq,
    /// `AND var symb symb`
    And,
    /// `OR var symb symb`
    Or,
    /// `NOT var symb`
    Not,

    // Conversions
    /// `INT2CHAR var symb`
    Int2Char,
    /// `STRI2INT var symb symb`
    Stri2Int,

    // Input/output
    /// `READ var type`
    Read,
    /// `WRITE symb`
    Write,

    // Strings
    /// `CONCAT var symb symb`
    Concat,
    /// `STRLEN var symb`
    Strlen,
    /// `GETCHAR var symb symb`
    GetChar,
    /// `SETCHAR var symb symb`
    SetChar,

    // Types
    /// `TYPE var symb`
    Type,

    // Control flow
    /// `LABEL label`: marker only.
    Label,
    /// `JUMP label`
    Jump,
    /// `JUMPIFEQ label symb symb`
    JumpIfEq,
    /// `JUMPIFNEQ label symb symb`
    JumpIfNeq,

    // Debugging
    /// `DPRINT symb`: write to the diagnostic stream.
    Dprint,
    /// Dump interpreter state to the diagnostic stream.
    Break,
}

/// All valid opcodes, in definition order.
pub const ALL_OPCODES: [Opcode; 34] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Idiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Dprint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Idiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Returns the operand signature of this opcode.
    pub fn signature(&self) -> &'static [Slot] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::DefVar | Opcode::Pops => &[V],
            Opcode::Call | Opcode::Label | Opcode::Jump => &[L],
            Opcode::Pushs | Opcode::Write | Opcode::Dprint => &[S],

            Opcode::Move | Opcode::Not | Opcode::Int2Char | Opcode::Strlen | Opcode::Type => {
                &[V, S]
            }
            Opcode::Read => &[V, T],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Idiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[V, S, S],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[L, S, S],
        }
    }
}

/// Opcode lookup is case-insensitive.
impl FromStr for Opcode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .copied()
            .ok_or(())
    }
}
