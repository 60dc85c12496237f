//! Raw and decoded instruction operands.
//!
//! The source loader hands over [`Operand`]s: a kind tag plus raw
//! text. [`decode`] checks one operand against the [`Slot`] it occupies and
//! produces an [`Arg`] the interpreter can execute without re-parsing. The
//! verifier and the interpreter both go through this one function.

use std::fmt;
use std::str::FromStr;

use crate::error::OperandError;
use crate::literal::decode_string;
use crate::opcode::Slot;
use crate::value::Value;
use crate::value_type::ValueType;

/// Operand kind tag as supplied by the source loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    Var,
    Label,
    Type,
    Int,
    Bool,
    String,
}

impl OperandKind {
    /// Returns the tag name (`var`, `label`, `type`, `int`, `bool`, `string`).
    pub fn name(&self) -> &'static str {
        match self {
            OperandKind::Var => "var",
            OperandKind::Label => "label",
            OperandKind::Type => "type",
            OperandKind::Int => "int",
            OperandKind::Bool => "bool",
            OperandKind::String => "string",
        }
    }
}

impl FromStr for OperandKind {
    type Err = OperandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "var" => Ok(OperandKind::Var),
            "label" => Ok(OperandKind::Label),
            "type" => Ok(OperandKind::Type),
            "int" => Ok(OperandKind::Int),
            "bool" => Ok(OperandKind::Bool),
            "string" => Ok(OperandKind::String),
            other => Err(OperandError::UnknownKind(other.to_string())),
        }
    }
}

/// An undecoded operand: kind tag and raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub kind: OperandKind,
    pub text: String,
}

impl Operand {
    pub fn new(kind: OperandKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn var(text: impl Into<String>) -> Self {
        Self::new(OperandKind::Var, text)
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(OperandKind::Label, text)
    }

    pub fn type_name(text: impl Into<String>) -> Self {
        Self::new(OperandKind::Type, text)
    }

    pub fn int(text: impl Into<String>) -> Self {
        Self::new(OperandKind::Int, text)
    }

    pub fn bool(text: impl Into<String>) -> Self {
        Self::new(OperandKind::Bool, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(OperandKind::String, text)
    }
}

/// The three frame kinds a variable can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Global,
    Local,
    Temporary,
}

impl FrameKind {
    /// Source prefix (`GF`, `LF`, `TF`).
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameKind::Global => "GF",
            FrameKind::Local => "LF",
            FrameKind::Temporary => "TF",
        }
    }
}

/// A decoded variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub frame: FrameKind,
    pub name: String,
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame.prefix(), self.name)
    }
}

/// A decoded operand, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Variable reference.
    Var(VarRef),
    /// Immediate typed literal.
    Const(Value),
    /// Type name.
    Type(ValueType),
    /// Label name; resolved to a position through the label table.
    Label(String),
}

/// Special characters allowed in identifiers besides letters, digits and `_`.
const IDENT_SPECIAL: &[char] = &['_', '-', '$', '&', '%', '*'];

/// Returns true if `name` is a valid variable or label identifier.
///
/// An identifier starts with an ASCII letter or one of `_ - $ & % *` and continues
/// with those characters or ASCII digits.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || IDENT_SPECIAL.contains(&c) => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || IDENT_SPECIAL.contains(&c))
}

/// Parse `GF@name`, `LF@name` or `TF@name`.
pub fn parse_var(text: &str) -> Result<VarRef, OperandError> {
    let malformed = || OperandError::MalformedVariable(text.to_string());
    let (prefix, name) = text.split_once('@').ok_or_else(malformed)?;
    let frame = match prefix {
        "GF" => FrameKind::Global,
        "LF" => FrameKind::Local,
        "TF" => FrameKind::Temporary,
        _ => return Err(malformed()),
    };
    if !is_identifier(name) {
        return Err(malformed());
    }
    Ok(VarRef {
        frame,
        name: name.to_string(),
    })
}

/// Parse an int literal: optional sign followed by decimal digits.
pub fn parse_int(text: &str) -> Result<i64, OperandError> {
    let invalid = || OperandError::InvalidInt(text.to_string());
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    // i64::from_str accepts a leading '+' or '-' itself.
    text.parse::<i64>().map_err(|_| invalid())
}

fn parse_bool(text: &str) -> Result<bool, OperandError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(OperandError::InvalidBool(other.to_string())),
    }
}

/// Decode one operand against the slot it occupies.
///
/// This only inspects the operand's shape; it never looks at the current
/// value of a variable.
pub fn decode(operand: &Operand, slot: Slot) -> Result<Arg, OperandError> {
    let wrong_shape = || OperandError::WrongShape {
        expected: slot.describe(),
        found: operand.kind.name(),
    };

    match (slot, operand.kind) {
        (Slot::Var | Slot::Symb, OperandKind::Var) => parse_var(&operand.text).map(Arg::Var),
        (Slot::Symb, OperandKind::Int) => {
            parse_int(&operand.text).map(|n| Arg::Const(Value::Int(n)))
        }
        (Slot::Symb, OperandKind::Bool) => {
            parse_bool(&operand.text).map(|b| Arg::Const(Value::Bool(b)))
        }
        (Slot::Symb, OperandKind::String) => {
            Ok(Arg::Const(Value::Str(decode_string(&operand.text)?)))
        }
        (Slot::Label, OperandKind::Label) => {
            if is_identifier(&operand.text) {
                Ok(Arg::Label(operand.text.clone()))
            } else {
                Err(OperandError::MalformedLabel(operand.text.clone()))
            }
        }
        (Slot::Type, OperandKind::Type) => operand
            .text
            .parse::<ValueType>()
            .map(Arg::Type)
            .map_err(|_| OperandError::UnknownType(operand.text.clone())),
        _ => Err(wrong_shape()),
    }
}
