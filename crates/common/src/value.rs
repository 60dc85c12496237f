//! Runtime value representation for the interpreter.
//!
//! An uninitialized variable has no `Value` at all: frames store
//! `Option<Value>` and every read site has to deal with `None`.

use std::fmt;

use crate::value_type::ValueType;

/// An initialized runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Unicode string, indexed by characters.
    Str(String),
}

impl Value {
    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Bool(_) => ValueType::Bool,
            Value::Str(_) => ValueType::String,
        }
    }

    /// Default value produced by READ when the input does not parse.
    pub fn default_of(value_type: ValueType) -> Value {
        match value_type {
            ValueType::Int => Value::Int(0),
            ValueType::Bool => Value::Bool(false),
            ValueType::String => Value::Str(String::new()),
        }
    }
}

/// Textual form used by WRITE and DPRINT.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}
