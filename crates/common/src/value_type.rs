//! Runtime type names of the IPPcode18 type system.

use std::fmt;
use std::str::FromStr;

/// The type of an initialized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 64-bit signed integer.
    Int,
    /// Boolean.
    Bool,
    /// Unicode string.
    String,
}

/// All value types, in definition order.
pub const ALL_VALUE_TYPES: [ValueType; 3] = [ValueType::Int, ValueType::Bool, ValueType::String];

impl ValueType {
    /// Returns the source-level name of this type (`int`, `bool`, `string`).
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::String => "string",
        }
    }
}

impl FromStr for ValueType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_VALUE_TYPES
            .iter()
            .find(|t| t.name() == s)
            .copied()
            .ok_or(())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
