// src/ir/value/literal.rs
use crate::ir::IrType;
use std::fmt;

/// A syntactic constant carried directly on a `Value`.
///
/// The C subset this crate compiles is int-only, so the only payload is a
/// signed 32-bit integer; `Bool` exists separately because comparison
/// results and branch conditions are typed `bool` even though SCCP folds
/// them down to the same `i32` lattice as everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrLiteralValue {
    I32(i32),
    Bool(bool),
}

impl From<&IrLiteralValue> for IrType {
    fn from(imm: &IrLiteralValue) -> Self {
        match imm {
            IrLiteralValue::I32(_) => IrType::I32,
            IrLiteralValue::Bool(_) => IrType::Bool,
        }
    }
}

impl IrLiteralValue {
    /// Reinterprets the literal as a signed 32-bit integer, the width the
    /// SCCP lattice operates on (`true`/`false` become `1`/`0`).
    pub fn as_i32(&self) -> i32 {
        match self {
            IrLiteralValue::I32(v) => *v,
            IrLiteralValue::Bool(v) => i32::from(*v),
        }
    }
}

impl fmt::Display for IrLiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrLiteralValue::I32(val) => write!(f, "{val}i32"),
            IrLiteralValue::Bool(val) => f.write_str(if *val { "true" } else { "false" }),
        }
    }
}
