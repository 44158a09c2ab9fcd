// src/ir/value/mod.rs
pub mod kind;
pub mod literal;

pub use self::{kind::ValueKind, literal::IrLiteralValue};

use super::types::IrType;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ValueId(Uuid);

impl ValueId {
    #[inline]
    pub fn new() -> Self {
        ValueId(Uuid::new_v4())
    }
}

impl Default for ValueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value {
    pub id: ValueId,
    pub kind: ValueKind,
    pub ty: IrType,
}

impl Value {
    fn new_value(kind: ValueKind, ty: IrType) -> Self {
        Value { id: ValueId::new(), kind, ty }
    }

    /// Creates a new literal value.
    pub fn new_literal(imm: IrLiteralValue) -> Self {
        let ty: IrType = (&imm).into();
        Self::new_value(ValueKind::Literal(imm), ty)
    }

    /// Creates a new local (stack-slot) value.
    pub fn new_local(slot: kind::LocalSlot, ty: IrType) -> Self {
        Self::new_value(ValueKind::Local(slot), ty)
    }

    /// Creates a new global value.
    pub fn new_global(slot: kind::GlobalSlot, ty: IrType) -> Self {
        Self::new_value(ValueKind::Global(slot), ty)
    }

    /// Creates a new SSA temporary.
    pub fn new_temporary(tmp_id: u64, ty: IrType) -> Self {
        Self::new_value(ValueKind::Temporary(tmp_id), ty)
    }

    /// Returns the constant payload if this value is a syntactic `i32`/`bool` literal.
    pub fn as_constant_i32(&self) -> Option<i32> {
        match self.kind {
            ValueKind::Literal(lit) => Some(lit.as_i32()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Literal(imm) => imm.fmt(f),
            ValueKind::Local(slot) => write!(f, "%{slot}"),
            ValueKind::Global(slot) => write!(f, "@{slot}"),
            ValueKind::Temporary(id) => write!(f, "%t{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_infers_type() {
        let v = Value::new_literal(IrLiteralValue::I32(5));
        assert_eq!(v.ty, IrType::I32);
        assert_eq!(v.as_constant_i32(), Some(5));
    }

    #[test]
    fn temporary_is_not_a_constant() {
        let v = Value::new_temporary(0, IrType::I32);
        assert_eq!(v.as_constant_i32(), None);
    }

    #[test]
    fn display_formats() {
        assert_eq!(Value::new_literal(IrLiteralValue::I32(3)).to_string(), "3i32");
        assert_eq!(Value::new_temporary(2, IrType::I32).to_string(), "%t2");
    }
}
