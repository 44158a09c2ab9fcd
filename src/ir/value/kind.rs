// src/ir/value/kind.rs
use super::literal::IrLiteralValue;

/// Kind of IR value: a syntactic literal, a named storage slot, or an
/// anonymous SSA temporary produced by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Literal(IrLiteralValue),
    Local(LocalSlot),
    Global(GlobalSlot),
    Temporary(u64),
}

/// Stable handle for a stack slot introduced by `alloca`.
///
/// Locals are interned by index rather than by name so that two variables
/// that happen to share a lexical name (inner/outer scope shadowing) never
/// collide as SSA values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalSlot(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalSlot(pub u32);

impl std::fmt::Display for LocalSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "local{}", self.0)
    }
}

impl std::fmt::Display for GlobalSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_slot_display() {
        assert_eq!(LocalSlot(3).to_string(), "local3");
    }
}
