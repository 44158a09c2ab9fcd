// src/ir/types.rs
use std::fmt;

/// IR types for the int-only C subset this crate compiles.
///
/// `Bool` is kept distinct from `I32` because comparisons and branch
/// conditions are typed `bool` at the AST/semantic layer; the SCCP lattice
/// itself treats both as 32-bit integers (see `ir::optimizer::sccp::lattice`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IrType {
    #[default]
    I32,
    Bool,
    /// A pointer to a stack slot, produced by `alloca` and consumed by `load`/`store`.
    Ptr,
    /// The return type of a function with no meaningful result.
    Void,
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::I32 => write!(f, "i32"),
            IrType::Bool => write!(f, "bool"),
            IrType::Ptr => write!(f, "ptr"),
            IrType::Void => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_mnemonic() {
        assert_eq!(IrType::I32.to_string(), "i32");
        assert_eq!(IrType::Void.to_string(), "void");
    }
}
