// src/ir/optimizer/sccp/lattice.rs
use crate::ir::value::{IrLiteralValue, ValueId, ValueKind};
use crate::ir::Value;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// The three-point SSA value lattice: `Bottom ⊑ Constant(k) ⊑ Top`.
///
/// `Constant(k1)` and `Constant(k2)` with `k1 != k2` join to `Top` — a
/// value can never be rewritten from one known constant to a different one,
/// only widened to "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeValue {
    Bottom,
    Constant(i32),
    Top,
}

impl LatticeValue {
    /// Commutative, associative, idempotent join.
    pub fn join(self, other: Self) -> Self {
        match (self, other) {
            (LatticeValue::Bottom, x) | (x, LatticeValue::Bottom) => x,
            (LatticeValue::Top, _) | (_, LatticeValue::Top) => LatticeValue::Top,
            (LatticeValue::Constant(a), LatticeValue::Constant(b)) => {
                if a == b {
                    LatticeValue::Constant(a)
                } else {
                    LatticeValue::Top
                }
            }
        }
    }

    /// Whether `self` is less than or equal to `other` in the lattice order
    /// (used only to assert monotonicity; never a comparison for truthiness).
    fn leq(self, other: Self) -> bool {
        self.join(other) == other
    }

    pub fn as_constant(self) -> Option<i32> {
        match self {
            LatticeValue::Constant(k) => Some(k),
            _ => None,
        }
    }
}

/// Two-point block-reachability lattice: `Unreachable ⊑ Reachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Unreachable,
    Reachable,
}

/// The monotone store of SSA-value lattice elements.
///
/// Descent is a programmer error in the transition engine, not a possible
/// input-driven outcome, so violations `assert!` rather than returning a
/// `Result`.
#[derive(Debug, Default)]
pub struct ValueLattice {
    entries: HashMap<ValueId, LatticeValue>,
}

impl ValueLattice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current lattice element for `value`. Syntactic integer
    /// literals are always `Constant(k)` without ever touching the store.
    /// Anything else not yet seen is seeded (and recorded) as `Bottom`.
    pub fn lookup_value(&mut self, value: &Value) -> LatticeValue {
        if let ValueKind::Literal(lit) = value.kind {
            return match lit {
                IrLiteralValue::I32(k) => LatticeValue::Constant(k),
                IrLiteralValue::Bool(b) => LatticeValue::Constant(i32::from(b)),
            };
        }
        *self.entries.entry(value.id).or_insert(LatticeValue::Bottom)
    }

    /// Reads the current element for `id` without seeding on miss (used by
    /// the rewrite phase, which only visits values that already have an
    /// entry because some transfer function wrote one).
    pub fn get(&self, id: ValueId) -> Option<LatticeValue> {
        self.entries.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ValueId, LatticeValue)> + '_ {
        self.entries.iter().map(|(id, v)| (*id, *v))
    }

    /// Raises the lattice entry for `id` to `join(existing, new)`.
    /// Returns whether the state actually changed.
    ///
    /// # Panics
    /// Panics if the computed join would be lower than the existing entry —
    /// that can only happen if a transfer function is unsound.
    pub fn update_value(&mut self, id: ValueId, new: LatticeValue) -> bool {
        let old = *self.entries.get(&id).unwrap_or(&LatticeValue::Bottom);
        let joined = old.join(new);
        assert!(old.leq(joined), "lattice descent detected for value {id}: {old:?} -> {new:?}");
        self.entries.insert(id, joined);
        joined != old
    }
}

/// The monotone store of block reachability states.
#[derive(Debug, Default)]
pub struct BlockLattice {
    entries: HashMap<NodeIndex, Reachability>,
}

impl BlockLattice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reachable(&self, block: NodeIndex) -> bool {
        matches!(self.entries.get(&block), Some(Reachability::Reachable))
    }

    /// Raises `block` to `Reachable`. Returns whether it was newly marked.
    pub fn mark_reachable(&mut self, block: NodeIndex) -> bool {
        !matches!(self.entries.insert(block, Reachability::Reachable), Some(Reachability::Reachable))
    }
}
