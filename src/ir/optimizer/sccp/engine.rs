// src/ir/optimizer/sccp/engine.rs
use super::lattice::{BlockLattice, LatticeValue, ValueLattice};
use crate::ir::instruction::{InstructionKind, IrBinaryOp};
use crate::ir::terminator::TerminatorKind;
use crate::ir::value::ValueKind;
use crate::ir::{Function, Value, ValueId};
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, VecDeque};

/// Upper bound on fixpoint iterations was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxIterationsExceeded(pub usize);

/// One entry of the use-list lookup table: the block and in-block
/// instruction index of a read of some SSA value. Not an ownership edge —
/// rebuilt once per `SccpEngine::run`.
type UseList = HashMap<ValueId, Vec<(NodeIndex, usize)>>;

/// The Wegman-Zadeck transition engine: joint reachability + constant
/// propagation over one function, run to a fixpoint.
pub struct SccpEngine {
    pub(super) values: ValueLattice,
    pub(super) blocks: BlockLattice,
    /// The lattice element of each block's terminator (the branch condition,
    /// or the returned value) — terminators have no `ValueId` of their own.
    pub(super) terminator_values: HashMap<NodeIndex, LatticeValue>,
    pub(super) use_list: UseList,
    queue: VecDeque<NodeIndex>,
    verbose: bool,
    max_iterations: usize,
}

impl SccpEngine {
    pub fn new(verbose: bool, max_iterations: usize) -> Self {
        Self {
            values: ValueLattice::new(),
            blocks: BlockLattice::new(),
            terminator_values: HashMap::new(),
            use_list: HashMap::new(),
            queue: VecDeque::new(),
            verbose,
            max_iterations,
        }
    }

    /// Runs the fixpoint driver over `function`. Mutates no IR — only the
    /// internal lattice stores; the rewrite phase (`super::rewriter`)
    /// consumes this engine afterwards.
    pub fn run(&mut self, function: &Function) -> Result<(), MaxIterationsExceeded> {
        self.build_use_list(function);

        let Some(entry) = function.cfg.get_entry_block_index() else {
            return Ok(());
        };
        self.blocks.mark_reachable(entry);
        self.queue.push_back(entry);

        let mut iterations = 0usize;
        while let Some(block_idx) = self.queue.pop_front() {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(MaxIterationsExceeded(self.max_iterations));
            }
            if !self.blocks.is_reachable(block_idx) {
                continue;
            }
            if self.verbose {
                println!("sccp: iteration {iterations}, visiting block {block_idx:?}");
            }
            self.visit_block(function, block_idx);
        }
        Ok(())
    }

    fn build_use_list(&mut self, function: &Function) {
        self.use_list.clear();
        for block_idx in function.cfg.node_indices() {
            let block = &function.cfg.graph()[block_idx];
            for (pos, inst) in block.instructions.iter().enumerate() {
                for operand in inst.operands() {
                    if matches!(operand.kind, ValueKind::Temporary(_) | ValueKind::Local(_)) {
                        self.use_list.entry(operand.id).or_default().push((block_idx, pos));
                    }
                }
            }
            let terminator_pos = block.instructions.len();
            for operand in block.terminator.get_used_values() {
                if matches!(operand.kind, ValueKind::Temporary(_) | ValueKind::Local(_)) {
                    self.use_list.entry(operand.id).or_default().push((block_idx, terminator_pos));
                }
            }
        }
    }

    /// Enqueues every block containing a read of `id`, reachable or not —
    /// an unreachable user block is drained harmlessly once it later
    /// becomes reachable, so no information is lost by enqueueing early.
    fn enqueue_users(&mut self, id: ValueId) {
        if let Some(users) = self.use_list.get(&id) {
            for &(block_idx, _) in users {
                self.queue.push_back(block_idx);
            }
        }
    }

    fn visit_block(&mut self, function: &Function, block_idx: NodeIndex) {
        let block = &function.cfg.graph()[block_idx];
        for inst in &block.instructions {
            self.visit_instruction(function, inst);
        }
        self.visit_terminator(function, block_idx);
    }

    fn visit_instruction(&mut self, function: &Function, inst: &crate::ir::Instruction) {
        let Some(result) = &inst.result else {
            return;
        };
        let new = match &inst.kind {
            InstructionKind::Alloca { .. } => LatticeValue::Top,
            InstructionKind::Store { .. } => return, // no value-store entry for Store (see design notes)
            InstructionKind::Load { .. } | InstructionKind::GetElementPtr { .. } | InstructionKind::Call { .. } => {
                LatticeValue::Top
            }
            InstructionKind::Cast { value, .. } => self.values.lookup_value(value),
            InstructionKind::Binary { op, left, right, .. } => self.transfer_binary(*op, left, right),
            InstructionKind::Phi { incoming, .. } => self.transfer_phi(function, incoming),
        };
        if self.values.update_value(result.id, new) {
            self.enqueue_users(result.id);
        }
    }

    fn transfer_binary(&mut self, op: IrBinaryOp, left: &Value, right: &Value) -> LatticeValue {
        let l = self.values.lookup_value(left);
        let r = self.values.lookup_value(right);

        if op.is_compare() {
            return Self::transfer_compare(op, l, r);
        }

        if l == LatticeValue::Bottom || r == LatticeValue::Bottom {
            return LatticeValue::Bottom;
        }

        // Short-circuit rules: only fire when the decisive operand is a
        // known constant and the *other* operand is exactly Top (not
        // Bottom — a Bottom operand means the op hasn't executed yet on any
        // reachable path). Each branch is independently reachable, unlike
        // the inherited source where the And-branch was nested inside the
        // Or-branch's scope and so could never fire on its own.
        if op == IrBinaryOp::BitwiseOr {
            if let (LatticeValue::Constant(k), LatticeValue::Top) | (LatticeValue::Top, LatticeValue::Constant(k)) =
                (l, r)
            {
                if k != 0 {
                    return LatticeValue::Constant(1);
                }
            }
        }
        if op == IrBinaryOp::BitwiseAnd {
            if let (LatticeValue::Constant(0), LatticeValue::Top) | (LatticeValue::Top, LatticeValue::Constant(0)) =
                (l, r)
            {
                return LatticeValue::Constant(0);
            }
        }

        if l == LatticeValue::Top || r == LatticeValue::Top {
            return LatticeValue::Top;
        }

        let (LatticeValue::Constant(a), LatticeValue::Constant(b)) = (l, r) else {
            unreachable!("both operands are known constant at this point");
        };
        let k = match op {
            IrBinaryOp::Add => a.wrapping_add(b),
            IrBinaryOp::Sub => a.wrapping_sub(b),
            IrBinaryOp::Mul => a.wrapping_mul(b),
            IrBinaryOp::BitwiseOr => i32::from(a != 0 || b != 0),
            IrBinaryOp::BitwiseAnd => i32::from(a != 0 && b != 0),
            IrBinaryOp::Equal | IrBinaryOp::NotEqual | IrBinaryOp::Less => {
                unreachable!("compares are handled by transfer_compare")
            }
        };
        LatticeValue::Constant(k)
    }

    /// Each predicate is an independent match arm — the inherited source's
    /// switch fell through every case into `default: return` with no
    /// `break`, so no compare ever actually produced a value.
    fn transfer_compare(op: IrBinaryOp, l: LatticeValue, r: LatticeValue) -> LatticeValue {
        if l == LatticeValue::Bottom || r == LatticeValue::Bottom {
            return LatticeValue::Bottom;
        }
        if l == LatticeValue::Top || r == LatticeValue::Top {
            return LatticeValue::Top;
        }
        let (LatticeValue::Constant(a), LatticeValue::Constant(b)) = (l, r) else {
            unreachable!("both operands are known constant at this point");
        };
        let result = match op {
            IrBinaryOp::Equal => a == b,
            IrBinaryOp::NotEqual => a != b,
            IrBinaryOp::Less => a < b,
            _ => return LatticeValue::Top, // unsupported predicate: conservative
        };
        LatticeValue::Constant(i32::from(result))
    }

    /// Joins the lattice elements of every incoming value whose edge
    /// originates in a *reachable* predecessor block, checked per edge —
    /// not a single blanket "does this block have any reachable
    /// predecessor" test as in the inherited source, which could let a
    /// value from an unreachable predecessor leak into the join.
    fn transfer_phi(&mut self, function: &Function, incoming: &[(Value, std::sync::Arc<str>)]) -> LatticeValue {
        let mut acc = LatticeValue::Bottom;
        for (value, label) in incoming {
            let reachable = function.cfg.find_block_by_label(label).is_some_and(|idx| self.blocks.is_reachable(idx));
            if !reachable {
                continue;
            }
            acc = acc.join(self.values.lookup_value(value));
        }
        acc
    }

    fn visit_terminator(&mut self, function: &Function, block_idx: NodeIndex) {
        let block = &function.cfg.graph()[block_idx];
        match &block.terminator.kind {
            TerminatorKind::Unreachable => {}
            TerminatorKind::Return { value, .. } => {
                // Do not enqueue CFG successors of a return: there are none
                // within the function, and propagation must not step into
                // callers.
                let new = self.values.lookup_value(value);
                let old = self.terminator_values.get(&block_idx).copied().unwrap_or(LatticeValue::Bottom);
                self.terminator_values.insert(block_idx, old.join(new));
            }
            TerminatorKind::Branch { label } => {
                if let Some(target) = function.cfg.find_block_by_label(label)
                    && self.blocks.mark_reachable(target)
                {
                    self.queue.push_back(target);
                }
            }
            TerminatorKind::ConditionalBranch { condition, true_label, false_label } => {
                let cond = self.values.lookup_value(condition);
                let old = self.terminator_values.get(&block_idx).copied().unwrap_or(LatticeValue::Bottom);
                self.terminator_values.insert(block_idx, old.join(cond));

                let true_idx = function.cfg.find_block_by_label(true_label);
                let false_idx = function.cfg.find_block_by_label(false_label);
                match cond {
                    LatticeValue::Constant(k) => {
                        let taken = if k != 0 { true_idx } else { false_idx };
                        if let Some(taken) = taken
                            && self.blocks.mark_reachable(taken)
                        {
                            self.queue.push_back(taken);
                        }
                    }
                    LatticeValue::Top => {
                        for target in [true_idx, false_idx].into_iter().flatten() {
                            if self.blocks.mark_reachable(target) {
                                self.queue.push_back(target);
                            }
                        }
                    }
                    LatticeValue::Bottom => {
                        // The branch cannot yet execute; revisit once the
                        // condition firms up (it will re-enqueue this block
                        // through `enqueue_users` when it does).
                    }
                }
            }
        }
    }
}
