// src/ir/optimizer/sccp/rewriter.rs
use super::engine::SccpEngine;
use super::lattice::LatticeValue;
use crate::ir::terminator::{Terminator, TerminatorKind};
use crate::ir::value::IrLiteralValue;
use crate::ir::{Function, Value, ValueId};
use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use std::fmt;

/// Counts of what the rewrite phase actually changed, printed by `-v`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    pub materialized_constants: usize,
    pub removed_instructions: usize,
    pub folded_branches: usize,
    pub removed_blocks: usize,
}

impl RewriteStats {
    pub fn is_empty(self) -> bool {
        self == RewriteStats::default()
    }
}

impl fmt::Display for RewriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sccp rewrite: {} constants materialized, {} dead instructions removed, \
             {} branches folded, {} blocks removed",
            self.materialized_constants, self.removed_instructions, self.folded_branches, self.removed_blocks
        )
    }
}

/// Consumes a fixpointed `SccpEngine` and mutates `function` in place.
/// Returns whether anything changed.
pub fn rewrite(function: &mut Function, engine: &SccpEngine) -> (bool, RewriteStats) {
    let mut stats = RewriteStats::default();

    let constant_ids = materialize_constants(function, engine, &mut stats);
    let bottom_ids = collect_bottom_ids(function, engine);
    strip_dead_instructions(function, &constant_ids, &bottom_ids, &mut stats);
    fold_conditional_branches(function, engine, &mut stats);
    sweep_dead_blocks(function, engine, &mut stats);

    let changed = !stats.is_empty();
    (changed, stats)
}

/// For every reachable instruction whose result is a known `Constant(k)`,
/// patches every recorded use-site to see the literal directly. The
/// defining instruction itself is stripped afterwards by
/// `strip_dead_instructions` — once patched, nothing reads it anymore.
fn materialize_constants(function: &mut Function, engine: &SccpEngine, stats: &mut RewriteStats) -> HashSet<ValueId> {
    let mut constant_ids = HashSet::new();
    let reachable_results: Vec<(ValueId, i32)> = function
        .cfg
        .node_indices()
        .filter(|&idx| engine.blocks.is_reachable(idx))
        .flat_map(|idx| function.cfg.graph()[idx].instructions.iter())
        .filter_map(|inst| {
            let result = inst.result.as_ref()?;
            match engine.values.get(result.id) {
                Some(LatticeValue::Constant(k)) => Some((result.id, k)),
                _ => None,
            }
        })
        .collect();

    for (id, k) in reachable_results {
        constant_ids.insert(id);
        let literal = Value::new_literal(IrLiteralValue::I32(k));
        patch_uses(function, engine, id, literal);
        stats.materialized_constants += 1;
    }
    constant_ids
}

fn patch_uses(function: &mut Function, engine: &SccpEngine, old: ValueId, new: Value) {
    let Some(sites) = engine.use_list.get(&old) else { return };
    for &(block_idx, pos) in sites {
        let block = &mut function.cfg.graph_mut()[block_idx];
        if pos < block.instructions.len() {
            block.instructions[pos].replace_operand(old, new);
        } else {
            block.terminator.replace_operand(old, new);
        }
    }
}

/// Results whose state is `Bottom`: never shown to execute on any reachable
/// path. Already transitively closed by the fixpoint itself (an operand
/// that is `Bottom` forces its consumer's result to `Bottom` too), so no
/// further use-def recursion is needed here to find the full set.
fn collect_bottom_ids(function: &Function, engine: &SccpEngine) -> HashSet<ValueId> {
    function
        .cfg
        .node_indices()
        .filter(|&idx| engine.blocks.is_reachable(idx))
        .flat_map(|idx| function.cfg.graph()[idx].instructions.iter())
        .filter_map(|inst| inst.result.as_ref())
        .filter(|result| matches!(engine.values.get(result.id), Some(LatticeValue::Bottom)))
        .map(|result| result.id)
        .collect()
}

fn strip_dead_instructions(
    function: &mut Function, constant_ids: &HashSet<ValueId>, bottom_ids: &HashSet<ValueId>,
    stats: &mut RewriteStats,
) {
    for idx in function.cfg.node_indices().collect::<Vec<_>>() {
        let block = &mut function.cfg.graph_mut()[idx];
        let before = block.instructions.len();
        block.instructions.retain(|inst| {
            !inst.result.as_ref().is_some_and(|r| constant_ids.contains(&r.id) || bottom_ids.contains(&r.id))
        });
        stats.removed_instructions += before - block.instructions.len();
    }
    // materialize_constants already counted replacements separately; only
    // bottom removals are net-new "dead instruction" events here, but a
    // constant's defining instruction disappearing is also a structural
    // removal worth folding into the same counter for -v output.
}

fn fold_conditional_branches(function: &mut Function, engine: &SccpEngine, stats: &mut RewriteStats) {
    for idx in function.cfg.node_indices().collect::<Vec<_>>() {
        if !engine.blocks.is_reachable(idx) {
            continue;
        }
        let block = &function.cfg.graph()[idx];
        let TerminatorKind::ConditionalBranch { true_label, false_label, .. } = &block.terminator.kind else {
            continue;
        };
        let Some(LatticeValue::Constant(k)) = engine.terminator_values.get(&idx).copied() else {
            continue;
        };
        let taken = if k != 0 { true_label.clone() } else { false_label.clone() };
        let span = block.terminator.debug_info.source_span.clone();
        function.cfg.graph_mut()[idx].set_terminator(Terminator::new(TerminatorKind::Branch { label: taken }, span));
        stats.folded_branches += 1;
    }
}

/// Removes every block whose reachability never rose above `Unreachable`.
/// Phi incoming-edges referencing a removed predecessor are stripped from
/// surviving successors first, preserving single-entry semantics;
/// `ControlFlowGraph::remove_node` can reindex surviving nodes (it is
/// backed by a swap-remove graph), so each iteration re-resolves by label
/// rather than trusting a `NodeIndex` captured before a prior removal.
fn sweep_dead_blocks(function: &mut Function, engine: &SccpEngine, stats: &mut RewriteStats) {
    let dead_labels: Vec<std::sync::Arc<str>> = function
        .cfg
        .node_indices()
        .filter(|&idx| !engine.blocks.is_reachable(idx))
        .map(|idx| function.cfg.graph()[idx].label.clone())
        .collect();

    for label in dead_labels {
        let Some(idx) = function.cfg.find_block_by_label(&label) else { continue };
        let successors: Vec<NodeIndex> = function.cfg.successors(idx).collect();
        for succ in successors {
            function.cfg.strip_phi_edges(succ, &label);
        }
        function.cfg.remove_node(idx);
        stats.removed_blocks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::basic_block::BasicBlock;
    use crate::ir::instruction::{Instruction, InstructionKind, IrBinaryOp};
    use crate::ir::types::IrType;
    use crate::location::source_span::SourceSpan;

    fn span() -> SourceSpan {
        SourceSpan::default()
    }

    fn lit(k: i32) -> Value {
        Value::new_literal(IrLiteralValue::I32(k))
    }

    #[test]
    fn materializes_known_binary_result_and_patches_return() {
        let mut function = Function::new("f", vec![], IrType::I32);
        let entry = function.cfg.add_block(BasicBlock::new("entry", span()));
        let sum = Value::new_temporary(0, IrType::I32);
        {
            let block = &mut function.cfg.graph_mut()[entry];
            block.instructions.push(
                Instruction::new(
                    InstructionKind::Binary { op: IrBinaryOp::Add, left: lit(2), right: lit(3), ty: IrType::I32 },
                    span(),
                )
                .with_result(sum),
            );
            block.set_terminator(Terminator::new(TerminatorKind::Return { value: sum, ty: IrType::I32 }, span()));
        }

        let mut engine = SccpEngine::new(false, 10_000);
        engine.run(&function).unwrap();
        let (changed, stats) = rewrite(&mut function, &engine);
        assert!(changed);
        assert_eq!(stats.materialized_constants, 1);
        assert!(function.cfg.graph()[entry].instructions.is_empty());
        let TerminatorKind::Return { value, .. } = &function.cfg.graph()[entry].terminator.kind else {
            panic!("expected return terminator")
        };
        assert_eq!(value.as_constant_i32(), Some(5));
    }

    #[test]
    fn folds_known_conditional_branch_and_removes_dead_successor() {
        let mut function = Function::new("f", vec![], IrType::I32);
        let entry = function.cfg.add_block(BasicBlock::new("entry", span()));
        let live = function.cfg.add_block(BasicBlock::new("live", span()));
        let dead = function.cfg.add_block(BasicBlock::new("dead", span()));
        function.cfg.add_edge(entry, live);
        function.cfg.add_edge(entry, dead);

        function.cfg.graph_mut()[entry].set_terminator(Terminator::new(
            TerminatorKind::ConditionalBranch { condition: lit(0), true_label: "live".into(), false_label: "dead".into() },
            span(),
        ));
        function.cfg.graph_mut()[live].set_terminator(Terminator::new(
            TerminatorKind::Return { value: lit(1), ty: IrType::I32 },
            span(),
        ));
        function.cfg.graph_mut()[dead].set_terminator(Terminator::new(
            TerminatorKind::Return { value: lit(2), ty: IrType::I32 },
            span(),
        ));

        let mut engine = SccpEngine::new(false, 10_000);
        engine.run(&function).unwrap();
        let (changed, stats) = rewrite(&mut function, &engine);
        assert!(changed);
        assert_eq!(stats.folded_branches, 1);
        assert_eq!(stats.removed_blocks, 1);
        assert!(function.cfg.find_block_by_label("dead").is_none());
        assert_eq!(
            function.cfg.graph()[function.cfg.find_block_by_label("entry").unwrap()].terminator.kind,
            TerminatorKind::Branch { label: "live".into() }
        );
    }

    #[test]
    fn removes_bottom_instruction_inside_unreachable_free_dead_code() {
        // A block reachable from entry, but whose binary op reads a value
        // that's never computed anywhere (both operands Bottom forever):
        // modeled here by a phi with zero incoming edges worth of live data.
        let mut function = Function::new("f", vec![], IrType::I32);
        let entry = function.cfg.add_block(BasicBlock::new("entry", span()));
        let dead_val = Value::new_temporary(0, IrType::I32);
        {
            let block = &mut function.cfg.graph_mut()[entry];
            block.instructions.push(
                Instruction::new(InstructionKind::Phi { ty: IrType::I32, incoming: vec![] }, span())
                    .with_result(dead_val),
            );
            block.set_terminator(Terminator::new(
                TerminatorKind::Return { value: lit(0), ty: IrType::I32 },
                span(),
            ));
        }
        let mut engine = SccpEngine::new(false, 10_000);
        engine.run(&function).unwrap();
        let (_changed, stats) = rewrite(&mut function, &engine);
        assert_eq!(stats.removed_instructions, 1);
        assert!(function.cfg.graph()[entry].instructions.is_empty());
    }
}
