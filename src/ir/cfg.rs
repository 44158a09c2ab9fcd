// src/ir/cfg.rs
use super::basic_block::BasicBlock;
use super::instruction::{Instruction, InstructionKind};
use super::terminator::Terminator;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;
use std::collections::HashSet;
use std::sync::Arc;

/// The control-flow graph of a single function.
///
/// Blocks are nodes in a `petgraph::DiGraph`, addressed by a stable
/// `NodeIndex` rather than by label once constructed — this is the
/// representation the SCCP engine and rewrite phase are built against, as
/// opposed to a label-keyed `HashMap` of successor/predecessor sets.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    graph: DiGraph<BasicBlock, ()>,
    pub entry_label: Arc<str>,
}

impl ControlFlowGraph {
    #[must_use]
    pub fn new(entry_label: Arc<str>) -> Self {
        Self { graph: DiGraph::new(), entry_label }
    }

    #[must_use]
    pub const fn graph(&self) -> &DiGraph<BasicBlock, ()> {
        &self.graph
    }

    pub const fn graph_mut(&mut self) -> &mut DiGraph<BasicBlock, ()> {
        &mut self.graph
    }

    #[must_use]
    pub fn entry_label(&self) -> &str {
        &self.entry_label
    }

    pub fn add_block(&mut self, block: BasicBlock) -> NodeIndex {
        self.graph.add_node(block)
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.add_edge(from, to, ());
    }

    #[must_use]
    pub fn find_block_by_label(&self, label: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&idx| self.graph[idx].label.as_ref() == label)
    }

    #[must_use]
    pub fn get_block(&self, label: &str) -> Option<&BasicBlock> {
        self.find_block_by_label(label).map(|idx| &self.graph[idx])
    }

    pub fn get_block_mut(&mut self, label: &str) -> Option<&mut BasicBlock> {
        self.find_block_by_label(label).and_then(|idx| self.graph.node_weight_mut(idx))
    }

    #[must_use]
    pub fn get_entry_block_index(&self) -> Option<NodeIndex> {
        self.find_block_by_label(&self.entry_label)
    }

    pub fn add_instruction_to_block(&mut self, block_label: &str, instruction: Instruction) -> bool {
        if let Some(block) = self.get_block_mut(block_label) {
            block.instructions.push(instruction);
            true
        } else {
            false
        }
    }

    pub fn set_block_terminator(&mut self, block_label: &str, terminator: Terminator) -> bool {
        if let Some(block) = self.get_block_mut(block_label) {
            block.set_terminator(terminator);
            true
        } else {
            false
        }
    }

    pub fn connect_blocks(&mut self, from_label: &str, to_label: &str) -> bool {
        if let (Some(from_idx), Some(to_idx)) =
            (self.find_block_by_label(from_label), self.find_block_by_label(to_label))
        {
            self.add_edge(from_idx, to_idx);
            true
        } else {
            false
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.graph.node_weights()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Direct successors of `node`, in edge-insertion order.
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Outgoing)
    }

    /// Direct predecessors of `node`, in edge-insertion order.
    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    /// Removes a block by `NodeIndex`.
    ///
    /// Callers (the SCCP rewrite phase) must first strip any `Phi` incoming
    /// edges in surviving successor blocks that reference this block's
    /// label — `petgraph::remove_node` silently drops edges, which would
    /// otherwise leave a phi referencing a predecessor that no longer exists
    /// in the graph.
    pub fn remove_node(&mut self, node: NodeIndex) -> Option<BasicBlock> {
        self.graph.remove_node(node)
    }

    /// Drops every incoming entry of every `Phi` in `successor` whose label matches `dead_label`.
    pub fn strip_phi_edges(&mut self, successor: NodeIndex, dead_label: &str) {
        let Some(block) = self.graph.node_weight_mut(successor) else { return };
        for inst in &mut block.instructions {
            if let InstructionKind::Phi { incoming, .. } = &mut inst.kind {
                incoming.retain(|(_, label)| label.as_ref() != dead_label);
            }
        }
    }

    #[must_use]
    pub fn dfs_post_order(&self) -> Box<dyn Iterator<Item = NodeIndex> + '_> {
        if let Some(entry_idx) = self.get_entry_block_index() {
            let mut dfs = Dfs::new(&self.graph, entry_idx);
            Box::new(std::iter::from_fn(move || dfs.next(&self.graph)))
        } else {
            Box::new(std::iter::empty())
        }
    }

    /// Verifies the integrity of the control flow graph: an entry block
    /// exists, every block has a terminator, and every terminator's targets
    /// refer to blocks actually present in the graph.
    ///
    /// # Errors
    /// Returns a description of the first violation found.
    pub fn verify(&self) -> Result<(), String> {
        if self.get_entry_block_index().is_none() {
            return Err(format!("CFG has no entry block with label '{}'", self.entry_label));
        }

        for block in self.blocks() {
            if !block.terminator.is_terminator() {
                return Err(format!("block '{}' has no valid terminator", block.label));
            }
        }

        let label_set: HashSet<Arc<str>> = self.blocks().map(|b| b.label.clone()).collect();
        for block in self.blocks() {
            for target_label in block.terminator.get_targets() {
                if !label_set.contains(target_label.as_str()) {
                    return Err(format!("block '{}' refers to non-existent block '{target_label}'", block.label));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::source_span::SourceSpan;

    fn block(label: &str) -> BasicBlock {
        BasicBlock::new(label, SourceSpan::default())
    }

    #[test]
    fn verify_rejects_missing_entry() {
        let cfg = ControlFlowGraph::new("entry".into());
        assert!(cfg.verify().is_err());
    }

    #[test]
    fn verify_rejects_dangling_branch_target() {
        use crate::ir::terminator::TerminatorKind;
        let mut cfg = ControlFlowGraph::new("entry".into());
        let idx = cfg.add_block(block("entry"));
        cfg.graph_mut()[idx].set_terminator(Terminator::new(
            TerminatorKind::Branch { label: "missing".into() },
            SourceSpan::default(),
        ));
        assert!(cfg.verify().is_err());
    }

    #[test]
    fn remove_node_drops_edges() {
        use crate::ir::terminator::TerminatorKind;
        let mut cfg = ControlFlowGraph::new("entry".into());
        let entry = cfg.add_block(block("entry"));
        let dead = cfg.add_block(block("dead"));
        cfg.add_edge(entry, dead);
        cfg.graph_mut()[entry].set_terminator(Terminator::new(
            TerminatorKind::Branch { label: "dead".into() },
            SourceSpan::default(),
        ));
        cfg.remove_node(dead);
        assert_eq!(cfg.predecessors(entry).count(), 0);
        assert!(cfg.find_block_by_label("dead").is_none());
    }
}
