//! Sparse Conditional Constant Propagation.
//!
//! The pass is the composition of three cooperating pieces, kept in their
//! own modules: [`lattice`] (the monotone value/reachability stores),
//! [`engine`] (the work-list fixpoint driver and per-opcode transfer
//! functions), and [`rewriter`] (turns the fixpointed lattice into an
//! actual IR edit). [`SccpPass`] just wires the three together and exposes
//! the [`super::Phase`] the pipeline driver expects.
pub mod engine;
pub mod lattice;
pub mod rewriter;

use super::phase::Phase;
use crate::error::compile_error::CompileError;
use crate::ir::Module;
use engine::{MaxIterationsExceeded, SccpEngine};
use rewriter::RewriteStats;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SccpError {
    #[error("sccp exceeded its {0} iteration budget without reaching a fixpoint")]
    MaxIterationsExceeded(usize),
}

impl From<MaxIterationsExceeded> for SccpError {
    fn from(e: MaxIterationsExceeded) -> Self {
        SccpError::MaxIterationsExceeded(e.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SccpConfig {
    pub verbose: bool,
    pub max_iterations: usize,
}

impl Default for SccpConfig {
    fn default() -> Self {
        Self { verbose: false, max_iterations: 100_000 }
    }
}

pub struct SccpPass {
    config: SccpConfig,
}

impl SccpPass {
    pub fn new(config: SccpConfig) -> Self {
        Self { config }
    }

    /// Runs the pass over a single function. Exposed separately from
    /// `Phase::run` so callers (and tests) can see the per-function
    /// rewrite statistics directly, without wrapping them in `CompileError`.
    pub fn run_function(&mut self, function: &mut crate::ir::Function) -> Result<RewriteStats, SccpError> {
        let mut engine = SccpEngine::new(self.config.verbose, self.config.max_iterations);
        engine.run(function)?;
        let (_changed, stats) = rewriter::rewrite(function, &engine);
        if self.config.verbose && !stats.is_empty() {
            println!("{stats}");
        }
        Ok(stats)
    }
}

impl Phase for SccpPass {
    fn name(&self) -> &'static str {
        "sccp"
    }

    fn run(&mut self, ir: &mut Module) -> Result<bool, CompileError> {
        let mut changed = false;
        for function in &mut ir.functions {
            let stats = self.run_function(function).map_err(CompileError::Optimizer)?;
            changed |= !stats.is_empty();
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::basic_block::BasicBlock;
    use crate::ir::instruction::{Instruction, InstructionKind, IrBinaryOp};
    use crate::ir::terminator::{Terminator, TerminatorKind};
    use crate::ir::types::IrType;
    use crate::ir::value::IrLiteralValue;
    use crate::ir::{Function, Value};
    use crate::location::source_span::SourceSpan;

    fn span() -> SourceSpan {
        SourceSpan::default()
    }

    #[test]
    fn folds_constant_addition_end_to_end() {
        let mut function = Function::new("f", vec![], IrType::I32);
        let entry = function.cfg.add_block(BasicBlock::new("entry", span()));
        let sum = Value::new_temporary(0, IrType::I32);
        {
            let block = &mut function.cfg.graph_mut()[entry];
            block.instructions.push(
                Instruction::new(
                    InstructionKind::Binary {
                        op: IrBinaryOp::Add,
                        left: Value::new_literal(IrLiteralValue::I32(40)),
                        right: Value::new_literal(IrLiteralValue::I32(2)),
                        ty: IrType::I32,
                    },
                    span(),
                )
                .with_result(sum),
            );
            block.set_terminator(Terminator::new(TerminatorKind::Return { value: sum, ty: IrType::I32 }, span()));
        }

        let mut pass = SccpPass::new(SccpConfig::default());
        let stats = pass.run_function(&mut function).unwrap();
        assert_eq!(stats.materialized_constants, 1);
        let TerminatorKind::Return { value, .. } = &function.cfg.graph()[entry].terminator.kind else {
            panic!("expected return")
        };
        assert_eq!(value.as_constant_i32(), Some(42));
    }

    #[test]
    fn reports_max_iterations_exceeded() {
        // Two blocks means two work-list pops (entry, then b1) even on this
        // entirely acyclic, already-folded program; a budget of one pop is
        // exceeded on the second regardless of what either block computes.
        let mut function = Function::new("f", vec![], IrType::I32);
        let entry = function.cfg.add_block(BasicBlock::new("entry", span()));
        let b1 = function.cfg.add_block(BasicBlock::new("b1", span()));
        function.cfg.add_edge(entry, b1);
        function.cfg.graph_mut()[entry]
            .set_terminator(Terminator::new(TerminatorKind::Branch { label: "b1".into() }, span()));
        function.cfg.graph_mut()[b1].set_terminator(Terminator::new(
            TerminatorKind::Return { value: Value::new_literal(IrLiteralValue::I32(0)), ty: IrType::I32 },
            span(),
        ));

        let mut pass = SccpPass::new(SccpConfig { verbose: false, max_iterations: 1 });
        let err = pass.run_function(&mut function).unwrap_err();
        assert_eq!(err, SccpError::MaxIterationsExceeded(1));
    }

    #[test]
    fn phase_impl_reports_change_across_module() {
        let mut module = Module::new("prog");
        let mut function = Function::new("main", vec![], IrType::I32);
        let entry = function.cfg.add_block(BasicBlock::new("entry", span()));
        function.cfg.graph_mut()[entry].set_terminator(Terminator::new(
            TerminatorKind::Return { value: Value::new_literal(IrLiteralValue::I32(7)), ty: IrType::I32 },
            span(),
        ));
        module.add_function(function);

        let mut pass = SccpPass::new(SccpConfig::default());
        let changed = Phase::run(&mut pass, &mut module).unwrap();
        assert!(!changed); // nothing to fold: already a bare literal return
    }
}
