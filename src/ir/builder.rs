// src/ir/builder.rs
//! Lowers the parsed AST straight into SSA-form IR.
//!
//! Local variables are never spilled through `alloca`/`store`/`load`: each
//! read resolves against a scope-stack environment of `Value`s carried by
//! the builder, and every `if`/`while` merge point gets a `Phi` inserted on
//! the spot. Building SSA directly like this (rather than emitting naive
//! stack-slot code and running a separate mem2reg pass) is what lets
//! `ir::optimizer::sccp` actually fold the programs this crate compiles —
//! a stack slot's `load` is hardwired to `top`, so routing ordinary locals
//! through memory would make them permanently unoptimizable.
//!
//! Function parameters have no instruction that naturally produces them, so
//! each gets a `Load` from its own local slot synthesized at function
//! entry: `Load` already evaluates to `top`, which is exactly the right
//! starting point for a value the caller controls and the callee cannot see
//! through.
use crate::error::compile_error::CompileError;
use crate::ir::basic_block::BasicBlock;
use crate::ir::instruction::{Instruction, InstructionKind, IrBinaryOp};
use crate::ir::terminator::{Terminator, TerminatorKind};
use crate::ir::types::IrType;
use crate::ir::value::kind::LocalSlot;
use crate::ir::value::IrLiteralValue;
use crate::ir::{Function, Module, Value};
use crate::location::source_span::SourceSpan;
use crate::parser::ast::{BinaryOp, Expr, Parameter, Stmt, UnaryOp};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use std::sync::Arc;

/// A lexical scope stack of name -> SSA value, mirroring the nesting the
/// semantic pass already validated. Cloned wholesale at branch points so
/// each arm of an `if`/`while` can diverge before being reconciled by a phi.
type Env = Vec<HashMap<String, Value>>;

pub struct IrBuilder;

impl IrBuilder {
    /// Lowers every top-level function definition into an IR `Module`.
    /// Assumes the program already passed `semantic::SemanticAnalyzer` —
    /// anything else at top level is silently skipped.
    pub fn build_module(name: &str, program: &[Stmt]) -> Result<Module, CompileError> {
        let mut module = Module::new(name);
        for stmt in program {
            if let Stmt::Function { name, parameters, body, span } = stmt {
                let function = FunctionBuilder::new(name, parameters, span).build(body)?;
                module.add_function(function);
            }
        }
        Ok(module)
    }
}

struct FunctionBuilder {
    function: Function,
    current: NodeIndex,
    env: Env,
    temp_counter: u64,
    local_counter: u32,
    block_counter: u32,
}

impl FunctionBuilder {
    fn new(name: &str, parameters: &[Parameter], span: &SourceSpan) -> Self {
        let ir_params: Vec<(Arc<str>, IrType)> = parameters.iter().map(|p| (Arc::from(p.name.as_str()), IrType::I32)).collect();
        let mut function = Function::new(name, ir_params, IrType::I32);
        let entry = function.cfg.add_block(BasicBlock::new("entry", span.clone()));

        let mut builder =
            Self { function, current: entry, env: vec![HashMap::new()], temp_counter: 0, local_counter: 0, block_counter: 0 };

        for param in parameters {
            let slot = Value::new_local(builder.fresh_local(), IrType::I32);
            let loaded = builder.fresh_temp(IrType::I32);
            builder.push_instruction(Instruction::new(InstructionKind::Load { src: slot, ty: IrType::I32 }, param.span.clone()).with_result(loaded));
            builder.declare(&param.name, loaded);
        }
        builder
    }

    fn build(mut self, body: &[Stmt]) -> Result<Function, CompileError> {
        self.build_stmts(body)?;
        if !self.is_terminated() {
            // Falling off the end of a function body without an explicit
            // `return` is only reachable for `int main() { ... }`-style
            // programs in this subset; default to returning zero.
            let span = self.function.cfg.graph()[self.current].source_span.clone();
            self.set_terminator(Terminator::new(TerminatorKind::Return { value: Value::new_literal(IrLiteralValue::I32(0)), ty: IrType::I32 }, span));
        }
        Ok(self.function)
    }

    fn fresh_temp(&mut self, ty: IrType) -> Value {
        let value = Value::new_temporary(self.temp_counter, ty);
        self.temp_counter += 1;
        value
    }

    fn fresh_local(&mut self) -> LocalSlot {
        let slot = LocalSlot(self.local_counter);
        self.local_counter += 1;
        slot
    }

    fn fresh_label(&mut self, prefix: &str) -> Arc<str> {
        let label = format!("{prefix}.{}", self.block_counter);
        self.block_counter += 1;
        label.into()
    }

    fn new_block(&mut self, label: Arc<str>, span: &SourceSpan) -> NodeIndex {
        self.function.cfg.add_block(BasicBlock::new(&label, span.clone()))
    }

    fn switch_to(&mut self, idx: NodeIndex) {
        self.current = idx;
    }

    fn current_label(&self) -> Arc<str> {
        self.function.cfg.graph()[self.current].label.clone()
    }

    fn is_terminated(&self) -> bool {
        self.function.cfg.graph()[self.current].terminator.is_terminator()
    }

    fn push_instruction(&mut self, inst: Instruction) {
        self.function.cfg.graph_mut()[self.current].instructions.push(inst);
    }

    fn set_terminator(&mut self, term: Terminator) {
        self.function.cfg.graph_mut()[self.current].set_terminator(term);
    }

    fn push_scope(&mut self) {
        self.env.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.env.pop();
    }

    fn declare(&mut self, name: &str, value: Value) {
        self.env.last_mut().expect("at least one scope").insert(name.to_string(), value);
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        self.env.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    fn assign(&mut self, name: &str, value: Value) -> Option<()> {
        for scope in self.env.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return Some(());
            }
        }
        None
    }

    fn snapshot_env(&self) -> Env {
        self.env.clone()
    }

    fn replace_env(&mut self, env: Env) {
        self.env = env;
    }

    fn build_stmts(&mut self, stmts: &[Stmt]) -> Result<(), CompileError> {
        for stmt in stmts {
            self.build_stmt(stmt)?;
            if self.is_terminated() {
                break;
            }
        }
        Ok(())
    }

    fn build_scoped_block(&mut self, stmts: &[Stmt]) -> Result<(), CompileError> {
        self.push_scope();
        self.build_stmts(stmts)?;
        self.pop_scope();
        Ok(())
    }

    fn build_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Expression { expr } => {
                self.build_expr(expr)?;
                Ok(())
            }
            Stmt::VarDeclaration { name, initializer, span } => {
                let value = match initializer {
                    Some(expr) => {
                        let value = self.build_expr(expr)?;
                        self.coerce_to_i32(value, span)
                    }
                    // An uninitialized local reads as zero rather than an
                    // undef lattice state this crate has no room to model.
                    None => Value::new_literal(IrLiteralValue::I32(0)),
                };
                self.declare(name, value);
                Ok(())
            }
            Stmt::If { condition, then_branch, else_branch, span } => {
                self.build_if(condition, then_branch, else_branch.as_deref(), span)
            }
            Stmt::While { condition, body, span } => self.build_while(condition, body, span),
            Stmt::Block { statements, .. } => self.build_scoped_block(statements),
            Stmt::Return { value, span } => {
                let ret_value = match value {
                    Some(expr) => {
                        let value = self.build_expr(expr)?;
                        self.coerce_to_i32(value, span)
                    }
                    None => Value::new_literal(IrLiteralValue::I32(0)),
                };
                self.set_terminator(Terminator::new(TerminatorKind::Return { value: ret_value, ty: IrType::I32 }, span.clone()));
                Ok(())
            }
            Stmt::Function { span, .. } => {
                Err(CompileError::SemanticError { message: "nested function definitions are not supported".into(), span: span.clone() })
            }
        }
    }

    fn build_expr(&mut self, expr: &Expr) -> Result<Value, CompileError> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::new_literal(IrLiteralValue::I32(*value))),
            Expr::Variable { name, span } => self
                .lookup(name)
                .ok_or_else(|| CompileError::SemanticError { message: format!("undeclared variable '{name}'"), span: span.clone() }),
            Expr::Grouping { expr, .. } => self.build_expr(expr),
            Expr::Unary { op, expr, span } => {
                let operand = self.build_expr(expr)?;
                match op {
                    UnaryOp::Negate => {
                        let result = self.fresh_temp(IrType::I32);
                        self.push_instruction(
                            Instruction::new(
                                InstructionKind::Binary { op: IrBinaryOp::Sub, left: Value::new_literal(IrLiteralValue::I32(0)), right: operand, ty: IrType::I32 },
                                span.clone(),
                            )
                            .with_result(result),
                        );
                        Ok(result)
                    }
                }
            }
            Expr::Binary { left, op, right, span } => {
                let left = self.build_expr(left)?;
                let right = self.build_expr(right)?;
                let (op, ty) = lower_binary_op(*op);
                let result = self.fresh_temp(ty);
                self.push_instruction(Instruction::new(InstructionKind::Binary { op, left, right, ty }, span.clone()).with_result(result));
                Ok(result)
            }
            Expr::Assign { name, value, span } => {
                let value = self.build_expr(value)?;
                let value = self.coerce_to_i32(value, span);
                self.assign(name, value)
                    .ok_or_else(|| CompileError::SemanticError { message: format!("assignment to undeclared variable '{name}'"), span: span.clone() })?;
                Ok(value)
            }
            Expr::Call { callee, arguments, span } => {
                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    let value = self.build_expr(arg)?;
                    args.push(self.coerce_to_i32(value, span));
                }
                let result = self.fresh_temp(IrType::I32);
                self.push_instruction(
                    Instruction::new(InstructionKind::Call { func: Arc::from(callee.as_str()), args, ty: IrType::I32 }, span.clone()).with_result(result),
                );
                Ok(result)
            }
        }
    }

    /// Comparisons lower to a `bool`-typed `Binary`; everywhere a value is
    /// stored, returned, or passed as an argument it must read back as an
    /// `i32`. `Cast` is a pure lattice passthrough, so this costs SCCP nothing.
    fn coerce_to_i32(&mut self, value: Value, span: &SourceSpan) -> Value {
        if value.ty != IrType::Bool {
            return value;
        }
        let result = self.fresh_temp(IrType::I32);
        self.push_instruction(Instruction::new(InstructionKind::Cast { value, from_ty: IrType::Bool, to_ty: IrType::I32 }, span.clone()).with_result(result));
        result
    }

    fn build_if(&mut self, condition: &Expr, then_branch: &[Stmt], else_branch: Option<&[Stmt]>, span: &SourceSpan) -> Result<(), CompileError> {
        let cond_value = self.build_expr(condition)?;
        let cond_idx = self.current;
        let cond_label = self.current_label();
        let base_env = self.snapshot_env();

        let then_label = self.fresh_label("if.then");
        let merge_label = self.fresh_label("if.end");
        let then_idx = self.new_block(then_label.clone(), span);
        let merge_idx = self.new_block(merge_label.clone(), span);
        let else_label = else_branch.map(|_| self.fresh_label("if.else"));
        let else_idx = else_label.as_ref().map(|label| self.new_block(label.clone(), span));

        let false_target_idx = else_idx.unwrap_or(merge_idx);
        let false_target_label = else_label.clone().unwrap_or_else(|| merge_label.clone());
        self.switch_to(cond_idx);
        self.set_terminator(Terminator::new(
            TerminatorKind::ConditionalBranch { condition: cond_value, true_label: then_label.clone(), false_label: false_target_label },
            span.clone(),
        ));
        self.function.cfg.add_edge(cond_idx, then_idx);
        self.function.cfg.add_edge(cond_idx, false_target_idx);

        self.switch_to(then_idx);
        self.replace_env(base_env.clone());
        self.build_scoped_block(then_branch)?;
        let then_terminated = self.is_terminated();
        let then_end_label = self.current_label();
        if !then_terminated {
            self.set_terminator(Terminator::new(TerminatorKind::Branch { label: merge_label.clone() }, span.clone()));
            self.function.cfg.add_edge(self.current, merge_idx);
        }
        let then_env = self.snapshot_env();

        let (else_env, else_end_label, else_terminated) = if let (Some(else_stmts), Some(else_idx)) = (else_branch, else_idx) {
            self.switch_to(else_idx);
            self.replace_env(base_env.clone());
            self.build_scoped_block(else_stmts)?;
            let terminated = self.is_terminated();
            let end_label = self.current_label();
            if !terminated {
                self.set_terminator(Terminator::new(TerminatorKind::Branch { label: merge_label.clone() }, span.clone()));
                self.function.cfg.add_edge(self.current, merge_idx);
            }
            (self.snapshot_env(), end_label, terminated)
        } else {
            // No else branch: the false edge already goes straight to the
            // merge block carrying the pre-if environment unchanged.
            (base_env, cond_label, false)
        };

        self.switch_to(merge_idx);
        let merged_env = match (then_terminated, else_terminated) {
            (true, true) => then_env, // merge block is dead; any env placeholder works
            (true, false) => else_env,
            (false, true) => then_env,
            (false, false) => self.merge_envs(then_env, then_end_label, else_env, else_end_label, span),
        };
        self.replace_env(merged_env);
        Ok(())
    }

    /// Reconciles two environments that both reach the current block,
    /// inserting a `Phi` for every variable the two sides disagree on.
    fn merge_envs(&mut self, a: Env, a_label: Arc<str>, b: Env, b_label: Arc<str>, span: &SourceSpan) -> Env {
        let mut merged = a.clone();
        for (scope_idx, scope) in a.iter().enumerate() {
            for (name, a_value) in scope {
                let b_value = b[scope_idx][name];
                if a_value.id == b_value.id {
                    continue;
                }
                let phi_result = self.fresh_temp(a_value.ty);
                self.push_instruction(
                    Instruction::new(
                        InstructionKind::Phi { ty: a_value.ty, incoming: vec![(*a_value, a_label.clone()), (b_value, b_label.clone())] },
                        span.clone(),
                    )
                    .with_result(phi_result),
                );
                merged[scope_idx].insert(name.clone(), phi_result);
            }
        }
        merged
    }

    /// `while` needs its header's phis seeded before the body is built (a
    /// read inside the loop must see the phi, not the pre-loop value), then
    /// patched with the back-edge contribution once the body's end state is
    /// known. One phi per live variable regardless of whether the loop
    /// actually reassigns it — a loop-invariant variable just ends up with
    /// a phi of two identical incoming values, which SCCP folds for free.
    fn build_while(&mut self, condition: &Expr, body: &[Stmt], span: &SourceSpan) -> Result<(), CompileError> {
        let preheader_idx = self.current;
        let preheader_label = self.current_label();
        let preheader_env = self.snapshot_env();

        let header_label = self.fresh_label("while.cond");
        let body_label = self.fresh_label("while.body");
        let end_label = self.fresh_label("while.end");
        let header_idx = self.new_block(header_label.clone(), span);
        let body_idx = self.new_block(body_label.clone(), span);
        let end_idx = self.new_block(end_label.clone(), span);

        self.set_terminator(Terminator::new(TerminatorKind::Branch { label: header_label.clone() }, span.clone()));
        self.function.cfg.add_edge(preheader_idx, header_idx);

        self.switch_to(header_idx);
        let mut header_env = preheader_env.clone();
        let mut phi_count = 0usize;
        for (scope_idx, scope) in preheader_env.iter().enumerate() {
            for (name, value) in scope {
                let phi_result = self.fresh_temp(value.ty);
                self.push_instruction(
                    Instruction::new(InstructionKind::Phi { ty: value.ty, incoming: vec![(*value, preheader_label.clone())] }, span.clone())
                        .with_result(phi_result),
                );
                header_env[scope_idx].insert(name.clone(), phi_result);
                phi_count += 1;
            }
        }
        self.replace_env(header_env.clone());

        let cond_value = self.build_expr(condition)?;
        self.set_terminator(Terminator::new(
            TerminatorKind::ConditionalBranch { condition: cond_value, true_label: body_label.clone(), false_label: end_label.clone() },
            span.clone(),
        ));
        self.function.cfg.add_edge(header_idx, body_idx);
        self.function.cfg.add_edge(header_idx, end_idx);

        self.switch_to(body_idx);
        self.replace_env(header_env.clone());
        self.build_scoped_block(body)?;
        if !self.is_terminated() {
            let body_end_label = self.current_label();
            let body_end_idx = self.current;
            self.set_terminator(Terminator::new(TerminatorKind::Branch { label: header_label.clone() }, span.clone()));
            self.function.cfg.add_edge(body_end_idx, header_idx);

            let body_end_env = self.snapshot_env();
            // Phis occupy exactly the first `phi_count` slots of the header
            // block — they were pushed before the condition was built, and
            // nothing else can have been inserted ahead of them since.
            let mut values = Vec::with_capacity(phi_count);
            for (scope_idx, scope) in preheader_env.iter().enumerate() {
                for name in scope.keys() {
                    values.push(body_end_env[scope_idx][name]);
                }
            }
            let header_block = &mut self.function.cfg.graph_mut()[header_idx];
            for (phi_inst, value) in header_block.instructions.iter_mut().take(phi_count).zip(values) {
                if let InstructionKind::Phi { incoming, .. } = &mut phi_inst.kind {
                    incoming.push((value, body_end_label.clone()));
                }
            }
        }

        self.switch_to(end_idx);
        self.replace_env(header_env);
        Ok(())
    }
}

fn lower_binary_op(op: BinaryOp) -> (IrBinaryOp, IrType) {
    match op {
        BinaryOp::Add => (IrBinaryOp::Add, IrType::I32),
        BinaryOp::Subtract => (IrBinaryOp::Sub, IrType::I32),
        BinaryOp::Multiply => (IrBinaryOp::Mul, IrType::I32),
        BinaryOp::BitwiseAnd => (IrBinaryOp::BitwiseAnd, IrType::I32),
        BinaryOp::BitwiseOr => (IrBinaryOp::BitwiseOr, IrType::I32),
        BinaryOp::Equal => (IrBinaryOp::Equal, IrType::Bool),
        BinaryOp::NotEqual => (IrBinaryOp::NotEqual, IrType::Bool),
        BinaryOp::Less => (IrBinaryOp::Less, IrType::Bool),
    }
}
