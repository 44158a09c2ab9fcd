// src/ir/mod.rs
//! The SSA intermediate representation: typed instructions over basic
//! blocks addressed through a petgraph control-flow graph, plus the
//! `optimizer` subtree that hosts the SCCP pass.

pub mod basic_block;
pub mod builder;
pub mod cfg;
pub mod function;
pub mod instruction;
pub mod module;
pub mod optimizer;
pub mod terminator;
pub mod types;
pub mod value;

pub use basic_block::BasicBlock;
pub use cfg::ControlFlowGraph;
pub use function::Function;
pub use instruction::{Instruction, InstructionKind, IrBinaryOp};
pub use module::Module;
pub use terminator::{Terminator, TerminatorKind};
pub use types::IrType;
pub use value::{IrLiteralValue, Value, ValueId, ValueKind};
