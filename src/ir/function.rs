// src/ir/function.rs
use super::{cfg::ControlFlowGraph, types::IrType};
use std::fmt;
use std::sync::Arc;

/// A function in SSA form: a name, a typed parameter list, and a
/// `ControlFlowGraph` of basic blocks reachable from a distinguished entry.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Arc<str>,
    pub params: Vec<(Arc<str>, IrType)>,
    pub return_type: IrType,
    pub cfg: ControlFlowGraph,
}

impl Function {
    pub fn new(name: impl Into<Arc<str>>, params: Vec<(Arc<str>, IrType)>, return_type: IrType) -> Self {
        Self { name: name.into(), params, return_type, cfg: ControlFlowGraph::new("entry".into()) }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params_str = self.params.iter().map(|(name, ty)| format!("{name}: {ty}")).collect::<Vec<_>>().join(", ");
        writeln!(f, "function {}({}) -> {} {{", self.name, params_str, self.return_type)?;
        for idx in self.cfg.dfs_post_order().collect::<Vec<_>>().into_iter().rev() {
            write!(f, "{}", self.cfg.graph()[idx])?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::basic_block::BasicBlock;
    use crate::ir::terminator::{Terminator, TerminatorKind};
    use crate::ir::value::{IrLiteralValue, Value};
    use crate::location::source_span::SourceSpan;

    #[test]
    fn display_wraps_block_order() {
        let mut func = Function::new("main", vec![], IrType::I32);
        let entry = func.cfg.add_block(BasicBlock::new("entry", SourceSpan::default()));
        func.cfg.graph_mut()[entry].set_terminator(Terminator::new(
            TerminatorKind::Return { value: Value::new_literal(IrLiteralValue::I32(0)), ty: IrType::I32 },
            SourceSpan::default(),
        ));
        let text = func.to_string();
        assert!(text.starts_with("function main() -> i32 {"));
        assert!(text.contains("entry:"));
        assert!(text.contains("ret i32 0i32"));
    }
}
