// src/ir/instruction.rs
use super::{IrType, Value};
use crate::location::source_span::SourceSpan;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub result: Option<Value>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub source_span: SourceSpan,
}

/// The closed set of opcodes the SCCP transition engine dispatches on.
///
/// Every variant here corresponds to one transfer function in
/// `ir::optimizer::sccp::engine`; the `match` in that module is exhaustive,
/// so adding an opcode here is a compile error until it is given a transfer
/// function too.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionKind {
    /// Reserves a stack slot; the result is an opaque address.
    Alloca { ty: IrType },
    Store { value: Value, dest: Value },
    Load { src: Value, ty: IrType },
    Binary { op: IrBinaryOp, left: Value, right: Value, ty: IrType },
    /// Identity-preserving width/signedness conversion (only `i32 <-> bool` in this subset).
    Cast { value: Value, from_ty: IrType, to_ty: IrType },
    /// Intraprocedural calls are opaque: the callee is named, not modeled.
    Call { func: Arc<str>, args: Vec<Value>, ty: IrType },
    GetElementPtr { base: Value, index: Value, element_ty: IrType },
    Phi { ty: IrType, incoming: Vec<(Value, Arc<str>)> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrBinaryOp {
    Add,
    Sub,
    Mul,
    BitwiseAnd,
    BitwiseOr,
    Equal,
    NotEqual,
    Less,
}

impl IrBinaryOp {
    /// Arithmetic ops materialize a wrapping-i32 result when both operands are known.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, IrBinaryOp::Add | IrBinaryOp::Sub | IrBinaryOp::Mul)
    }

    pub fn is_compare(self) -> bool {
        matches!(self, IrBinaryOp::Equal | IrBinaryOp::NotEqual | IrBinaryOp::Less)
    }
}

impl Instruction {
    pub fn new(kind: InstructionKind, span: SourceSpan) -> Self {
        Instruction { kind, result: None, debug_info: DebugInfo { source_span: span } }
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// The values this instruction reads, in operand order.
    pub fn operands(&self) -> Vec<&Value> {
        match &self.kind {
            InstructionKind::Alloca { .. } => vec![],
            InstructionKind::Store { value, dest } => vec![value, dest],
            InstructionKind::Load { src, .. } => vec![src],
            InstructionKind::Binary { left, right, .. } => vec![left, right],
            InstructionKind::Cast { value, .. } => vec![value],
            InstructionKind::Call { args, .. } => args.iter().collect(),
            InstructionKind::GetElementPtr { base, index, .. } => vec![base, index],
            InstructionKind::Phi { incoming, .. } => incoming.iter().map(|(v, _)| v).collect(),
        }
    }

    /// Overwrites every operand currently holding `old.id` with `new` —
    /// used by the SCCP rewrite phase to make users "see" a folded constant
    /// without an owning def-use edge to follow.
    pub fn replace_operand(&mut self, old: super::ValueId, new: Value) {
        let patch = |v: &mut Value| {
            if v.id == old {
                *v = new;
            }
        };
        match &mut self.kind {
            InstructionKind::Alloca { .. } => {}
            InstructionKind::Store { value, dest } => {
                patch(value);
                patch(dest);
            }
            InstructionKind::Load { src, .. } => patch(src),
            InstructionKind::Binary { left, right, .. } => {
                patch(left);
                patch(right);
            }
            InstructionKind::Cast { value, .. } => patch(value),
            InstructionKind::Call { args, .. } => args.iter_mut().for_each(patch),
            InstructionKind::GetElementPtr { base, index, .. } => {
                patch(base);
                patch(index);
            }
            InstructionKind::Phi { incoming, .. } => incoming.iter_mut().for_each(|(v, _)| patch(v)),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result_str = if let Some(result) = &self.result { format!("{result} = ") } else { String::new() };

        match &self.kind {
            InstructionKind::Alloca { ty } => write!(f, "{result_str}alloca {ty}"),
            InstructionKind::Store { value, dest } => write!(f, "store {value}, {dest}"),
            InstructionKind::Load { src, ty } => write!(f, "{result_str}load {ty}, {src}"),
            InstructionKind::Binary { op, left, right, ty } => write!(f, "{result_str}{op} {left}, {right} : {ty}"),
            InstructionKind::Cast { value, from_ty, to_ty } => write!(f, "{result_str}cast {value} : {from_ty} to {to_ty}"),
            InstructionKind::Call { func, args, ty } => {
                let args_str = args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                write!(f, "{result_str}call @{func}({args_str}) : {ty}")
            }
            InstructionKind::GetElementPtr { base, index, element_ty } => {
                write!(f, "{result_str}getelementptr {base}, {index} : {element_ty}")
            }
            InstructionKind::Phi { ty, incoming } => {
                let incoming_str =
                    incoming.iter().map(|(val, block)| format!("[ {val}, {block} ]")).collect::<Vec<_>>().join(", ");
                write!(f, "{result_str}phi {ty} [ {incoming_str} ]")
            }
        }
    }
}

impl fmt::Display for IrBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrBinaryOp::Add => f.write_str("add"),
            IrBinaryOp::Sub => f.write_str("sub"),
            IrBinaryOp::Mul => f.write_str("mul"),
            IrBinaryOp::BitwiseAnd => f.write_str("and"),
            IrBinaryOp::BitwiseOr => f.write_str("or"),
            IrBinaryOp::Equal => f.write_str("eq"),
            IrBinaryOp::NotEqual => f.write_str("ne"),
            IrBinaryOp::Less => f.write_str("slt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::value::IrLiteralValue;

    fn span() -> SourceSpan {
        SourceSpan::default()
    }

    #[test]
    fn binary_display_includes_type() {
        let left = Value::new_literal(IrLiteralValue::I32(1));
        let right = Value::new_literal(IrLiteralValue::I32(2));
        let inst = Instruction::new(InstructionKind::Binary { op: IrBinaryOp::Add, left, right, ty: IrType::I32 }, span())
            .with_result(Value::new_temporary(0, IrType::I32));
        assert_eq!(inst.to_string(), "%t0 = add 1i32, 2i32 : i32");
    }

    #[test]
    fn operands_of_phi_are_incoming_values() {
        let a = Value::new_literal(IrLiteralValue::I32(3));
        let b = Value::new_literal(IrLiteralValue::I32(5));
        let inst = Instruction::new(
            InstructionKind::Phi { ty: IrType::I32, incoming: vec![(a, "b1".into()), (b, "b2".into())] },
            span(),
        );
        assert_eq!(inst.operands().len(), 2);
    }

    #[test]
    fn arithmetic_vs_compare_classification() {
        assert!(IrBinaryOp::Add.is_arithmetic());
        assert!(!IrBinaryOp::Add.is_compare());
        assert!(IrBinaryOp::Less.is_compare());
    }
}
