// src/ir/terminator.rs
use super::{IrType, Value};
use crate::location::source_span::SourceSpan;
use std::fmt;
use std::sync::Arc;

/// Represents a control-flow terminator in the intermediate representation (IR).
///
/// A terminator defines how control flow exits a basic block. Every basic
/// block ends in exactly one; `Unreachable` is the placeholder a freshly
/// created block starts with before the builder assigns a real one.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminator {
    pub kind: TerminatorKind,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub source_span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TerminatorKind {
    Return { value: Value, ty: IrType },
    Branch { label: Arc<str> },
    ConditionalBranch { condition: Value, true_label: Arc<str>, false_label: Arc<str> },
    Unreachable,
}

impl Terminator {
    pub fn is_terminator(&self) -> bool {
        !matches!(self.kind, TerminatorKind::Unreachable)
    }

    /// All target labels this terminator may transfer control to.
    pub fn get_targets(&self) -> Vec<String> {
        match &self.kind {
            TerminatorKind::Branch { label } => vec![label.to_string()],
            TerminatorKind::ConditionalBranch { true_label, false_label, .. } => {
                vec![true_label.to_string(), false_label.to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Values read by this terminator (the condition, or the returned value).
    pub fn get_used_values(&self) -> Vec<&Value> {
        match &self.kind {
            TerminatorKind::Return { value, .. } => vec![value],
            TerminatorKind::ConditionalBranch { condition, .. } => vec![condition],
            _ => Vec::new(),
        }
    }

    pub fn new(kind: TerminatorKind, span: SourceSpan) -> Self {
        Terminator { kind, debug_info: DebugInfo { source_span: span } }
    }

    /// Overwrites the condition/return operand if it currently holds `old.id`.
    pub fn replace_operand(&mut self, old: super::ValueId, new: Value) {
        let patch = |v: &mut Value| {
            if v.id == old {
                *v = new;
            }
        };
        match &mut self.kind {
            TerminatorKind::Return { value, .. } => patch(value),
            TerminatorKind::ConditionalBranch { condition, .. } => patch(condition),
            TerminatorKind::Branch { .. } | TerminatorKind::Unreachable => {}
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TerminatorKind::Return { value, ty } => write!(f, "ret {ty} {value}"),
            TerminatorKind::Branch { label } => write!(f, "br {label}"),
            TerminatorKind::ConditionalBranch { condition, true_label, false_label } => {
                write!(f, "br {condition}, {true_label}, {false_label}")
            }
            TerminatorKind::Unreachable => write!(f, "unreachable"),
        }
    }
}
