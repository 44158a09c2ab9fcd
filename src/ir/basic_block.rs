// src/ir/basic_block.rs
use super::{instruction::*, terminator::*};
use crate::location::source_span::SourceSpan;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub label: Arc<str>,
    pub source_span: SourceSpan,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

impl BasicBlock {
    pub fn new(label: &str, span: SourceSpan) -> Self {
        Self {
            label: label.into(),
            source_span: span.clone(),
            instructions: Vec::new(),
            terminator: Terminator::new(TerminatorKind::Unreachable, span),
        }
    }

    #[inline]
    pub fn set_terminator(&mut self, t: Terminator) {
        self.terminator = t;
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for inst in &self.instructions {
            writeln!(f, "  {inst}")?;
        }
        writeln!(f, "  {}", self.terminator)
    }
}
