// src/error/compile_error.rs
use crate::ir::optimizer::SccpError;
use crate::location::source_span::SourceSpan;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{message} at {span}")]
    LexerError { message: String, span: SourceSpan },

    #[error("Syntax error: {message} at {span}")]
    SyntaxError { message: String, span: SourceSpan },

    #[error("Semantic error: {message} at {span}")]
    SemanticError { message: String, span: SourceSpan },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("optimizer error: {0}")]
    Optimizer(#[from] SccpError),
}

impl CompileError {
    pub fn message(&self) -> Option<&str> {
        match self {
            CompileError::LexerError { message, .. }
            | CompileError::SyntaxError { message, .. }
            | CompileError::SemanticError { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        match self {
            CompileError::LexerError { span, .. }
            | CompileError::SyntaxError { span, .. }
            | CompileError::SemanticError { span, .. } => Some(span),
            _ => None,
        }
    }

    pub fn set_message(&mut self, new_message: String) {
        match self {
            CompileError::LexerError { message, .. }
            | CompileError::SyntaxError { message, .. }
            | CompileError::SemanticError { message, .. } => *message = new_message,
            _ => {}
        }
    }

    pub fn set_span(&mut self, new_span: SourceSpan) {
        match self {
            CompileError::LexerError { span, .. }
            | CompileError::SyntaxError { span, .. }
            | CompileError::SemanticError { span, .. } => *span = new_span,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_and_span_accessors_cover_the_spanned_variants() {
        let mut err = CompileError::SyntaxError { message: "unexpected token".into(), span: SourceSpan::default() };
        assert_eq!(err.message(), Some("unexpected token"));
        err.set_message("updated".into());
        assert_eq!(err.message(), Some("updated"));
        assert!(err.span().is_some());
    }

    #[test]
    fn io_and_optimizer_variants_have_no_span() {
        let err = CompileError::Optimizer(SccpError::MaxIterationsExceeded(10_000));
        assert!(err.message().is_none());
        assert!(err.span().is_none());
    }
}
