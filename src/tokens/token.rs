// src/tokens/token.rs
use crate::location::source_span::SourceSpan;
use crate::tokens::token_kind::TokenKind;

/// A lexeme plus the span it came from: a keyword, operator, identifier, or
/// number literal, carried through parsing and into every `CompileError`
/// that needs to point back at source text.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}
