//! Lexical tokens for the C subset: the `Number` literal payload, the
//! `Token` (kind + source span) produced by the lexer, and the `TokenKind`
//! enumeration the logos-derived matcher dispatches on.
pub mod number;
pub mod token;
pub mod token_kind;
