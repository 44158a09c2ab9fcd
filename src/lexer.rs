// src/lexer.rs
//! Converts source text into a stream of `Token`s, the first phase of the
//! pipeline. A thin wrapper around a logos-generated matcher plus a
//! `LineTracker` so every token carries a `SourceSpan` for diagnostics.
use crate::{
    error::compile_error::CompileError,
    location::line_tracker::LineTracker,
    tokens::{token::Token, token_kind::TokenKind},
};
use logos::Logos;

pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    line_tracker: LineTracker,
    source_len: usize,
    eof_emitted: bool,
}

impl<'a> Lexer<'a> {
    /// # Examples
    /// ```
    /// # use cflow::lexer::Lexer;
    /// let mut lexer = Lexer::new("test.c", "int main() { return 42; }");
    /// ```
    #[must_use]
    pub fn new(file_path: &str, source: &'a str) -> Self {
        let line_tracker = LineTracker::new(file_path, source.to_owned());
        let inner = TokenKind::lexer(source);
        let source_len = source.len();
        Lexer { inner, line_tracker, eof_emitted: false, source_len }
    }

    #[must_use]
    pub const fn get_line_tracker(&self) -> &LineTracker {
        &self.line_tracker
    }

    #[inline]
    pub fn next_token(&mut self) -> Option<Result<Token, CompileError>> {
        if self.eof_emitted {
            return None;
        }

        let (kind_result, range) = if let Some(kind_result) = self.inner.next() {
            (kind_result, self.inner.span())
        } else {
            self.eof_emitted = true;
            let eof_range = self.source_len..self.source_len;
            (Ok(TokenKind::Eof), eof_range)
        };

        let span = self.line_tracker.span_for(range);
        Some(match kind_result {
            Ok(kind) => Ok(Token { kind, span }),
            Err(()) => {
                Err(CompileError::LexerError { message: format!("invalid token: {:?}", self.inner.slice()), span })
            }
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Drains `lexer` fully, separating valid tokens from lexical errors so the
/// caller can report every error found rather than stopping at the first.
pub fn lexer_tokenize_with_errors(lexer: &mut Lexer) -> (Vec<Token>, Vec<CompileError>) {
    let estimated_tokens = lexer.source_len / 4;
    let mut tokens = Vec::with_capacity(estimated_tokens);
    let mut errors = Vec::new();

    while let Some(token_result) = lexer.next_token() {
        match token_result {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }
    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_minimal_function() {
        let mut lexer = Lexer::new("t.c", "int main() { return 0; }");
        let (tokens, errors) = lexer_tokenize_with_errors(&mut lexer);
        assert!(errors.is_empty());
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::KeywordInt,
                &TokenKind::Identifier("main".into()),
                &TokenKind::OpenParen,
                &TokenKind::CloseParen,
                &TokenKind::OpenBrace,
                &TokenKind::KeywordReturn,
                &TokenKind::Numeric(crate::tokens::number::Number(0)),
                &TokenKind::CloseBrace,
                &TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn reports_an_invalid_character() {
        let mut lexer = Lexer::new("t.c", "int x = 1 @ 2;");
        let (_tokens, errors) = lexer_tokenize_with_errors(&mut lexer);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().unwrap().contains("invalid token"));
    }
}
