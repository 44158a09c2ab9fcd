// src/tokens/token_kind.rs
use crate::tokens::number::Number;
use logos::Logos;

fn parse_number(lex: &mut logos::Lexer<TokenKind>) -> Option<Number> {
    lex.slice().parse::<i64>().ok().map(Number)
}

/// The closed token set of the C subset this crate compiles: `int`
/// functions, `if`/`else`, `while`, blocks, `return`, and the
/// arithmetic/comparison/bitwise operators SCCP's transfer functions cover.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum TokenKind {
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("<")]
    Less,
    #[token("|")]
    Or,
    #[token("&")]
    And,
    #[token("=")]
    Equal,
    #[token(",")]
    Comma,

    #[token("int")]
    KeywordInt,
    #[token("if")]
    KeywordIf,
    #[token("else")]
    KeywordElse,
    #[token("while")]
    KeywordWhile,
    #[token("return")]
    KeywordReturn,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[regex(r"[0-9]+", parse_number)]
    Numeric(Number),

    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,

    #[token(";")]
    Semicolon,

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)]
    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    Comment,
    Eof,
}
