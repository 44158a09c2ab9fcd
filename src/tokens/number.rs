/// A decimal integer literal as the lexer's regex captures it; narrowed to
/// `i32` (wrapping, not saturating) when the parser turns it into a literal
/// expression.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Number(pub i64);
