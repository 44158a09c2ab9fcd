// src/parser/jsav_parser.rs
use crate::error::compile_error::CompileError;
use crate::location::source_span::SourceSpan;
use crate::parser::ast::*;
use crate::parser::precedence::*;
use crate::tokens::token::Token;
use crate::tokens::token_kind::TokenKind;

/// Recursive-descent (with a Pratt expression parser) parser for the C
/// subset grammar: top-level `int`-returning function definitions whose
/// bodies are declarations, assignments, `if`/`else`, `while`, `return`
/// and nested blocks.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<CompileError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0, errors: Vec::new() }
    }

    /// Entry point: parse a sequence of top-level function definitions until EOF.
    pub fn parse(mut self) -> (Vec<Stmt>, Vec<CompileError>) {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            } else {
                self.advance();
            }
        }
        (statements, self.errors)
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::KeywordInt) => {
                if self.is_function_definition() { self.parse_function() } else { self.parse_var_declaration() }
            }
            Some(TokenKind::KeywordIf) => self.parse_if(),
            Some(TokenKind::KeywordWhile) => self.parse_while(),
            Some(TokenKind::KeywordReturn) => self.parse_return(),
            Some(TokenKind::OpenBrace) => self.parse_block(),
            _ => self.parse_expression_stmt(),
        }
    }

    /// Distinguishes `int f(` (a function) from `int x = ...;` (a
    /// declaration) by looking two tokens past `int` without consuming.
    fn is_function_definition(&self) -> bool {
        matches!(self.tokens.get(self.current + 1).map(|t| &t.kind), Some(TokenKind::Identifier(_)))
            && matches!(self.tokens.get(self.current + 2).map(|t| &t.kind), Some(TokenKind::OpenParen))
    }

    /// `int <name>(<params>) { <body> }`
    fn parse_function(&mut self) -> Option<Stmt> {
        let int_token = self.advance().unwrap().clone(); // 'int'
        let (name, name_span) = self.expect_identifier("Expected function name", &int_token)?;

        self.expect(TokenKind::OpenParen, "Expected '(' after function name");
        let mut parameters = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                self.expect(TokenKind::KeywordInt, "Expected 'int' parameter type");
                let (param_name, param_span) = self.expect_identifier("Expected parameter name", &int_token)?;
                parameters.push(Parameter { name: param_name, span: param_span });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "Expected ')' after parameters");

        let body_start_span = self.peek().map(|t| t.span.clone()).unwrap_or_else(|| int_token.span.clone());
        let body = match self.parse_block() {
            Some(Stmt::Block { statements, .. }) => statements,
            _ => Vec::new(),
        };

        Some(Stmt::Function { name, parameters, body, span: name_span.merged(&body_start_span).unwrap_or(name_span) })
    }

    /// `if (<condition>) { <then> } [else { <else> }]`
    fn parse_if(&mut self) -> Option<Stmt> {
        let if_token = self.advance().unwrap().clone();
        self.expect(TokenKind::OpenParen, "Expected '(' after 'if'");
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::CloseParen, "Expected ')' after if condition");
        let then_branch = match self.parse_block() {
            Some(Stmt::Block { statements, .. }) => statements,
            _ => Vec::new(),
        };

        let else_branch = if self.match_token(TokenKind::KeywordElse) {
            match self.parse_block() {
                Some(Stmt::Block { statements, .. }) => Some(statements),
                _ => Some(Vec::new()),
            }
        } else {
            None
        };

        Some(Stmt::If { condition, then_branch, else_branch, span: if_token.span })
    }

    /// `while (<condition>) { <body> }`
    fn parse_while(&mut self) -> Option<Stmt> {
        let while_token = self.advance().unwrap().clone();
        self.expect(TokenKind::OpenParen, "Expected '(' after 'while'");
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::CloseParen, "Expected ')' after while condition");
        let body = match self.parse_block() {
            Some(Stmt::Block { statements, .. }) => statements,
            _ => Vec::new(),
        };
        Some(Stmt::While { condition, body, span: while_token.span })
    }

    /// `return [<expr>];`
    fn parse_return(&mut self) -> Option<Stmt> {
        let return_token = self.advance().unwrap().clone();
        let value = if self.check_expression_start() { Some(self.parse_expr(0)?) } else { None };
        self.match_token(TokenKind::Semicolon);
        Some(Stmt::Return { value, span: return_token.span })
    }

    /// `{ <statements> }`
    fn parse_block(&mut self) -> Option<Stmt> {
        let start_token = self.advance().unwrap().clone(); // '{'
        let mut statements = Vec::new();
        while !self.check(TokenKind::CloseBrace) && !self.is_at_end() {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            } else {
                self.advance();
            }
        }
        self.expect(TokenKind::CloseBrace, "Expected '}' after block");
        Some(Stmt::Block { statements, span: start_token.span })
    }

    /// `int <name> [= <initializer>];`
    fn parse_var_declaration(&mut self) -> Option<Stmt> {
        let int_token = self.advance().unwrap().clone(); // 'int'
        let (name, name_span) = self.expect_identifier("Expected variable name", &int_token)?;

        let initializer =
            if self.match_token(TokenKind::Equal) { Some(self.parse_expr(0)?) } else { None };
        self.match_token(TokenKind::Semicolon);

        Some(Stmt::VarDeclaration { name, initializer, span: name_span })
    }

    fn parse_expression_stmt(&mut self) -> Option<Stmt> {
        let expr = self.parse_expr(0)?;
        self.match_token(TokenKind::Semicolon);
        Some(Stmt::Expression { expr })
    }

    fn check_expression_start(&self) -> bool {
        matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::Minus) | Some(TokenKind::OpenParen) | Some(TokenKind::Identifier(_)) | Some(TokenKind::Numeric(_))
        )
    }

    fn expect_identifier(&mut self, message: &str, context: &Token) -> Option<(String, SourceSpan)> {
        match self.advance() {
            Some(Token { kind: TokenKind::Identifier(s), span, .. }) => Some((s.clone(), span.clone())),
            _ => {
                self.syntax_error(message, context);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Expression parsing (Pratt)

    fn parse_expr(&mut self, min_bp: u8) -> Option<Expr> {
        let mut left = self.nud()?;

        while let Some(token) = self.peek() {
            let (lbp, _) = binding_power(token);
            if lbp <= min_bp {
                break;
            }
            left = self.led(left);
        }

        Some(left)
    }

    fn nud(&mut self) -> Option<Expr> {
        let token = self.advance()?.clone();
        match token.kind {
            TokenKind::Numeric(n) => Some(Expr::Literal { value: n.0 as i32, span: token.span }),
            TokenKind::Minus => Some(self.parse_unary(UnaryOp::Negate, token)),
            TokenKind::OpenParen => self.parse_grouping(token),
            TokenKind::Identifier(name) => Some(Expr::Variable { name, span: token.span }),
            _ => {
                self.syntax_error("Unexpected token", &token);
                None
            }
        }
    }

    fn led(&mut self, left: Expr) -> Expr {
        let Some(token) = self.advance().cloned() else { return left };
        match token.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::EqualEqual
            | TokenKind::NotEqual
            | TokenKind::Less
            | TokenKind::And
            | TokenKind::Or => self.parse_binary(left, token),
            TokenKind::Equal => self.parse_assignment(left, token),
            TokenKind::OpenParen => self.parse_call(left, token),
            _ => {
                self.syntax_error("Unexpected operator", &token);
                left
            }
        }
    }

    fn parse_unary(&mut self, op: UnaryOp, token: Token) -> Expr {
        let (_, rbp) = unary_binding_power(&token);
        let expr = self.parse_expr(rbp).unwrap_or_else(|| self.null_expr(token.span.clone()));
        Expr::Unary { op, expr: Box::new(expr), span: token.span }
    }

    fn parse_binary(&mut self, left: Expr, token: Token) -> Expr {
        let op = match BinaryOp::get_op(&token) {
            Ok(op) => op,
            Err(e) => {
                self.errors.push(e);
                return left;
            }
        };
        let right = self.parse_expr(binding_power(&token).1).unwrap_or_else(|| self.null_expr(token.span.clone()));
        Expr::Binary { left: Box::new(left), op, right: Box::new(right), span: token.span }
    }

    fn parse_grouping(&mut self, start_token: Token) -> Option<Expr> {
        let expr = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "Unclosed parenthesis");
        Some(Expr::Grouping { expr: Box::new(expr?), span: self.merged_span(&start_token) })
    }

    fn parse_assignment(&mut self, left: Expr, token: Token) -> Expr {
        match left {
            Expr::Variable { name, span } => {
                let value = self.parse_expr(1).unwrap_or_else(|| self.null_expr(token.span.clone()));
                Expr::Assign { name, value: Box::new(value), span: span.merged(&token.span).unwrap_or(span) }
            }
            _ => {
                self.syntax_error("Invalid assignment target", &token);
                left
            }
        }
    }

    fn parse_call(&mut self, callee: Expr, start_token: Token) -> Expr {
        let Expr::Variable { name, .. } = callee else {
            self.syntax_error("Expected a function name before '('", &start_token);
            return self.null_expr(start_token.span.clone());
        };
        let mut arguments = Vec::new();
        while !self.check(TokenKind::CloseParen) && !self.is_at_end() {
            if let Some(arg) = self.parse_expr(0) {
                arguments.push(arg);
            }
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseParen, "Unclosed function call");
        Expr::Call { callee: name, arguments, span: self.merged_span(&start_token) }
    }

    // ------------------------------------------------------------------
    // Token-stream utilities

    fn merged_span(&self, start_token: &Token) -> SourceSpan {
        self.previous().and_then(|end| start_token.span.merged(&end.span)).unwrap_or(start_token.span.clone())
    }

    fn null_expr(&self, span: SourceSpan) -> Expr {
        Expr::Literal { value: 0, span }
    }

    fn syntax_error(&mut self, message: &str, token: &Token) {
        self.errors.push(CompileError::SyntaxError { message: format!("{message}: {:?}", token.kind), span: token.span.clone() });
    }

    fn advance(&mut self) -> Option<&Token> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn previous(&self) -> Option<&Token> {
        self.tokens.get(self.current.saturating_sub(1))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().map(|t| t.kind == kind).unwrap_or(false)
    }

    fn expect(&mut self, kind: TokenKind, context: &str) {
        if !self.match_token(kind.clone()) {
            let found = self.peek().map(|t| format!("{:?}", t.kind)).unwrap_or_else(|| "end of input".to_string());
            self.errors.push(CompileError::SyntaxError {
                message: format!("{context}: expected '{kind:?}' but found {found}"),
                span: self.peek().map(|t| t.span.clone()).unwrap_or_default(),
            });
        }
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().map(|t| t.kind == TokenKind::Eof).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, lexer_tokenize_with_errors};

    fn parse(src: &str) -> (Vec<Stmt>, Vec<CompileError>) {
        let mut lexer = Lexer::new("t.c", src);
        let (tokens, lex_errors) = lexer_tokenize_with_errors(&mut lexer);
        assert!(lex_errors.is_empty(), "{lex_errors:?}");
        Parser::new(tokens).parse()
    }

    #[test]
    fn parses_a_function_with_if_and_return() {
        let (stmts, errors) = parse("int f(int x) { if (x < 1) { return 1; } return 0; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(stmts.len(), 1);
        let Stmt::Function { name, parameters, body, .. } = &stmts[0] else { panic!("expected function") };
        assert_eq!(name, "f");
        assert_eq!(parameters.len(), 1);
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn parses_declaration_and_while_loop() {
        let (stmts, errors) = parse("int main() { int i = 0; while (i < 3) { i = i + 1; } return i; }");
        assert!(errors.is_empty(), "{errors:?}");
        let Stmt::Function { body, .. } = &stmts[0] else { panic!("expected function") };
        assert!(matches!(body[0], Stmt::VarDeclaration { .. }));
        assert!(matches!(body[1], Stmt::While { .. }));
    }

    #[test]
    fn respects_bitwise_operator_precedence_under_comparison() {
        let (stmts, errors) = parse("int f() { return 1 | 0 == 0; }");
        assert!(errors.is_empty(), "{errors:?}");
        let Stmt::Function { body, .. } = &stmts[0] else { panic!("expected function") };
        let Stmt::Return { value: Some(Expr::Binary { op, .. }), .. } = &body[0] else { panic!("expected return") };
        assert_eq!(*op, BinaryOp::BitwiseOr);
    }
}
