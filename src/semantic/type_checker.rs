// src/semantic/type_checker.rs
//! Name resolution and arity checking over the C subset's AST. Every value
//! in this language is an `int`, so there's no type lattice to reconcile:
//! the job reduces to rejecting undeclared names, call-site arity
//! mismatches, and redeclarations within a scope.
use crate::error::compile_error::CompileError;
use crate::parser::ast::*;
use crate::semantic::symbol_table::*;

pub struct SemanticAnalyzer {
    symbol_table: SymbolTable,
    errors: Vec<CompileError>,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self { symbol_table: SymbolTable::new(), errors: Vec::new() }
    }

    /// Runs both passes and returns whatever errors accumulated; an empty
    /// result means the program is well-formed.
    pub fn check(&mut self, ast: &[Stmt]) -> Vec<CompileError> {
        for stmt in ast {
            self.declare_top_level(stmt);
        }
        for stmt in ast {
            self.check_top_level(stmt);
        }
        std::mem::take(&mut self.errors)
    }

    fn declare_symbol(&mut self, name: &str, symbol: Symbol) {
        if let Err(e) = self.symbol_table.declare(name, symbol) {
            self.errors.push(e);
        }
    }

    fn semantic_error(&mut self, message: impl Into<String>, span: &crate::location::source_span::SourceSpan) {
        self.errors.push(CompileError::SemanticError { message: message.into(), span: span.clone() });
    }

    fn declare_top_level(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Function { name, parameters, span, .. } => {
                let symbol = Symbol::Function(FunctionSymbol { name: name.clone(), parameters: parameters.clone(), defined_at: span.clone() });
                self.declare_symbol(name, symbol);
            }
            other => self.semantic_error("only function definitions are allowed at top level", other.span()),
        }
    }

    fn check_top_level(&mut self, stmt: &Stmt) {
        let Stmt::Function { parameters, body, .. } = stmt else { return };

        self.symbol_table.push_scope(ScopeKind::Function, Some(stmt.span().clone()));
        for param in parameters {
            let symbol = Symbol::Variable(VariableSymbol { name: param.name.clone(), defined_at: param.span.clone() });
            self.declare_symbol(&param.name, symbol);
        }
        for inner in body {
            self.check_stmt(inner);
        }
        self.symbol_table.pop_scope();
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression { expr } => self.check_expr(expr),
            Stmt::VarDeclaration { name, initializer, span } => {
                if let Some(init) = initializer {
                    self.check_expr(init);
                }
                let symbol = Symbol::Variable(VariableSymbol { name: name.clone(), defined_at: span.clone() });
                self.declare_symbol(name, symbol);
            }
            Stmt::If { condition, then_branch, else_branch, .. } => {
                self.check_expr(condition);
                self.check_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_block(else_branch);
                }
            }
            Stmt::While { condition, body, .. } => {
                self.check_expr(condition);
                self.check_block(body);
            }
            Stmt::Block { statements, .. } => self.check_block(statements),
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.check_expr(value);
                }
            }
            Stmt::Function { span, .. } => {
                self.semantic_error("nested function definitions are not supported", span);
            }
        }
    }

    fn check_block(&mut self, statements: &[Stmt]) {
        self.symbol_table.push_scope(ScopeKind::Block, None);
        for stmt in statements {
            self.check_stmt(stmt);
        }
        self.symbol_table.pop_scope();
    }

    fn check_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } => {}
            Expr::Variable { name, span } => {
                if self.symbol_table.lookup_variable(name).is_none() {
                    self.semantic_error(format!("undeclared variable '{name}'"), span);
                }
            }
            Expr::Assign { name, value, span } => {
                if self.symbol_table.lookup_variable(name).is_none() {
                    self.semantic_error(format!("assignment to undeclared variable '{name}'"), span);
                }
                self.check_expr(value);
            }
            Expr::Binary { left, right, .. } => {
                self.check_expr(left);
                self.check_expr(right);
            }
            Expr::Unary { expr, .. } | Expr::Grouping { expr, .. } => self.check_expr(expr),
            Expr::Call { callee, arguments, span } => {
                for arg in arguments {
                    self.check_expr(arg);
                }
                match self.symbol_table.lookup_function(callee) {
                    Some(func) if func.parameters.len() != arguments.len() => {
                        self.semantic_error(
                            format!("function '{callee}' expects {} argument(s) but {} were supplied", func.parameters.len(), arguments.len()),
                            span,
                        );
                    }
                    Some(_) => {}
                    None => self.semantic_error(format!("call to undeclared function '{callee}'"), span),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, lexer_tokenize_with_errors};
    use crate::parser::jsav_parser::Parser;

    fn analyze(src: &str) -> Vec<CompileError> {
        let mut lexer = Lexer::new("t.c", src);
        let (tokens, lex_errors) = lexer_tokenize_with_errors(&mut lexer);
        assert!(lex_errors.is_empty());
        let (ast, parse_errors) = Parser::new(tokens).parse();
        assert!(parse_errors.is_empty(), "{parse_errors:?}");
        SemanticAnalyzer::new().check(&ast)
    }

    #[test]
    fn accepts_a_well_formed_program() {
        let errors = analyze("int f(int x) { return x; } int main() { return f(1); }");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn rejects_undeclared_variables() {
        let errors = analyze("int main() { return y; }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn rejects_call_arity_mismatches() {
        let errors = analyze("int f(int x) { return x; } int main() { return f(1, 2); }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn rejects_calls_to_undeclared_functions() {
        let errors = analyze("int main() { return g(); }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn variables_declared_inside_a_block_do_not_escape_it() {
        let errors = analyze("int main() { { int x = 1; } return x; }");
        assert_eq!(errors.len(), 1);
    }
}
