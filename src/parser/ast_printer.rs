use crate::parser::ast::{Expr, Stmt};
use console::Style;

#[derive(Debug, Clone, PartialEq)]
struct StyleManager {
    pub operator: Style,
    pub literal: Style,
    pub variable: Style,
    pub structure: Style,
    pub punctuation: Style,
    pub keyword: Style,
}

impl StyleManager {
    fn new() -> Self {
        Self {
            operator: Style::new().blue(),
            literal: Style::new().green(),
            variable: Style::new().yellow(),
            structure: Style::new().cyan(),
            punctuation: Style::new().magenta(),
            keyword: Style::new().blue(),
        }
    }
}

pub fn pretty_print(expr: &Expr) -> String {
    let mut output = String::new();
    let styles = StyleManager::new();
    print_expr(expr, "", true, &mut output, &styles);
    output
}

pub fn pretty_print_stmt(stmt: &Stmt) -> String {
    let mut output = String::new();
    let styles = StyleManager::new();
    print_stmt(stmt, "", true, &mut output, &styles);
    output
}

fn print_expr(expr: &Expr, indent: &str, is_last: bool, output: &mut String, styles: &StyleManager) {
    match expr {
        Expr::Binary { left, op, right, .. } => {
            append_line(output, indent, is_last, styles.operator.clone(), &format!("BinaryOp {op:?}"));
            let child_indent = get_indent(indent, is_last);
            append_line(output, &child_indent, false, styles.structure.clone(), "Left:");
            print_expr(left, &get_indent(&child_indent, false), true, output, styles);
            append_line(output, &child_indent, true, styles.structure.clone(), "Right:");
            print_expr(right, &get_indent(&child_indent, true), true, output, styles);
        }
        Expr::Unary { op, expr, .. } => {
            append_line(output, indent, is_last, styles.operator.clone(), &format!("UnaryOp {op:?}"));
            let child_indent = get_indent(indent, is_last);
            print_expr(expr, &get_indent(&child_indent, true), true, output, styles);
        }
        Expr::Grouping { expr, .. } => {
            append_line(output, indent, is_last, styles.punctuation.clone(), "Grouping");
            let child_indent = get_indent(indent, is_last);
            print_expr(expr, &get_indent(&child_indent, true), true, output, styles);
        }
        Expr::Literal { value, .. } => {
            append_line(output, indent, is_last, styles.literal.clone(), &format!("Literal {value}"));
        }
        Expr::Variable { name, .. } => {
            append_line(output, indent, is_last, styles.variable.clone(), &format!("Variable '{name}'"));
        }
        Expr::Assign { name, value, .. } => {
            append_line(output, indent, is_last, styles.variable.clone(), "Assignment");
            let child_indent = get_indent(indent, is_last);
            append_line(output, &child_indent, false, styles.structure.clone(), &format!("Target: '{name}'"));
            append_line(output, &child_indent, true, styles.structure.clone(), "Value:");
            print_expr(value, &get_indent(&child_indent, true), true, output, styles);
        }
        Expr::Call { callee, arguments, .. } => {
            append_line(output, indent, is_last, styles.punctuation.clone(), &format!("Call '{callee}'"));
            let child_indent = get_indent(indent, is_last);
            for (i, arg) in arguments.iter().enumerate() {
                let is_last_arg = i == arguments.len() - 1;
                print_expr(arg, &child_indent, is_last_arg, output, styles);
            }
        }
    }
}

fn print_stmt(stmt: &Stmt, indent: &str, is_last: bool, output: &mut String, styles: &StyleManager) {
    match stmt {
        Stmt::Expression { expr } => {
            append_line(output, indent, is_last, styles.keyword.clone(), "Expression");
            print_expr(expr, &get_indent(indent, is_last), true, output, styles);
        }
        Stmt::VarDeclaration { name, initializer, .. } => {
            append_line(output, indent, is_last, styles.keyword.clone(), "VarDeclaration");
            let child_indent = get_indent(indent, is_last);
            append_line(output, &child_indent, initializer.is_none(), styles.variable.clone(), &format!("Name: '{name}'"));
            if let Some(init) = initializer {
                append_line(output, &child_indent, true, styles.structure.clone(), "Initializer:");
                print_expr(init, &get_indent(&child_indent, true), true, output, styles);
            }
        }
        Stmt::Function { name, parameters, body, .. } => {
            append_line(output, indent, is_last, styles.keyword.clone(), "Function");
            let child_indent = get_indent(indent, is_last);
            append_line(output, &child_indent, false, styles.structure.clone(), &format!("Name: '{name}'"));
            append_line(output, &child_indent, false, styles.structure.clone(), "Parameters:");
            let params_indent = get_indent(&child_indent, false);
            for (i, param) in parameters.iter().enumerate() {
                append_line(output, &params_indent, i == parameters.len() - 1, styles.variable.clone(), &param.name);
            }
            append_line(output, &child_indent, true, styles.structure.clone(), "Body:");
            print_block(body, &get_indent(&child_indent, true), output, styles);
        }
        Stmt::If { condition, then_branch, else_branch, .. } => {
            append_line(output, indent, is_last, styles.keyword.clone(), "If");
            let child_indent = get_indent(indent, is_last);
            append_line(output, &child_indent, false, styles.structure.clone(), "Condition:");
            print_expr(condition, &get_indent(&child_indent, false), true, output, styles);
            append_line(output, &child_indent, else_branch.is_none(), styles.structure.clone(), "Then:");
            print_block(then_branch, &get_indent(&child_indent, else_branch.is_none()), output, styles);
            if let Some(else_branch) = else_branch {
                append_line(output, &child_indent, true, styles.structure.clone(), "Else:");
                print_block(else_branch, &get_indent(&child_indent, true), output, styles);
            }
        }
        Stmt::While { condition, body, .. } => {
            append_line(output, indent, is_last, styles.keyword.clone(), "While");
            let child_indent = get_indent(indent, is_last);
            append_line(output, &child_indent, false, styles.structure.clone(), "Condition:");
            print_expr(condition, &get_indent(&child_indent, false), true, output, styles);
            append_line(output, &child_indent, true, styles.structure.clone(), "Body:");
            print_block(body, &get_indent(&child_indent, true), output, styles);
        }
        Stmt::Block { statements, .. } => {
            append_line(output, indent, is_last, styles.keyword.clone(), "Block");
            print_block(statements, &get_indent(indent, is_last), output, styles);
        }
        Stmt::Return { value, .. } => {
            append_line(output, indent, is_last, styles.keyword.clone(), "Return");
            if let Some(expr) = value {
                let child_indent = get_indent(indent, is_last);
                append_line(output, &child_indent, true, styles.structure.clone(), "Value:");
                print_expr(expr, &get_indent(&child_indent, true), true, output, styles);
            }
        }
    }
}

fn print_block(statements: &[Stmt], indent: &str, output: &mut String, styles: &StyleManager) {
    for (i, stmt) in statements.iter().enumerate() {
        print_stmt(stmt, indent, i == statements.len() - 1, output, styles);
    }
}

fn get_indent(indent: &str, is_last: bool) -> String {
    format!("{}{}", indent, if is_last { "    " } else { "│   " })
}

fn append_line(output: &mut String, indent: &str, is_last: bool, style: Style, text: &str) {
    let branch = if is_last { "└── " } else { "├── " };
    let styled_text = style.apply_to(text);
    output.push_str(&format!("{indent}{branch}{styled_text}\n"));
}
