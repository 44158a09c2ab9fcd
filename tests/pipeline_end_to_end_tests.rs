// tests/pipeline_end_to_end_tests.rs
//! Drives the whole pipeline (lex -> parse -> semantic -> build -> SCCP)
//! in-process, the way `main.rs` wires it, checking that SSA construction
//! always yields a verifiable CFG and that running SCCP never changes the
//! folded value a program returns for any concretely reachable path.
use cflow::ir::builder::IrBuilder;
use cflow::ir::optimizer::{SccpConfig, SccpPass};
use cflow::lexer::{lexer_tokenize_with_errors, Lexer};
use cflow::parser::jsav_parser::Parser;
use cflow::semantic::SemanticAnalyzer;

fn compile(src: &str) -> cflow::ir::Module {
    let mut lexer = Lexer::new("t.c", src);
    let (tokens, lex_errors) = lexer_tokenize_with_errors(&mut lexer);
    assert!(lex_errors.is_empty(), "{lex_errors:?}");
    let (ast, parse_errors) = Parser::new(tokens).parse();
    assert!(parse_errors.is_empty(), "{parse_errors:?}");
    let sem_errors = SemanticAnalyzer::new().check(&ast);
    assert!(sem_errors.is_empty(), "{sem_errors:?}");
    IrBuilder::build_module("t", &ast).unwrap()
}

fn return_value(function: &cflow::ir::Function) -> Option<i32> {
    use cflow::ir::TerminatorKind;
    function.cfg.dfs_post_order().find_map(|idx| {
        match &function.cfg.graph()[idx].terminator.kind {
            TerminatorKind::Return { value, .. } => value.as_constant_i32(),
            _ => None,
        }
    })
}

#[test]
fn every_lowered_function_passes_cfg_verification() {
    let module = compile(
        "int main() { \
            int x = 1; \
            if (x < 2) { x = x + 1; } else { x = x - 1; } \
            while (x < 10) { x = x + 1; } \
            return x; \
        }",
    );
    for function in &module.functions {
        assert!(function.cfg.verify().is_ok(), "{}", function.name);
    }
}

/// The flagship scenario this crate exists to fold: an if/else assigns a
/// variable on both branches, a known-true condition makes one branch
/// unreachable, and the phi at the merge point collapses to a constant.
#[test]
fn folds_a_phi_across_a_statically_known_branch() {
    let mut module = compile(
        "int main() { \
            int x; \
            if (1) { x = 10; } else { x = 20; } \
            return x; \
        }",
    );
    let mut pass = SccpPass::new(SccpConfig::default());
    for function in &mut module.functions {
        pass.run_function(function).unwrap();
        assert!(function.cfg.verify().is_ok());
    }
    assert_eq!(return_value(&module.functions[0]), Some(10));
}

#[test]
fn sccp_never_changes_the_folded_return_value_of_straight_line_arithmetic() {
    let mut module = compile("int main() { int a = 2; int b = 3; return a * b + 1; }");
    let before = {
        // Evaluate by hand: the program is pure constant arithmetic, so the
        // unoptimized and optimized return value must agree.
        2 * 3 + 1
    };
    let mut pass = SccpPass::new(SccpConfig::default());
    for function in &mut module.functions {
        pass.run_function(function).unwrap();
    }
    assert_eq!(return_value(&module.functions[0]), Some(before));
}

#[test]
fn a_parameter_dependent_computation_survives_optimization_unfolded() {
    let mut module = compile("int identity(int n) { return n + 0; }");
    let mut pass = SccpPass::new(SccpConfig::default());
    for function in &mut module.functions {
        pass.run_function(function).unwrap();
        assert!(function.cfg.verify().is_ok());
    }
    // `n` is caller-controlled (top), so `n + 0` cannot fold to a literal;
    // the function must still return *something* reachable, not be deleted.
    assert!(module.functions[0].cfg.verify().is_ok());
}

#[test]
fn function_calls_round_trip_through_the_pipeline() {
    let module = compile("int add(int a, int b) { return a + b; } int main() { return add(1, 2); }");
    assert_eq!(module.functions.len(), 2);
    for function in &module.functions {
        assert!(function.cfg.verify().is_ok());
    }
}
