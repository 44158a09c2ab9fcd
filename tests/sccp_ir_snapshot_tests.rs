// tests/sccp_ir_snapshot_tests.rs
//! Snapshots the textual IR printer before and after `SccpPass`, the way
//! `ir_generator_snapshot_tests.rs` snapshots AST-to-IR lowering upstream.
//! Inline snapshots (`@"..."`) keep the expected text in the test itself
//! instead of an external `.snap` file, since the printer's output is small
//! and fully deterministic for a fixed source program.
use cflow::ir::builder::IrBuilder;
use cflow::ir::optimizer::{SccpConfig, SccpPass};
use cflow::lexer::{lexer_tokenize_with_errors, Lexer};
use cflow::parser::jsav_parser::Parser;
use cflow::semantic::SemanticAnalyzer;
use insta::assert_snapshot;

fn build(src: &str) -> cflow::ir::Module {
    let mut lexer = Lexer::new("t.c", src);
    let (tokens, lex_errors) = lexer_tokenize_with_errors(&mut lexer);
    assert!(lex_errors.is_empty(), "{lex_errors:?}");
    let (ast, parse_errors) = Parser::new(tokens).parse();
    assert!(parse_errors.is_empty(), "{parse_errors:?}");
    let sem_errors = SemanticAnalyzer::new().check(&ast);
    assert!(sem_errors.is_empty(), "{sem_errors:?}");
    IrBuilder::build_module("t", &ast).unwrap()
}

#[test]
fn bare_literal_return_prints_with_no_instructions() {
    let module = build("int main() { return 42; }");
    assert_snapshot!(module.to_string(), @r###"
    module t {
      function main() -> i32 {
      entry:
        ret i32 42i32
      }
    }
    "###);
}

#[test]
fn addition_prints_unfolded_before_sccp_runs() {
    let module = build("int main() { return 1 + 2; }");
    assert_snapshot!(module.to_string(), @r###"
    module t {
      function main() -> i32 {
      entry:
        %t0 = add 1i32, 2i32 : i32
        ret i32 %t0
      }
    }
    "###);
}

#[test]
fn addition_folds_to_a_bare_literal_after_sccp_runs() {
    let mut module = build("int main() { return 1 + 2; }");
    let mut pass = SccpPass::new(SccpConfig::default());
    for function in &mut module.functions {
        pass.run_function(function).unwrap();
    }
    assert_snapshot!(module.to_string(), @r###"
    module t {
      function main() -> i32 {
      entry:
        ret i32 3i32
      }
    }
    "###);
}
