// benches/sccp_benchmark.rs
use cflow::ir::builder::IrBuilder;
use cflow::ir::optimizer::{SccpConfig, SccpPass};
use cflow::lexer::{lexer_tokenize_with_errors, Lexer};
use cflow::parser::jsav_parser::Parser;
use cflow::semantic::SemanticAnalyzer;
use criterion::measurement::WallTime;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

fn configure_benchmark_group(group: &mut BenchmarkGroup<WallTime>, warm_up: u64, measurement: u64) {
    group.warm_up_time(Duration::from_secs(warm_up)).measurement_time(Duration::from_secs(measurement));
}

/// A synthetic, deeply-nested chain of if/else statements that all assign
/// the same variable, so SCCP has a long run of phis to fold on a known
/// branch condition at every nesting level.
fn nested_branch_source(depth: usize) -> String {
    let mut src = String::from("int f(int n) {\n  int x = 0;\n");
    for i in 0..depth {
        src.push_str(&format!("  if (1) {{ x = x + {i}; }} else {{ x = x - {i}; }}\n"));
    }
    src.push_str("  return x + n;\n}\n");
    src
}

fn build_module(src: &str) -> cflow::ir::Module {
    let mut lexer = Lexer::new("bench.c", src);
    let (tokens, lex_errors) = lexer_tokenize_with_errors(&mut lexer);
    assert!(lex_errors.is_empty());
    let (ast, parse_errors) = Parser::new(tokens).parse();
    assert!(parse_errors.is_empty(), "{parse_errors:?}");
    let sem_errors = SemanticAnalyzer::new().check(&ast);
    assert!(sem_errors.is_empty(), "{sem_errors:?}");
    IrBuilder::build_module("bench", &ast).unwrap()
}

pub fn benchmark_lexer_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("cflow-lex-parse");
    configure_benchmark_group(&mut group, 2, 5);

    let cases = [("shallow", nested_branch_source(8)), ("deep", nested_branch_source(256))];
    for (name, src) in &cases {
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), src, |b, src| {
            b.iter(|| {
                let mut lexer = Lexer::new("bench.c", black_box(src.as_str()));
                let (tokens, _) = lexer_tokenize_with_errors(&mut lexer);
                let (ast, _) = Parser::new(tokens).parse();
                black_box(ast);
            })
        });
    }
    group.finish();
}

pub fn benchmark_sccp_fixpoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("cflow-sccp");
    configure_benchmark_group(&mut group, 2, 5);

    let depths = [8usize, 32, 128];
    for depth in depths {
        let module = build_module(&nested_branch_source(depth));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &module, |b, module| {
            b.iter_batched(
                || module.clone(),
                |mut module| {
                    let mut pass = SccpPass::new(SccpConfig::default());
                    for function in &mut module.functions {
                        pass.run_function(function).unwrap();
                    }
                    black_box(module);
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_lexer_parser, benchmark_sccp_fixpoint);
criterion_main!(benches);
