// src/main.rs
use clap::Parser as ClapParser;
use cflow::cli::Args;
use cflow::error::compile_error::CompileError;
use cflow::error::error_reporter::ErrorReporter;
use cflow::ir::builder::IrBuilder;
use cflow::ir::optimizer::{run_pipeline, SccpConfig, SccpPass};
use cflow::lexer::{lexer_tokenize_with_errors, Lexer};
use cflow::location::line_tracker::LineTracker;
use cflow::parser::jsav_parser::Parser;
use cflow::semantic::SemanticAnalyzer;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(errors) => {
            let source = fs::read_to_string(&args.input).unwrap_or_default();
            let file_path = args.input.to_string_lossy().into_owned();
            let reporter = ErrorReporter::new(LineTracker::new(&file_path, source));
            reporter.report_errors(errors);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Vec<CompileError>> {
    let file_path = args.input.to_string_lossy().into_owned();
    let source = fs::read_to_string(&args.input).map_err(|e| vec![CompileError::IoError(e)])?;

    if args.verbose {
        eprintln!("[lex] {file_path}");
    }
    let mut lexer = Lexer::new(&file_path, &source);
    let (tokens, lex_errors) = lexer_tokenize_with_errors(&mut lexer);
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }

    if args.verbose {
        eprintln!("[parse] {} tokens", tokens.len());
    }
    let (ast, parse_errors) = Parser::new(tokens).parse();
    if !parse_errors.is_empty() {
        return Err(parse_errors);
    }

    if args.verbose {
        eprintln!("[semantic] {} top-level statement(s)", ast.len());
    }
    let semantic_errors = SemanticAnalyzer::new().check(&ast);
    if !semantic_errors.is_empty() {
        return Err(semantic_errors);
    }

    if args.verbose {
        eprintln!("[build] lowering to SSA IR");
    }
    let mut module = IrBuilder::build_module(&file_path, &ast).map_err(|e| vec![e])?;
    for function in &module.functions {
        if let Err(message) = function.cfg.verify() {
            return Err(vec![CompileError::SemanticError { message, span: Default::default() }]);
        }
    }

    if args.emit_ir {
        println!("{module}");
    }

    if !args.no_sccp {
        let pass = SccpPass::new(SccpConfig { verbose: args.verbose, max_iterations: args.max_iterations });
        run_pipeline(&mut module, vec![Box::new(pass)], args.verbose).map_err(|e| vec![e])?;
        for function in &module.functions {
            function.cfg.verify().map_err(|message| vec![CompileError::SemanticError { message, span: Default::default() }])?;
        }
        println!("{module}");
    } else if !args.emit_ir {
        println!("{module}");
    }

    Ok(())
}
