//! # Semantic Analysis Module
//!
//! Resolves names and checks call arity over the parsed AST, the third
//! phase of the pipeline. Every value in this language is `int`, so there
//! is no type lattice to reconcile here, only scoping rules.
pub mod symbol_table;
pub mod type_checker;

pub use type_checker::SemanticAnalyzer;
