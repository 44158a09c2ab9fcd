// src/ir/module.rs
use super::Function;
use std::fmt;
use std::sync::Arc;

/// A compiled translation unit: a named bag of functions.
///
/// The source language this crate compiles has no multi-file linkage, data
/// layout, or target triple to track, so `Module` is reduced to exactly
/// what the pipeline and the SCCP phase need: a place to collect functions
/// produced by `ir::builder` and hand to `ir::optimizer::run_pipeline`.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: Arc<str>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into(), functions: Vec::new() }
    }

    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name.as_ref() == name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.name.as_ref() == name)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {} {{", self.name)?;
        if self.functions.is_empty() {
            writeln!(f, "  // no functions")?;
        } else {
            for function in &self.functions {
                for line in function.to_string().lines() {
                    writeln!(f, "  {line}")?;
                }
            }
        }
        write!(f, "}}")
    }
}
