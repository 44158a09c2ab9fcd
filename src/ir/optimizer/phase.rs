use crate::error::compile_error::CompileError;
use crate::ir::Module;

/// A mutating pass over every function in a module, driven in sequence by
/// `run_pipeline`. This crate wires in exactly one phase (`SccpPass`), but
/// the trait keeps the driver open to future passes without touching
/// `main.rs`.
pub trait Phase {
    fn name(&self) -> &'static str;
    /// Returns whether the phase changed anything in `ir`, or the error a
    /// phase bailed out with (e.g. SCCP's fixpoint running past its
    /// iteration cap).
    fn run(&mut self, ir: &mut Module) -> Result<bool, CompileError>;
}

pub fn run_pipeline(ir: &mut Module, phases: Vec<Box<dyn Phase>>, verbose: bool) -> Result<(), CompileError> {
    for mut phase in phases {
        if verbose {
            println!("Running phase: {}", phase.name());
        }
        let changed = phase.run(ir)?;
        if verbose {
            println!("Phase {} {}", phase.name(), if changed { "modified the module" } else { "made no changes" });
        }
    }
    Ok(())
}
