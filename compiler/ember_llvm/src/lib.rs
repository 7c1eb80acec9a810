//! LLVM backend for Ember.
//!
//! [`IrBuilder`] implements the front end's `Backend` over inkwell, so the
//! single-pass parser in `ember_parse` emits straight into an LLVM module.
//! [`Evaluator`] runs the result through the MCJIT for tests and tooling.
//!
//! This crate is excluded from the workspace because it needs LLVM 17.

mod context;
mod evaluator;
mod ir_builder;
mod value_id;

use std::fmt;
use std::path::{Path, PathBuf};

use inkwell::module::Module;

use ember_parse::{CompileError, CompileOptions};

pub use context::SimpleCx;
pub use evaluator::{EvalError, Evaluator, JitValue};
pub use inkwell::context::Context;
pub use ir_builder::IrBuilder;
pub use value_id::{BlockId, FunctionId, ValueId};

/// Compile `source` into a verified module owned by `context`.
pub fn compile<'ctx>(
    context: &'ctx Context,
    source: &str,
    options: &CompileOptions,
) -> Result<Module<'ctx>, CompileError> {
    let scx = SimpleCx::new(context, options);
    {
        let mut builder = IrBuilder::new(&scx);
        ember_parse::compile(source, options, &mut builder)?;
    }
    tracing::debug!(module = %options.module_name, "module compiled");
    Ok(scx.llmod)
}

/// Failure to write textual IR.
#[derive(Debug, Clone)]
pub struct WriteError {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot write `{}`: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for WriteError {}

/// Write the module's textual IR to `path`.
pub fn write_module(module: &Module<'_>, path: &Path) -> Result<(), WriteError> {
    module.print_to_file(path).map_err(|e| WriteError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests;
