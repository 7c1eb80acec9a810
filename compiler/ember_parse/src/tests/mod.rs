//! Front-end tests.
//!
//! Programs are compiled against [`Recorder`], a backend that keeps every
//! request as data:
//! - `top_level`: the three passes, globals, entry point rules
//! - `expressions`: typing, folding, precedence and operator lowering
//! - `statements`: scopes, storage, control flow and returns
//! - `properties`: randomized checks of folding and literal handling
//!
//! Running the emitted code is covered by `ember_llvm`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod recorder;
mod statements;

use ember_diagnostic::ErrorCode;

use crate::backend::Constant;
use crate::{compile, CompilationUnit, CompileError, CompileOptions};
use recorder::Recorder;

fn compile_with(source: &str, options: &CompileOptions) -> (CompilationUnit<Recorder>, Recorder) {
    let mut recorder = Recorder::default();
    match compile(source, options, &mut recorder) {
        Ok(unit) => (unit, recorder),
        Err(err) => panic!("unexpected {}: {err}\n{source}", err.code()),
    }
}

fn compile_ok(source: &str) -> Recorder {
    compile_with(source, &CompileOptions::default()).1
}

fn compile_err(source: &str) -> CompileError {
    match compile(source, &CompileOptions::default(), &mut Recorder::default()) {
        Ok(_) => panic!("expected an error compiling:\n{source}"),
        Err(err) => err,
    }
}

fn error_code(source: &str) -> ErrorCode {
    compile_err(source).code()
}

/// The single constant `function` returns, as a signed integer of `width`.
fn returned_int(recorder: &Recorder, function: &str, width: u32) -> i128 {
    match recorder.returned_constants(function).as_slice() {
        [Constant::Int(bits)] => crate::backend::sign_extend(*bits, width),
        other => panic!("`{function}` does not return one integer constant: {other:?}"),
    }
}

/// Compile a literal-only `main` returning `i64` and read back the folded result.
fn folded_main(expr: &str) -> i128 {
    let source = format!("fn main() -> i64 {{ return {expr}; }}");
    returned_int(&compile_ok(&source), "main", 64)
}
