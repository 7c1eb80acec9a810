//! Backend tests: programs compiled through `IrBuilder`, then either
//! printed or run through the JIT.
//!
//! - `runtime_tests`: values computed by the emitted code
//! - `ir_text_tests`: the printed module, verification and file output
//! - `property_tests`: randomized agreement between folding and emission

mod runtime_tests;

use ember_parse::{CompileError, CompileOptions};

use crate::{compile, Context, Evaluator, JitValue};

/// The printed module for `source` compiled with `options`.
fn module_text_with(source: &str, options: &CompileOptions) -> String {
    let context = Context::create();
    match compile(&context, source, options) {
        Ok(module) => module.print_to_string().to_string(),
        Err(err) => panic!("unexpected {}: {err}\n{source}", err.code()),
    }
}

fn module_text(source: &str) -> String {
    module_text_with(source, &CompileOptions::default())
}

fn compile_err(source: &str) -> CompileError {
    let context = Context::create();
    match compile(&context, source, &CompileOptions::default()) {
        Ok(_) => panic!("expected an error compiling:\n{source}"),
        Err(err) => err,
    }
}

/// Compile `source` and call `function` with `args`.
fn run(source: &str, function: &str, args: &[u64]) -> JitValue {
    let context = Context::create();
    let module = match compile(&context, source, &CompileOptions::default()) {
        Ok(module) => module,
        Err(err) => panic!("unexpected {}: {err}\n{source}", err.code()),
    };
    let evaluator = Evaluator::new(module).expect("JIT setup failed");
    evaluator.call(function, args).expect("JIT call failed")
}

/// Run `main` and read its result as a signed integer.
fn run_main(source: &str) -> i64 {
    run(source, "main", &[])
        .as_signed()
        .unwrap_or_else(|| panic!("`main` returned no integer:\n{source}"))
}

/// Two's complement bits of `value`, as passed in an argument register.
fn arg(value: i64) -> u64 {
    u64::from_ne_bytes(value.to_ne_bytes())
}
