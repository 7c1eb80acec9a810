//! `ember <file>`: compile one Ember source file to `<file>.ll`.

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    emberc::init_tracing();

    // Paths need not be UTF-8.
    let args: Vec<OsString> = std::env::args_os().collect();
    let [_, path] = args.as_slice() else {
        eprintln!("Usage: ember <file>");
        eprintln!();
        eprintln!("Compiles <file> and writes LLVM IR to <file>.ll");
        return ExitCode::FAILURE;
    };

    let path = Path::new(path);
    match emberc::build_file(path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            emberc::report(path, &err);
            ExitCode::FAILURE
        }
    }
}
