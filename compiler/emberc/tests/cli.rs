//! End-to-end tests of the `ember` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn ember(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ember"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ember")
}

fn write_source(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[cfg(feature = "llvm")]
#[test]
fn success_writes_ir_next_to_the_source() {
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "count.em",
        "limit: i64 = 10;\nfn main() { i: i64 = 0; while i < limit { i += 1; } }\n",
    );

    let output = ember(&[&source]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let ir = std::fs::read_to_string(dir.path().join("count.em.ll")).unwrap();
    assert!(ir.starts_with("; ModuleID = 'count.em'\n"), "{ir}");
    assert!(ir.contains("source_filename = \"count.em\""), "{ir}");
    assert!(ir.contains("@limit = global i64 10"), "{ir}");
    assert!(ir.contains("define i32 @main() {"), "{ir}");
    assert!(ir.contains("while_condition:"), "{ir}");
}

#[cfg(feature = "llvm")]
#[test]
fn type_error_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "bad.em", "fn main() {\n    x: i64 = true;\n}\n");

    let output = ember(&[&source]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("bad.em.ll").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E2001"), "{stderr}");
    assert!(stderr.contains(":2:"), "{stderr}");
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = ember(&[&dir.path().join("absent.em")]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E9001"), "{stderr}");
    assert!(stderr.contains("cannot find file"), "{stderr}");
}

#[test]
fn wrong_argument_count_prints_usage() {
    let output = ember(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: ember <file>"));

    let output = ember(&[Path::new("a.em"), Path::new("b.em")]);
    assert_eq!(output.status.code(), Some(1));
}

#[cfg(feature = "llvm")]
#[test]
fn library_build_returns_the_output_path() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "lib.em", "fn main() -> i64 { return 0x2A; }\n");
    let written = emberc::build_file(&source).unwrap();
    assert_eq!(written, dir.path().join("lib.em.ll"));
    assert!(std::fs::read_to_string(written)
        .unwrap()
        .contains("ret i64 42"));
}

#[cfg(not(feature = "llvm"))]
#[test]
fn without_llvm_builds_report_the_missing_backend() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "main.em", "fn main() {}\n");

    let output = ember(&[&source]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("main.em.ll").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E9003"), "{stderr}");
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_paths_are_accepted() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let source = dir.path().join(OsStr::from_bytes(b"caf\xE9.em"));
    std::fs::write(&source, "fn main() -> i64 { return 7; }\n").unwrap();

    let output = ember(&[&source]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked"), "{stderr}");

    #[cfg(feature = "llvm")]
    {
        assert!(output.status.success(), "{stderr}");
        let written = dir.path().join(OsStr::from_bytes(b"caf\xE9.em.ll"));
        assert!(std::fs::read_to_string(written).unwrap().contains("ret i64 7"));
    }
    #[cfg(not(feature = "llvm"))]
    {
        assert_eq!(output.status.code(), Some(1));
        assert!(stderr.contains("E9003"), "{stderr}");
    }
}
