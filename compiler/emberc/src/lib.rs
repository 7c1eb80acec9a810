//! Ember compiler driver.
//!
//! Reads one source file, compiles it and writes the module as LLVM textual
//! IR next to the source, at `<path>.ll`. Errors are values until they reach
//! [`report`], which renders them as diagnostics.
//!
//! Code generation needs the `llvm` feature. Without it every build fails
//! with E9003.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use ember_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use ember_diagnostic::{Diagnostic, ErrorCode};
use ember_parse::CompileError;
#[cfg(feature = "llvm")]
use ember_parse::CompileOptions;
use thiserror::Error;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and nothing after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
                .with(filter)
                .init();
        }
    });
}

/// Everything that can stop a build.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{message}")]
    Read {
        message: String,
        #[source]
        source: io::Error,
    },
    /// The program is wrong. Carries the source text for snippet rendering.
    #[error("{error}")]
    Compile { error: CompileError, text: String },
    #[error("cannot write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
    /// Built without the `llvm` feature.
    #[error(
        "cannot compile '{}': ember was built without LLVM support (rebuild with `--features llvm`)",
        path.display()
    )]
    BackendUnavailable { path: PathBuf },
}

impl DriverError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DriverError::Read { .. } => ErrorCode::E9001,
            DriverError::Compile { error, .. } => error.code(),
            DriverError::Write { .. } => ErrorCode::E9002,
            DriverError::BackendUnavailable { .. } => ErrorCode::E9003,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DriverError::Compile { error, .. } => error.to_diagnostic(),
            other => Diagnostic::error(other.code()).with_message(other.to_string()),
        }
    }
}

/// The output path for `source`: the same path with `.ll` appended.
///
/// An existing extension is kept, so `demo.em` becomes `demo.em.ll`.
pub fn output_path(source: &Path) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(".ll");
    PathBuf::from(name)
}

/// Compile `path` and write `<path>.ll`. Returns the path written.
///
/// Nothing is written when compilation fails.
#[cfg(feature = "llvm")]
pub fn build_file(path: &Path) -> Result<PathBuf, DriverError> {
    let text = read_source(path)?;
    let options = CompileOptions::for_path(path);
    tracing::debug!(path = %path.display(), bytes = text.len(), "compiling");

    let context = ember_llvm::Context::create();
    let module = match ember_llvm::compile(&context, &text, &options) {
        Ok(module) => module,
        Err(error) => return Err(DriverError::Compile { error, text }),
    };

    let output = output_path(path);
    ember_llvm::write_module(&module, &output).map_err(|e| DriverError::Write {
        path: e.path,
        message: e.message,
    })?;
    tracing::debug!(output = %output.display(), "build finished");
    Ok(output)
}

/// Without the `llvm` feature there is nothing to build with. The source is
/// still read so a missing file reports as one.
#[cfg(not(feature = "llvm"))]
pub fn build_file(path: &Path) -> Result<PathBuf, DriverError> {
    read_source(path)?;
    tracing::debug!(path = %path.display(), "built without the llvm feature");
    Err(DriverError::BackendUnavailable {
        path: path.to_path_buf(),
    })
}

fn read_source(path: &Path) -> Result<String, DriverError> {
    std::fs::read_to_string(path).map_err(|source| {
        let shown = path.display();
        let message = match source.kind() {
            io::ErrorKind::NotFound => format!("cannot find file '{shown}'"),
            io::ErrorKind::PermissionDenied => format!("permission denied reading '{shown}'"),
            io::ErrorKind::InvalidData => format!("'{shown}' contains invalid UTF-8 data"),
            _ => format!("error reading '{shown}': {source}"),
        };
        DriverError::Read { message, source }
    })
}

/// Render `error` on stderr, with a source snippet when one is available.
pub fn report(path: &Path, error: &DriverError) {
    let is_tty = io::IsTerminal::is_terminal(&io::stderr());
    let mut emitter = TerminalEmitter::<io::Stderr>::stderr(ColorMode::Auto, is_tty)
        .with_file_path(path.display().to_string());
    if let DriverError::Compile { text, .. } = error {
        emitter = emitter.with_source(text);
    }
    emitter.emit(&error.to_diagnostic());
    emitter.flush();
}
