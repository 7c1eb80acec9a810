//! Plain-text rendering for a terminal.
//!
//! ```text
//! error[E2001]: mismatched types: expected `f64`, found boolean literal
//!   --> demo.em:2:20
//!    |
//!  2 |     x: f64 = 1.0 + true;
//!    |                    ^^^^ type mismatch
//!   = note: ...
//! ```
//!
//! Without attached source text the location is printed as a byte range.

use std::io::{self, Write};

use ember_ir::{LineIndex, Span};

use crate::{Diagnostic, Label};

use super::DiagnosticEmitter;

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const GUTTER: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Whether to emit ANSI escapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colors when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

struct SourceContext {
    text: String,
    lines: LineIndex,
}

pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    source: Option<SourceContext>,
    file_path: Option<String>,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
            file_path: None,
        }
    }

    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }

    /// Attach the source text so labels render as `path:line:col` with a
    /// snippet instead of raw byte ranges.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(SourceContext {
            text: source.to_owned(),
            lines: LineIndex::new(source),
        });
        self
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    fn paint(&mut self, text: &str, color: &str) {
        let _ = if self.colors {
            write!(self.writer, "{color}{text}{}", colors::RESET)
        } else {
            write!(self.writer, "{text}")
        };
    }

    fn write_label(&mut self, label: &Label) {
        let path = self.file_path.as_deref().unwrap_or("<source>").to_owned();
        let located = self.source.as_ref().map(|ctx| {
            let (line, col) = ctx.lines.line_col(label.span.start);
            let text = ctx.lines.line_text(&ctx.text, line).unwrap_or("").to_owned();
            (line, col, text)
        });
        let Some((line, col, text)) = located else {
            let _ = writeln!(self.writer, "  --> {path} {:?}", label.span);
            if !label.message.is_empty() {
                let _ = writeln!(self.writer, "      {}", label.message);
            }
            return;
        };
        let _ = writeln!(self.writer, "  --> {path}:{line}:{col}");

        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());
        let indent = " ".repeat(col.saturating_sub(1) as usize);
        let underline = caret_width(label.span, &text, col);

        self.paint(&format!(" {pad} |"), colors::GUTTER);
        let _ = writeln!(self.writer);
        self.paint(&format!(" {gutter} |"), colors::GUTTER);
        let _ = writeln!(self.writer, " {text}");
        self.paint(&format!(" {pad} |"), colors::GUTTER);
        let _ = write!(self.writer, " {indent}");
        let marks = "^".repeat(underline);
        self.paint(&marks, colors::ERROR);
        if !label.message.is_empty() {
            let _ = write!(self.writer, " ");
            self.paint(&label.message, colors::ERROR);
        }
        let _ = writeln!(self.writer);
    }
}

/// Number of carets under a span starting at 1-based `col` of `line`.
/// Spans running past the end of the line stop there.
fn caret_width(span: Span, line: &str, col: u32) -> usize {
    let room = line.len().saturating_sub(col.saturating_sub(1) as usize);
    (span.len() as usize).clamp(1, room.max(1))
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.paint(&format!("error[{}]", diagnostic.code), colors::ERROR);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        if let Some(label) = &diagnostic.label {
            self.write_label(label);
        }
        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.paint("note", colors::NOTE);
            let _ = writeln!(self.writer, ": {note}");
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}
