//! Compile error type.
//!
//! Compilation stops at the first error. The error travels back to
//! [`compile`](crate::compile) as a value and is turned into a
//! [`Diagnostic`] only at the edge, where it gets rendered.

use ember_diagnostic::{Diagnostic, ErrorCode};
use ember_ir::Span;
use ember_lexer::{LexError, LexErrorKind};
use thiserror::Error;

/// The first error found while compiling a source file.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// The source could not be tokenized.
    #[error("{message}")]
    Lex {
        code: ErrorCode,
        message: String,
        span: Span,
    },
    /// Tokens in the wrong place, a bad type spelling or early end of file.
    #[error("{message}")]
    Syntax {
        code: ErrorCode,
        message: String,
        span: Span,
    },
    /// Well-formed source that breaks a typing or scoping rule.
    #[error("{message}")]
    Semantic {
        code: ErrorCode,
        message: String,
        span: Span,
    },
    /// The backend was handed malformed instructions or the module failed
    /// verification.
    #[error("{message}")]
    Backend {
        code: ErrorCode,
        message: String,
        span: Span,
    },
}

impl CompileError {
    #[cold]
    pub fn syntax(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        CompileError::Syntax {
            code,
            message: message.into(),
            span,
        }
    }

    #[cold]
    pub fn semantic(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        CompileError::Semantic {
            code,
            message: message.into(),
            span,
        }
    }

    #[cold]
    pub fn backend(message: impl Into<String>) -> Self {
        CompileError::Backend {
            code: ErrorCode::E5001,
            message: message.into(),
            span: Span::DUMMY,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::Lex { code, .. }
            | CompileError::Syntax { code, .. }
            | CompileError::Semantic { code, .. }
            | CompileError::Backend { code, .. } => *code,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex { span, .. }
            | CompileError::Syntax { span, .. }
            | CompileError::Semantic { span, .. }
            | CompileError::Backend { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CompileError::Lex { message, .. }
            | CompileError::Syntax { message, .. }
            | CompileError::Semantic { message, .. }
            | CompileError::Backend { message, .. } => message,
        }
    }

    /// Convert to a diagnostic for rendering.
    ///
    /// Backend errors have no source location, so they get a note instead of
    /// a label.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        let diagnostic = Diagnostic::error(code).with_message(self.message());
        match self {
            CompileError::Backend { .. } => {
                diagnostic.with_note("this is a compiler bug: the emitted module is malformed")
            }
            _ => diagnostic.with_label(self.span(), code.description()),
        }
    }
}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        let code = match err.kind {
            LexErrorKind::UnexpectedChar(_) => ErrorCode::E0001,
            LexErrorKind::UnterminatedString | LexErrorKind::UnterminatedChar => ErrorCode::E0002,
            LexErrorKind::IntOverflow | LexErrorKind::FloatParseError => ErrorCode::E0003,
            LexErrorKind::InvalidEscape(_) => ErrorCode::E0004,
            LexErrorKind::BasedFloat => ErrorCode::E0005,
            LexErrorKind::SourceTooLarge => ErrorCode::E9001,
        };
        CompileError::Lex {
            code,
            message: err.message(),
            span: err.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lex_errors_map_to_lexer_codes() {
        let err = CompileError::from(LexError::new(
            LexErrorKind::UnterminatedChar,
            Span::new(3, 5),
        ));
        assert_eq!(err.code(), ErrorCode::E0002);
        assert_eq!(err.span(), Span::new(3, 5));
        assert_eq!(err.to_string(), "unterminated character literal");
    }

    #[test]
    fn diagnostic_carries_primary_label() {
        let err = CompileError::semantic(ErrorCode::E2001, "mismatched types", Span::new(0, 4));
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code, ErrorCode::E2001);
        assert_eq!(diagnostic.message, "mismatched types");
        assert_eq!(diagnostic.span(), Some(Span::new(0, 4)));
    }

    #[test]
    fn backend_error_has_note_not_label() {
        let diagnostic = CompileError::backend("bad").to_diagnostic();
        assert_eq!(diagnostic.code, ErrorCode::E5001);
        assert_eq!(diagnostic.label, None);
        assert_eq!(diagnostic.notes.len(), 1);
    }
}
