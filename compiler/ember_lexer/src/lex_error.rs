//! Lexer error types.

use ember_ir::Span;
use std::fmt;

/// A lexer error: what went wrong and where.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// A character that starts no token.
    UnexpectedChar(char),
    /// Missing closing `"` for a string literal.
    UnterminatedString,
    /// Missing closing `'` for a char literal.
    UnterminatedChar,
    /// Integer literal above `u64::MAX`.
    IntOverflow,
    /// Float literal could not be parsed.
    FloatParseError,
    /// Unknown escape such as `\q`.
    InvalidEscape(char),
    /// A floating literal written with `0x`, `0o` or `0b`.
    BasedFloat,
    /// Source longer than spans can address.
    SourceTooLarge,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { span, kind }
    }

    /// Human-readable message for diagnostics.
    pub fn message(&self) -> String {
        match &self.kind {
            LexErrorKind::UnexpectedChar(c) => format!("unexpected character {c:?}"),
            LexErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            LexErrorKind::UnterminatedChar => "unterminated character literal".to_string(),
            LexErrorKind::IntOverflow => "integer literal is too large".to_string(),
            LexErrorKind::FloatParseError => "invalid floating literal".to_string(),
            LexErrorKind::InvalidEscape(c) => format!("unknown escape sequence `\\{c}`"),
            LexErrorKind::BasedFloat => {
                "floating literals cannot have a base prefix".to_string()
            }
            LexErrorKind::SourceTooLarge => "source file exceeds 4 GiB".to_string(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.message(), self.span)
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests;
