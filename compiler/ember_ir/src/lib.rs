//! Core shared types for the Ember compiler.
//!
//! Everything here is used by more than one phase: source spans, the
//! identifier table, line/column lookup and the token vocabulary produced by
//! the lexer and consumed by the parser.

mod line_index;
mod name;
mod span;
mod token;

pub use line_index::LineIndex;
pub use name::{IdentifierTable, Name};
pub use span::Span;
pub use token::{Token, TokenKind};
