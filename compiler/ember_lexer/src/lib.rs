//! Lexer for Ember using logos with identifier interning.
//!
//! The parser consumes tokens through [`TokenStream`], which keeps a current
//! token and one token of lookahead and can be rewound to the start of the
//! source for another top-level pass. Identifiers are interned into a
//! caller-owned [`IdentifierTable`](ember_ir::IdentifierTable) so that ids
//! survive rewinds.

mod escape;
mod lex_error;
mod parse_helpers;
mod raw_token;
mod stream;

pub use lex_error::{LexError, LexErrorKind};
pub use stream::TokenStream;

use ember_ir::{IdentifierTable, Token, TokenKind};

/// Lex a whole source into a token vector, ending with `Eof`.
pub fn tokenize(source: &str, idents: &mut IdentifierTable) -> Result<Vec<Token>, LexError> {
    let mut stream = TokenStream::new(source, idents)?;
    let mut tokens = Vec::new();
    loop {
        let token = stream.current().clone();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
        stream.advance(idents)?;
    }
}
