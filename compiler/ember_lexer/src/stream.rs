//! Token stream with one token of lookahead.

use std::mem;

use ember_ir::{IdentifierTable, LineIndex, Span, Token, TokenKind};
use logos::Logos;

use crate::escape::{cook_char, cook_string};
use crate::raw_token::RawToken;
use crate::{LexError, LexErrorKind};

/// Lazily lexed token stream over one source file.
///
/// Holds the current token and the one after it. Every call that produces a
/// new token takes the identifier table, so interning is shared across
/// rewinds and owned by the caller.
pub struct TokenStream<'src> {
    source: &'src str,
    raw: logos::Lexer<'src, RawToken>,
    lines: LineIndex,
    current: Token,
    next: Token,
}

impl<'src> TokenStream<'src> {
    /// Start lexing `source`, filling the current and lookahead tokens.
    pub fn new(source: &'src str, idents: &mut IdentifierTable) -> Result<Self, LexError> {
        let end = end_offset(source)?;
        let eof = Token::new(TokenKind::Eof, Span::new(end, end), 0, 0);
        let mut stream = TokenStream {
            source,
            raw: RawToken::lexer(source),
            lines: LineIndex::new(source),
            current: eof.clone(),
            next: eof,
        };
        stream.prime(idents)?;
        Ok(stream)
    }

    /// Reset to the start of the source. Interned ids are left untouched.
    pub fn rewind(&mut self, idents: &mut IdentifierTable) -> Result<(), LexError> {
        tracing::trace!("rewinding token stream");
        self.raw = RawToken::lexer(self.source);
        self.prime(idents)
    }

    fn prime(&mut self, idents: &mut IdentifierTable) -> Result<(), LexError> {
        self.current = self.lex_token(idents)?;
        self.next = self.lex_token(idents)?;
        Ok(())
    }

    #[inline]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// The token after [`current`](Self::current).
    #[inline]
    pub fn peek(&self) -> &Token {
        &self.next
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Move to the next token, returning the one that was current.
    ///
    /// Advancing at end of file keeps yielding `Eof`.
    pub fn advance(&mut self, idents: &mut IdentifierTable) -> Result<Token, LexError> {
        let incoming = self.lex_token(idents)?;
        let lookahead = mem::replace(&mut self.next, incoming);
        Ok(mem::replace(&mut self.current, lookahead))
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    fn lex_token(&mut self, idents: &mut IdentifierTable) -> Result<Token, LexError> {
        loop {
            let Some(result) = self.raw.next() else {
                let end = end_offset(self.source)?;
                let (line, column) = self.lines.line_col(end);
                return Ok(Token::new(TokenKind::Eof, Span::new(end, end), line, column));
            };
            let slice: &'src str = self.raw.slice();
            let span = Span::from_range(self.raw.span())
                .ok_or_else(|| LexError::new(LexErrorKind::SourceTooLarge, Span::DUMMY))?;
            let kind = match result {
                Ok(raw) => match cook(raw, slice, span, idents)? {
                    Some(kind) => kind,
                    None => continue,
                },
                Err(()) => return Err(classify_error(slice, span)),
            };
            let (line, column) = self.lines.line_col(span.start);
            return Ok(Token::new(kind, span, line, column));
        }
    }
}

fn end_offset(source: &str) -> Result<u32, LexError> {
    u32::try_from(source.len())
        .map_err(|_| LexError::new(LexErrorKind::SourceTooLarge, Span::DUMMY))
}

/// Turn a raw token into its final kind. `None` means the token is trivia.
fn cook(
    raw: RawToken,
    slice: &str,
    span: Span,
    idents: &mut IdentifierTable,
) -> Result<Option<TokenKind>, LexError> {
    let kind = match raw {
        RawToken::LineComment => return Ok(None),

        RawToken::Fn => TokenKind::Fn,
        RawToken::Struct => TokenKind::Struct,
        RawToken::While => TokenKind::While,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::Return => TokenKind::Return,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,

        RawToken::IntType(width) => TokenKind::IntType(width),
        RawToken::UnsignedType(width) => TokenKind::UnsignedType(width),
        RawToken::FloatType(width) => TokenKind::FloatType(width),
        RawToken::BoolType => TokenKind::BoolType,
        RawToken::CharType => TokenKind::CharType,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Arrow => TokenKind::Arrow,

        RawToken::Eq => TokenKind::Eq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::TildeTilde => TokenKind::TildeTilde,
        RawToken::ShlEq => TokenKind::ShlEq,
        RawToken::ShrEq => TokenKind::ShrEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,

        RawToken::HexInt(value)
        | RawToken::OctInt(value)
        | RawToken::BinInt(value)
        | RawToken::DecInt(value) => TokenKind::Int(value),
        RawToken::Float(value) => TokenKind::Float(value),
        RawToken::BasedFloat => return Err(LexError::new(LexErrorKind::BasedFloat, span)),

        RawToken::String => {
            let body = &slice[1..slice.len() - 1];
            let text = cook_string(body)
                .map_err(|c| LexError::new(LexErrorKind::InvalidEscape(c), span))?;
            TokenKind::Str(text.into_boxed_str())
        }
        RawToken::Char => {
            let body = &slice[1..slice.len() - 1];
            let c =
                cook_char(body).map_err(|c| LexError::new(LexErrorKind::InvalidEscape(c), span))?;
            TokenKind::Char(c)
        }
        RawToken::Ident => TokenKind::Ident(idents.intern(slice)),
    };
    Ok(Some(kind))
}

/// Logos reports every failure the same way; recover the cause from the
/// text it gave up on.
fn classify_error(slice: &str, span: Span) -> LexError {
    let first = slice.chars().next().unwrap_or('\0');
    let kind = match first {
        '"' => LexErrorKind::UnterminatedString,
        '\'' => LexErrorKind::UnterminatedChar,
        c if c.is_ascii_digit() && slice.contains('.') => LexErrorKind::FloatParseError,
        c if c.is_ascii_digit() => LexErrorKind::IntOverflow,
        c => LexErrorKind::UnexpectedChar(c),
    };
    LexError::new(kind, span)
}
