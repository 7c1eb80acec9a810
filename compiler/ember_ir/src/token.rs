//! Token vocabulary shared by the lexer and the parser.

use std::fmt;

use crate::{Name, Span};

/// A cooked token with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: u32,
    /// 1-based byte column of `span.start`.
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, line: u32, column: u32) -> Self {
        Token {
            kind,
            span,
            line,
            column,
        }
    }
}

/// Token kinds, with their payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals and names
    Ident(Name),
    /// Magnitude of an integer literal; a leading `-` is a separate token.
    Int(u64),
    Float(f64),
    Char(char),
    Str(Box<str>),

    // Type keywords, with their bit width where the spelling carries one
    IntType(u32),
    UnsignedType(u32),
    FloatType(u32),
    BoolType,
    CharType,

    // Keywords
    Fn,
    Struct,
    While,
    If,
    Else,
    For,
    Return,
    True,
    False,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Arrow,

    // Operators
    Eq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    TildeTilde,
    ShlEq,
    ShrEq,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    Eof,
}

impl TokenKind {
    /// Is this `kind` the same token as `self`, ignoring payloads?
    pub fn same_kind(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(kind)
    }

    /// Fixed spelling for punctuation, operators and keywords.
    pub fn spelling(&self) -> Option<&'static str> {
        let s = match self {
            TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Char(_)
            | TokenKind::Str(_)
            | TokenKind::IntType(_)
            | TokenKind::UnsignedType(_)
            | TokenKind::FloatType(_)
            | TokenKind::Eof => return None,
            TokenKind::BoolType => "bool",
            TokenKind::CharType => "char",
            TokenKind::Fn => "fn",
            TokenKind::Struct => "struct",
            TokenKind::While => "while",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Eq => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::TildeTilde => "~~",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
        };
        Some(s)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.spelling() {
            return write!(f, "`{s}`");
        }
        match self {
            TokenKind::Ident(_) => write!(f, "identifier"),
            TokenKind::Int(v) => write!(f, "integer literal `{v}`"),
            TokenKind::Float(v) => write!(f, "float literal `{v}`"),
            TokenKind::Char(c) => write!(f, "character literal {c:?}"),
            TokenKind::Str(s) => write!(f, "string literal {s:?}"),
            TokenKind::IntType(w) => write!(f, "`i{w}`"),
            TokenKind::UnsignedType(w) => write!(f, "`u{w}`"),
            TokenKind::FloatType(w) => write!(f, "`f{w}`"),
            _ => write!(f, "end of file"),
        }
    }
}
