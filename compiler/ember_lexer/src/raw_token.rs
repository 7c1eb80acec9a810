//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived tokenizer output before
//! identifier interning and literal cooking.

use logos::Logos;

use crate::parse_helpers::{parse_float_skip_underscores, parse_int_skip_underscores, parse_width};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    // Keywords
    #[token("fn")]
    Fn,
    #[token("struct")]
    Struct,
    #[token("while")]
    While,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Type keywords
    #[regex(r"i[0-9]+", |lex| parse_width(&lex.slice()[1..]), priority = 3)]
    IntType(u32),
    #[regex(r"u[0-9]+", |lex| parse_width(&lex.slice()[1..]), priority = 3)]
    UnsignedType(u32),
    #[regex(r"f[0-9]+", |lex| parse_width(&lex.slice()[1..]), priority = 3)]
    FloatType(u32),
    #[token("bool")]
    BoolType,
    #[token("char")]
    CharType,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,

    // Operators
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("~~")]
    TildeTilde,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // Literals
    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*", |lex| parse_int_skip_underscores(&lex.slice()[2..], 16))]
    HexInt(u64),
    #[regex(r"0o[0-7][0-7_]*", |lex| parse_int_skip_underscores(&lex.slice()[2..], 8))]
    OctInt(u64),
    #[regex(r"0b[01][01_]*", |lex| parse_int_skip_underscores(&lex.slice()[2..], 2))]
    BinInt(u64),
    #[regex(r"[0-9][0-9_]*", |lex| parse_int_skip_underscores(lex.slice(), 10))]
    DecInt(u64),
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| parse_float_skip_underscores(lex.slice()))]
    Float(f64),
    /// `0x1.8` and friends: recognized only to be rejected with a clear error.
    #[regex(r"0[xob][0-9a-fA-F_]+\.[0-9a-fA-F_]+")]
    BasedFloat,

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n\r]|\\.)'")]
    Char,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}
