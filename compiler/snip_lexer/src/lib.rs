//! Lexer for the snippet language using logos.
//!
//! Produces a flat token vector terminated by [`TokenKind::Eof`], plus any
//! lexical diagnostics. Malformed literals still yield a token (with a
//! placeholder value) so the parser can keep going.

mod escape;
mod token;

use logos::Logos;
use snip_diagnostic::{Diagnostics, ErrorCode};
use snip_ir::Span;

pub use escape::{unescape, EscapeError};
pub use token::{Token, TokenKind};

/// Raw token from logos (before literal conversion).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    /// Payload is `true` when the closing `*/` was found.
    #[token("/*", block_comment)]
    BlockComment(bool),

    #[token("using")]
    Using,
    #[token("class")]
    Class,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("internal")]
    Internal,
    #[token("protected")]
    Protected,
    #[token("static")]
    Static,
    #[token("void")]
    Void,
    #[token("bool")]
    Bool,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("char")]
    CharKw,
    #[token("string")]
    String,
    #[token("object")]
    Object,
    #[token("var")]
    Var,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("return")]
    Return,
    #[token("throw")]
    Throw,
    #[token("new")]
    New,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,

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
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

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
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("=")]
    Eq,
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
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,

    // Hex integer, optional long suffix
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*[lL]?")]
    HexInt,

    // Decimal integer, optional long suffix
    #[regex(r"[0-9][0-9_]*[lL]?")]
    DecInt,

    // Real: fraction and/or exponent, or a bare type suffix (`5f`, `2d`)
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    Real,

    // String literal (no unescaped newlines allowed)
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    Str,
    #[regex(r#""([^"\\\n\r]|\\.)*"#)]
    UnterminatedStr,

    // Char literal; length is checked after unescaping
    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    Char,
    #[regex(r"'([^'\\\n\r]|\\.)*")]
    UnterminatedChar,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Consume a block comment body. Unterminated comments run to end of input.
fn block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> Option<bool> {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        Some(true)
    } else {
        lex.bump(lex.remainder().len());
        Some(false)
    }
}

/// Result of lexing one compilation unit.
#[derive(Clone, Debug, PartialEq)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

/// Lex source text into tokens.
pub fn lex(source: &str) -> LexOutput {
    let mut tokens = Vec::new();
    let mut diagnostics = Diagnostics::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        match token_result {
            Ok(RawToken::LineComment | RawToken::BlockComment(true)) => {}
            Ok(RawToken::BlockComment(false)) => {
                diagnostics.error(ErrorCode::E0006, "End-of-file found, '*/' expected", span);
            }
            Ok(raw) => {
                let kind = convert_token(raw, slice, span, &mut diagnostics);
                tokens.push(Token::new(kind, span));
            }
            Err(()) => {
                let c = slice.chars().next().unwrap_or('\u{fffd}');
                diagnostics.error(ErrorCode::E0002, format!("Unexpected character '{c}'"), span);
            }
        }
    }

    let eof = Span::point(u32::try_from(source.len()).unwrap_or(u32::MAX));
    tokens.push(Token::new(TokenKind::Eof, eof));

    LexOutput {
        tokens,
        diagnostics,
    }
}

/// Convert a raw token to a `TokenKind`, decoding literal values.
fn convert_token(
    raw: RawToken,
    slice: &str,
    span: Span,
    diagnostics: &mut Diagnostics,
) -> TokenKind {
    match raw {
        // Literals
        RawToken::DecInt | RawToken::HexInt => {
            let (digits, long) = match slice.strip_suffix(['l', 'L']) {
                Some(digits) => (digits, true),
                None => (slice, false),
            };
            let digits = digits.replace('_', "");
            let parsed = if raw == RawToken::HexInt {
                u64::from_str_radix(&digits[2..], 16)
            } else {
                digits.parse::<u64>()
            };
            let value = parsed.unwrap_or_else(|_| {
                diagnostics.error(ErrorCode::E0003, "Integral constant is too large", span);
                0
            });
            TokenKind::Int { value, long }
        }
        RawToken::Real => {
            let (digits, single) = match slice.strip_suffix(['f', 'F']) {
                Some(digits) => (digits, true),
                None => (slice.trim_end_matches(['d', 'D']), false),
            };
            let value = digits.replace('_', "").parse::<f64>().unwrap_or_else(|_| {
                diagnostics.error(ErrorCode::E0003, "Invalid real literal", span);
                0.0
            });
            TokenKind::Real { value, single }
        }
        RawToken::Str => TokenKind::Str(literal_content(&slice[1..slice.len() - 1], span, diagnostics)),
        RawToken::UnterminatedStr => {
            diagnostics.error(ErrorCode::E0001, "Newline in constant", span);
            TokenKind::Str(literal_content(&slice[1..], span, diagnostics))
        }
        RawToken::Char => {
            let content = literal_content(&slice[1..slice.len() - 1], span, diagnostics);
            let mut chars = content.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => TokenKind::Char(c),
                (None, _) => {
                    diagnostics.error(ErrorCode::E0004, "Empty character literal", span);
                    TokenKind::Char('\0')
                }
                (Some(c), Some(_)) => {
                    diagnostics.error(
                        ErrorCode::E0004,
                        "Too many characters in character literal",
                        span,
                    );
                    TokenKind::Char(c)
                }
            }
        }
        RawToken::UnterminatedChar => {
            diagnostics.error(ErrorCode::E0004, "Newline in constant", span);
            TokenKind::Char('\0')
        }
        RawToken::Ident => TokenKind::Ident(slice.to_string()),

        // Keywords
        RawToken::Using => TokenKind::Using,
        RawToken::Class => TokenKind::Class,
        RawToken::Public => TokenKind::Public,
        RawToken::Private => TokenKind::Private,
        RawToken::Internal => TokenKind::Internal,
        RawToken::Protected => TokenKind::Protected,
        RawToken::Static => TokenKind::Static,
        RawToken::Void => TokenKind::Void,
        RawToken::Bool => TokenKind::Bool,
        RawToken::Byte => TokenKind::Byte,
        RawToken::Short => TokenKind::Short,
        RawToken::Int => TokenKind::IntKw,
        RawToken::Long => TokenKind::Long,
        RawToken::Float => TokenKind::Float,
        RawToken::Double => TokenKind::Double,
        RawToken::CharKw => TokenKind::CharKw,
        RawToken::String => TokenKind::String,
        RawToken::Object => TokenKind::Object,
        RawToken::Var => TokenKind::Var,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::For => TokenKind::For,
        RawToken::Return => TokenKind::Return,
        RawToken::Throw => TokenKind::Throw,
        RawToken::New => TokenKind::New,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,

        // Delimiters
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,

        // Operators
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::Eq => TokenKind::Eq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::ShlEq => TokenKind::ShlEq,
        RawToken::ShrEq => TokenKind::ShrEq,

        // Trivia is filtered out by `lex`.
        RawToken::LineComment | RawToken::BlockComment(_) => TokenKind::Eof,
    }
}

/// Unescape literal content, reporting a bad escape at its exact location.
fn literal_content(content: &str, span: Span, diagnostics: &mut Diagnostics) -> String {
    match unescape(content) {
        Ok(text) => text,
        Err(err) => {
            // Content starts one byte after the opening quote.
            let start = span.start as usize + 1 + err.offset;
            diagnostics.error(
                ErrorCode::E0005,
                "Unrecognized escape sequence",
                Span::from_range(start..start + err.len),
            );
            content.to_string()
        }
    }
}
