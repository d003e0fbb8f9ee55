//! Cooked tokens handed to the parser.

use snip_ir::Span;
use std::fmt;

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal; `long` is set by an `L` suffix.
    Int { value: u64, long: bool },
    /// Real literal; `single` is set by an `f` suffix.
    Real { value: f64, single: bool },
    Str(String),
    Char(char),
    Ident(String),

    // Keywords
    Using,
    Class,
    Public,
    Private,
    Internal,
    Protected,
    Static,
    Void,
    Bool,
    Byte,
    Short,
    IntKw,
    Long,
    Float,
    Double,
    CharKw,
    String,
    Object,
    Var,
    If,
    Else,
    While,
    Do,
    For,
    Return,
    Throw,
    New,
    True,
    False,
    Null,
    Break,
    Continue,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Question,
    Colon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,

    Eof,
}

impl TokenKind {
    /// Whether this keyword names a predefined type (`int`, `string`, ...).
    pub fn is_predefined_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Bool
                | TokenKind::Byte
                | TokenKind::Short
                | TokenKind::IntKw
                | TokenKind::Long
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::CharKw
                | TokenKind::String
                | TokenKind::Object
        )
    }

    /// Whether this keyword is a member modifier.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Private
                | TokenKind::Internal
                | TokenKind::Protected
                | TokenKind::Static
        )
    }

    /// Source spelling, as used in `X expected` messages.
    pub fn describe(&self) -> String {
        let text = match self {
            TokenKind::Int { value, .. } => return value.to_string(),
            TokenKind::Real { value, .. } => return value.to_string(),
            TokenKind::Str(s) => return format!("\"{s}\""),
            TokenKind::Char(c) => return format!("'{c}'"),
            TokenKind::Ident(name) => return name.clone(),
            TokenKind::Using => "using",
            TokenKind::Class => "class",
            TokenKind::Public => "public",
            TokenKind::Private => "private",
            TokenKind::Internal => "internal",
            TokenKind::Protected => "protected",
            TokenKind::Static => "static",
            TokenKind::Void => "void",
            TokenKind::Bool => "bool",
            TokenKind::Byte => "byte",
            TokenKind::Short => "short",
            TokenKind::IntKw => "int",
            TokenKind::Long => "long",
            TokenKind::Float => "float",
            TokenKind::Double => "double",
            TokenKind::CharKw => "char",
            TokenKind::String => "string",
            TokenKind::Object => "object",
            TokenKind::Var => "var",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::Throw => "throw",
            TokenKind::New => "new",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::Eof => "end-of-file",
        };
        text.to_string()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_types() {
        assert!(TokenKind::IntKw.is_predefined_type());
        assert!(TokenKind::Object.is_predefined_type());
        assert!(!TokenKind::Void.is_predefined_type());
        assert!(!TokenKind::Var.is_predefined_type());
    }

    #[test]
    fn describe_spells_source() {
        assert_eq!(TokenKind::Semicolon.describe(), ";");
        assert_eq!(TokenKind::ShlEq.describe(), "<<=");
        assert_eq!(TokenKind::Ident("x".into()).describe(), "x");
        assert_eq!(TokenKind::Eof.to_string(), "end-of-file");
    }
}
