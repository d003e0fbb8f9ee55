//! Recursive descent parser for the snippet language.
//!
//! Produces a [`CompilationUnit`] with expressions stored in an arena.
//! Syntax errors are collected rather than fatal: the parser reports them,
//! resynchronizes at the next statement or member boundary, and keeps going.

pub mod ast;
mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use ast::{CompilationUnit, ExprArena};
use snip_diagnostic::{Diagnostics, ErrorCode};
use snip_ir::Span;
use snip_lexer::{Token, TokenKind};

/// Result of parsing one compilation unit.
#[derive(Debug)]
pub struct ParseOutput {
    pub unit: CompilationUnit,
    pub diagnostics: Diagnostics,
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    /// Create a parser over a token stream ending in `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> &'a TokenKind {
        self.cursor.peek_kind(n)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn check_ident(&self) -> bool {
        self.cursor.check_ident()
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    /// Consume the current token if it matches.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a required token, or fail with `X expected`.
    ///
    /// A missing closing delimiter at end of input is reported as unclosed.
    fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            return Ok(self.advance().span);
        }
        let closing = matches!(
            kind,
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket
        );
        let code = if closing && self.is_at_end() {
            ErrorCode::E1003
        } else {
            ErrorCode::E1001
        };
        Err(ParseError::new(
            code,
            format!("{} expected", kind.describe()),
            self.missing_token_span(),
        ))
    }

    /// Where to point when a token is missing: just after the previous one.
    fn missing_token_span(&self) -> Span {
        if self.cursor.position() == 0 {
            self.current_span()
        } else {
            Span::point(self.previous_span().end)
        }
    }

    /// Span from `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    fn report(&mut self, error: ParseError) {
        self.diagnostics.push(error.into_diagnostic());
    }

    /// Parse the whole token stream.
    pub fn parse_unit(mut self) -> ParseOutput {
        let (usings, classes) = self.parse_items();
        ParseOutput {
            unit: CompilationUnit {
                usings,
                classes,
                arena: self.arena,
            },
            diagnostics: self.diagnostics,
        }
    }
}

/// Parse tokens into a compilation unit.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> ParseOutput {
    if matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
        return Parser::new(tokens).parse_unit();
    }
    let end = tokens.last().map_or(0, |t| t.span.end);
    let mut owned = tokens.to_vec();
    owned.push(Token::new(TokenKind::Eof, Span::point(end)));
    Parser::new(&owned).parse_unit()
}

/// Lex and parse source text. Lexer diagnostics come first.
pub fn parse_source(source: &str) -> ParseOutput {
    let lexed = snip_lexer::lex(source);
    let mut output = parse(&lexed.tokens);
    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(output.diagnostics);
    output.diagnostics = diagnostics;
    output
}
