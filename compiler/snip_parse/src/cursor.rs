//! Token cursor for navigating the token stream.

use snip_ir::Span;
use snip_lexer::{Token, TokenKind};
use std::mem::discriminant;
use tracing::trace;

/// Cursor over a token slice whose last token is `Eof`.
///
/// Reads past the end stick to the final `Eof` token.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)),
            "token stream must end with Eof"
        );
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn last_index(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.last_index())]
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[(self.pos - 1).min(self.last_index())].span
        } else {
            Span::DUMMY
        }
    }

    /// Kind of the token `n` positions ahead (`0` is the current token).
    #[inline]
    pub fn peek_kind(&self, n: usize) -> &'a TokenKind {
        &self.tokens[(self.pos + n).min(self.last_index())].kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Whether the current token has the same kind as `kind` (payloads are
    /// ignored).
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        discriminant(self.current_kind()) == discriminant(kind)
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Consume the current token. `Eof` is never consumed.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            trace!(kind = ?token.kind, pos = self.pos, "advance");
            self.pos += 1;
        }
        token
    }
}
