//! Type references.

use snip_diagnostic::ErrorCode;
use snip_lexer::TokenKind;

use crate::ast::{Ident, PredefinedType, TypeRef, TypeRefKind};
use crate::{ParseError, Parser};

/// Map a type keyword token to its predefined type.
pub(crate) fn predefined_type(kind: &TokenKind) -> Option<PredefinedType> {
    Some(match kind {
        TokenKind::Bool => PredefinedType::Bool,
        TokenKind::Byte => PredefinedType::Byte,
        TokenKind::Short => PredefinedType::Short,
        TokenKind::IntKw => PredefinedType::Int,
        TokenKind::Long => PredefinedType::Long,
        TokenKind::Float => PredefinedType::Float,
        TokenKind::Double => PredefinedType::Double,
        TokenKind::CharKw => PredefinedType::Char,
        TokenKind::String => PredefinedType::String,
        TokenKind::Object => PredefinedType::Object,
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parse a type: `void`, a type keyword, or a dotted name.
    pub(crate) fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let start = self.current_span();
        if self.eat(&TokenKind::Void) {
            return Ok(TypeRef {
                kind: TypeRefKind::Void,
                span: start,
            });
        }
        if let Some(predefined) = predefined_type(self.current_kind()) {
            self.advance();
            return Ok(TypeRef {
                kind: TypeRefKind::Predefined(predefined),
                span: start,
            });
        }
        if let TokenKind::Ident(name) = self.current_kind() {
            self.advance();
            let mut parts = vec![Ident::new(name.clone(), start)];
            while self.check(&TokenKind::Dot) && matches!(self.peek_kind(1), TokenKind::Ident(_)) {
                self.advance();
                parts.push(self.expect_ident()?);
            }
            return Ok(TypeRef {
                kind: TypeRefKind::Named(parts),
                span: self.span_from(start),
            });
        }
        Err(ParseError::new(ErrorCode::E1005, "Type expected", start))
    }

    /// Whether the tokens from `offset` on form a possibly dotted name
    /// followed by an identifier, as in `T x` or `A.B x`.
    pub(crate) fn named_type_then_ident(&self, offset: usize) -> bool {
        let mut i = offset;
        if !matches!(self.peek_kind(i), TokenKind::Ident(_)) {
            return false;
        }
        i += 1;
        while matches!(self.peek_kind(i), TokenKind::Dot)
            && matches!(self.peek_kind(i + 1), TokenKind::Ident(_))
        {
            i += 2;
        }
        matches!(self.peek_kind(i), TokenKind::Ident(_))
    }

    pub(crate) fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            return Ok(Ident::new(name.clone(), span));
        }
        Err(ParseError::new(
            ErrorCode::E1004,
            "Identifier expected",
            self.current_span(),
        ))
    }
}
