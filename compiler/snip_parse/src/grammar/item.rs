//! Using directives, classes and class members.

use snip_diagnostic::ErrorCode;
use snip_lexer::TokenKind;
use tracing::trace;

use crate::ast::{ClassDecl, MethodDecl, Modifiers, Param, UsingDirective};
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `using* class* EOF`
    pub(crate) fn parse_items(&mut self) -> (Vec<UsingDirective>, Vec<ClassDecl>) {
        let mut usings = Vec::new();
        while self.check(&TokenKind::Using) {
            match self.parse_using() {
                Ok(using) => usings.push(using),
                Err(e) => {
                    self.report(e);
                    self.recover_member();
                }
            }
        }

        let mut classes = Vec::new();
        while !self.is_at_end() {
            match self.parse_class() {
                Ok(class) => classes.push(class),
                Err(e) => {
                    self.report(e);
                    self.recover_top_level();
                }
            }
        }
        (usings, classes)
    }

    fn parse_using(&mut self) -> Result<UsingDirective, ParseError> {
        let start = self.advance().span;
        let mut path = vec![self.expect_ident()?];
        while self.eat(&TokenKind::Dot) {
            path.push(self.expect_ident()?);
        }
        self.expect(&TokenKind::Semicolon)?;
        Ok(UsingDirective {
            path,
            span: self.span_from(start),
        })
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        loop {
            let flag = match self.current_kind() {
                TokenKind::Public => Modifiers::PUBLIC,
                TokenKind::Private => Modifiers::PRIVATE,
                TokenKind::Internal => Modifiers::INTERNAL,
                TokenKind::Protected => Modifiers::PROTECTED,
                TokenKind::Static => Modifiers::STATIC,
                _ => return modifiers,
            };
            self.advance();
            modifiers |= flag;
        }
    }

    fn parse_class(&mut self) -> Result<ClassDecl, ParseError> {
        let start = self.current_span();
        let modifiers = self.parse_modifiers();
        if !self.eat(&TokenKind::Class) {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "Type or namespace definition, or end-of-file expected",
                self.current_span(),
            ));
        }
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LBrace)?;

        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.parse_member() {
                Ok(method) => methods.push(method),
                Err(e) => {
                    self.report(e);
                    self.recover_member();
                }
            }
        }
        if let Err(e) = self.expect(&TokenKind::RBrace) {
            self.report(e);
        }

        trace!(class = %name.name, methods = methods.len(), "parsed class");
        Ok(ClassDecl {
            modifiers,
            name,
            methods,
            span: self.span_from(start),
        })
    }

    /// A class member. Only methods are accepted.
    fn parse_member(&mut self) -> Result<MethodDecl, ParseError> {
        let start = self.current_span();
        let modifiers = self.parse_modifiers();

        if self.check(&TokenKind::Class) {
            return Err(ParseError::new(
                ErrorCode::E1006,
                "Nested types are not supported",
                self.current_span(),
            ));
        }
        if self.check_ident() && self.peek_kind(1) == &TokenKind::LParen {
            return Err(ParseError::new(
                ErrorCode::E1006,
                "Constructors are not supported",
                self.current_span(),
            ));
        }

        let return_type = self.parse_type()?;
        let name = self.expect_ident()?;
        match self.current_kind() {
            TokenKind::LParen => {}
            TokenKind::Eq | TokenKind::Semicolon | TokenKind::Comma => {
                return Err(ParseError::new(
                    ErrorCode::E1007,
                    "Field declarations are not supported",
                    name.span,
                ));
            }
            TokenKind::LBrace => {
                return Err(ParseError::new(
                    ErrorCode::E1006,
                    "Properties are not supported",
                    name.span,
                ));
            }
            _ => {
                self.expect(&TokenKind::LParen)?;
            }
        }

        let params = self.parse_params()?;
        let body = self.parse_block()?;
        trace!(method = %name.name, params = params.len(), "parsed method");
        Ok(MethodDecl {
            modifiers,
            return_type,
            name,
            params,
            body,
            span: self.span_from(start),
        })
    }

    /// `'(' (type IDENT (',' type IDENT)*)? ')'`
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let ty = self.parse_type()?;
                let name = self.expect_ident()?;
                params.push(Param { ty, name });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// Skip to the end of the current member: past a `;` or a balanced
    /// `{ ... }`, stopping before an unmatched `}`.
    fn recover_member(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip to the next `class` keyword (or a modifier that starts one).
    fn recover_top_level(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.check(&TokenKind::Class) || self.current_kind().is_modifier() {
                return;
            }
            self.advance();
        }
    }
}
