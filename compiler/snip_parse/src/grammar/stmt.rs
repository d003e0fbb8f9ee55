//! Blocks and statements.

use snip_lexer::TokenKind;
use snip_stack::ensure_sufficient_stack;

use super::ty::predefined_type;
use crate::ast::{Block, Declarator, ExprId, ForInit, LocalDecl, Stmt, StmtKind};
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `'{' stmt* '}'`. Statement errors are reported and skipped.
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.report(e);
                    self.recover_statement();
                }
            }
        }
        if let Err(e) = self.expect(&TokenKind::RBrace) {
            self.report(e);
        }
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => {
                self.advance();
                let cond = self.parse_paren_condition()?;
                let body = Box::new(self.parse_statement()?);
                StmtKind::While { cond, body }
            }
            TokenKind::Do => {
                self.advance();
                let body = Box::new(self.parse_statement()?);
                self.expect(&TokenKind::While)?;
                let cond = self.parse_paren_condition()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::DoWhile { body, cond }
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Return(value)
            }
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Throw(value)
            }
            TokenKind::Break => {
                self.advance();
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Continue
            }
            _ if self.is_local_decl_start() => {
                let local = self.parse_local_decl()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Local(local)
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt {
            kind,
            span: self.span_from(start),
        })
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let cond = self.parse_paren_condition()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// `for (init; cond; step) body`
    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        self.expect(&TokenKind::LParen)?;

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if self.is_local_decl_start() {
            Some(ForInit::Local(self.parse_local_decl()?))
        } else {
            Some(ForInit::Exprs(self.parse_expr_list()?))
        };
        self.expect(&TokenKind::Semicolon)?;

        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let step = if self.check(&TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        self.expect(&TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(StmtKind::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn parse_paren_condition(&mut self) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        Ok(cond)
    }

    fn parse_expr_list(&mut self) -> Result<Vec<ExprId>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    /// Decide between a local declaration and an expression statement.
    fn is_local_decl_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Var | TokenKind::Void => true,
            kind if predefined_type(kind).is_some() => self.peek_kind(1) != &TokenKind::Dot,
            TokenKind::Ident(_) => self.named_type_then_ident(0),
            _ => false,
        }
    }

    /// `(type | 'var') IDENT ('=' expr)? (',' IDENT ('=' expr)?)*`
    fn parse_local_decl(&mut self) -> Result<LocalDecl, ParseError> {
        let ty = if self.eat(&TokenKind::Var) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let mut declarators = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let init = if self.eat(&TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            declarators.push(Declarator { name, init });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(LocalDecl { ty, declarators })
    }

    /// Skip past the next `;` at this nesting level, or up to an unmatched `}`.
    fn recover_statement(&mut self) {
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
}
