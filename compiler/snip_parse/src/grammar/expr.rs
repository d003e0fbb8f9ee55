//! Expression parsing.
//!
//! Precedence, lowest first: assignment, `?:`, `||`, `&&`, `|`, `^`, `&`,
//! equality, relational, shift, additive, multiplicative, unary, postfix.

use snip_diagnostic::ErrorCode;
use snip_ir::Span;
use snip_lexer::TokenKind;
use snip_stack::ensure_sufficient_stack;

use super::ty::predefined_type;
use crate::ast::{BinaryOp, Expr, ExprId, ExprKind, Literal, UnaryOp};
use crate::{ParseError, Parser};

/// Binary precedence levels, loosest first.
const BINARY_LEVELS: usize = 10;

impl Parser<'_> {
    /// Parse an expression, including assignment.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }

    fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        let target = self.parse_conditional()?;
        let op = match self.current_kind() {
            TokenKind::Eq => None,
            TokenKind::PlusEq => Some(BinaryOp::Add),
            TokenKind::MinusEq => Some(BinaryOp::Sub),
            TokenKind::StarEq => Some(BinaryOp::Mul),
            TokenKind::SlashEq => Some(BinaryOp::Div),
            TokenKind::PercentEq => Some(BinaryOp::Rem),
            TokenKind::AmpEq => Some(BinaryOp::BitAnd),
            TokenKind::PipeEq => Some(BinaryOp::BitOr),
            TokenKind::CaretEq => Some(BinaryOp::BitXor),
            TokenKind::ShlEq => Some(BinaryOp::Shl),
            TokenKind::ShrEq => Some(BinaryOp::Shr),
            _ => return Ok(target),
        };
        self.advance();
        let value = self.parse_expr()?;
        let span = self.span_of(target).merge(self.span_of(value));
        Ok(self.alloc(ExprKind::Assign { op, target, value }, span))
    }

    /// `cond ? a : b`, right associative.
    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let cond = self.parse_binary(0)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let else_expr = ensure_sufficient_stack(|| self.parse_conditional())?;
        let span = self.span_of(cond).merge(self.span_of(else_expr));
        Ok(self.alloc(
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            span,
        ))
    }

    /// Left-associative binary operators at `level` and tighter.
    fn parse_binary(&mut self, level: usize) -> Result<ExprId, ParseError> {
        if level == BINARY_LEVELS {
            return self.parse_unary();
        }
        let mut left = self.parse_binary(level + 1)?;
        while let Some(op) = self.match_binary_op(level) {
            self.advance();
            let right = self.parse_binary(level + 1)?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(ExprKind::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    fn match_binary_op(&self, level: usize) -> Option<BinaryOp> {
        let op = match self.current_kind() {
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::Shr => BinaryOp::Shr,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            _ => return None,
        };
        (binary_level(op) == level).then_some(op)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let op = match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(ExprKind::Unary { op, operand }, span));
        }

        if matches!(
            self.current_kind(),
            TokenKind::PlusPlus | TokenKind::MinusMinus
        ) {
            let increment = self.advance().kind == TokenKind::PlusPlus;
            let target = self.parse_unary()?;
            let span = start.merge(self.span_of(target));
            return Ok(self.alloc(
                ExprKind::IncDec {
                    target,
                    increment,
                    prefix: true,
                },
                span,
            ));
        }

        if self.is_cast() {
            self.advance();
            let ty = self.parse_type()?;
            self.expect(&TokenKind::RParen)?;
            let operand = self.parse_unary()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(ExprKind::Cast { ty, operand }, span));
        }

        self.parse_postfix()
    }

    /// `(` type-keyword `)`: casts are only recognized on predefined types.
    fn is_cast(&self) -> bool {
        self.check(&TokenKind::LParen)
            && predefined_type(self.peek_kind(1)).is_some()
            && self.peek_kind(2) == &TokenKind::RParen
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = self.span_of(expr);
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_ident()?;
                    let span = start.merge(name.span);
                    expr = self.alloc(
                        ExprKind::Member {
                            receiver: expr,
                            name,
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    let span = self.span_from(start);
                    expr = self.alloc(ExprKind::Call { callee: expr, args }, span);
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    let span = self.span_from(start);
                    expr = self.alloc(
                        ExprKind::Index {
                            receiver: expr,
                            index,
                        },
                        span,
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let increment = self.advance().kind == TokenKind::PlusPlus;
                    let span = self.span_from(start);
                    expr = self.alloc(
                        ExprKind::IncDec {
                            target: expr,
                            increment,
                            prefix: false,
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `'(' (expr (',' expr)*)? ')'`
    fn parse_args(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Int { value, long } => ExprKind::Literal(Literal::Int {
                value: *value,
                long: *long,
            }),
            TokenKind::Real { value, single } => ExprKind::Literal(Literal::Real {
                value: *value,
                single: *single,
            }),
            TokenKind::Str(s) => ExprKind::Literal(Literal::Str(s.clone())),
            TokenKind::Char(c) => ExprKind::Literal(Literal::Char(*c)),
            TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
            TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
            TokenKind::Null => ExprKind::Literal(Literal::Null),
            TokenKind::Ident(name) => ExprKind::Name(name.clone()),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::New => {
                self.advance();
                let ty = self.parse_type()?;
                let args = self.parse_args()?;
                let span = self.span_from(start);
                return Ok(self.alloc(ExprKind::New { ty, args }, span));
            }
            kind => match predefined_type(kind) {
                Some(predefined) if self.peek_kind(1) == &TokenKind::Dot => {
                    ExprKind::TypeKeyword(predefined)
                }
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::E1002,
                        format!("Invalid expression term '{}'", kind.describe()),
                        start,
                    ))
                }
            },
        };
        self.advance();
        Ok(self.alloc(kind, start))
    }
}

/// Binding level of a binary operator; `0` binds loosest.
fn binary_level(op: BinaryOp) -> usize {
    match op {
        BinaryOp::Or => 0,
        BinaryOp::And => 1,
        BinaryOp::BitOr => 2,
        BinaryOp::BitXor => 3,
        BinaryOp::BitAnd => 4,
        BinaryOp::Eq | BinaryOp::NotEq => 5,
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 6,
        BinaryOp::Shl | BinaryOp::Shr => 7,
        BinaryOp::Add | BinaryOp::Sub => 8,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 9,
    }
}
