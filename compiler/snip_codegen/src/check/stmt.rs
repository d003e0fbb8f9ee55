//! Statements, control flow and reachability.

use snip_diagnostic::ErrorCode;
use snip_ir::{Constant, Op, TypeTag};
use snip_parse::ast::{Block, ExprId, ExprKind, ForInit, Literal, LocalDecl, Stmt, StmtKind};
use snip_stack::ensure_sufficient_stack;

use super::{LoopContext, MethodChecker};
use crate::ty::Ty;

impl MethodChecker<'_> {
    /// A block opens a new scope.
    pub(super) fn check_block(&mut self, block: &Block) {
        self.scopes.push();
        for stmt in &block.stmts {
            self.check_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.check_stmt_inner(stmt));
    }

    fn check_stmt_inner(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Block(block) => self.check_block(block),
            StmtKind::Empty => {}
            StmtKind::Local(local) => self.check_local(local),
            StmtKind::Expr(expr) => self.check_expr_stmt(*expr),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.check_if(*cond, then_branch, else_branch.as_deref()),
            StmtKind::While { cond, body } => self.check_while(*cond, body),
            StmtKind::DoWhile { body, cond } => self.check_do_while(body, *cond),
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => self.check_for(init.as_ref(), *cond, step, body),
            StmtKind::Return(value) => self.check_return(*value, stmt),
            StmtKind::Throw(value) => self.check_throw(*value),
            StmtKind::Break => self.check_break(stmt),
            StmtKind::Continue => self.check_continue(stmt),
        }
    }

    fn check_local(&mut self, local: &LocalDecl) {
        let declared = match &local.ty {
            Some(ty) => match self.env.resolve_type(ty, &mut self.diagnostics) {
                Some(TypeTag::Void) => {
                    self.error(
                        ErrorCode::E2016,
                        "Keyword 'void' cannot be used in this context",
                        ty.span,
                    );
                    Some(TypeTag::Object)
                }
                Some(tag) => Some(tag),
                None => Some(TypeTag::Object),
            },
            None => None,
        };

        if declared.is_none() && local.declarators.len() > 1 {
            if let Some(second) = local.declarators.get(1) {
                self.error(
                    ErrorCode::E2016,
                    "Implicitly-typed variables cannot have multiple declarators",
                    second.name.span,
                );
            }
        }

        for declarator in &local.declarators {
            let name = &declarator.name;
            let ty = match (declared, declarator.init) {
                (Some(ty), Some(init)) => {
                    self.check_expr_as(init, ty);
                    ty
                }
                (Some(ty), None) => {
                    self.builder.constant(Constant::default_for(ty));
                    ty
                }
                (None, Some(init)) => {
                    let info = self.check_expr(init);
                    let span = self.expr(init).span;
                    match info.ty {
                        Ty::Tag(TypeTag::Void) => {
                            self.error(
                                ErrorCode::E2016,
                                "Cannot assign void to an implicitly-typed variable",
                                span,
                            );
                            TypeTag::Object
                        }
                        Ty::Null => {
                            self.error(
                                ErrorCode::E2016,
                                "Cannot assign <null> to an implicitly-typed variable",
                                span,
                            );
                            TypeTag::Object
                        }
                        Ty::Tag(tag) => tag,
                        Ty::Error => TypeTag::Object,
                    }
                }
                (None, None) => {
                    self.error(
                        ErrorCode::E2016,
                        "Implicitly-typed variables must be initialized",
                        name.span,
                    );
                    self.builder.constant(Constant::Null);
                    TypeTag::Object
                }
            };
            let slot = self.declare_local(&name.name, ty, name.span);
            self.builder.emit(Op::StoreLocal(slot));
        }
    }

    fn check_expr_stmt(&mut self, id: ExprId) {
        let expr = self.expr(id);
        let allowed = matches!(
            expr.kind,
            ExprKind::Assign { .. }
                | ExprKind::IncDec { .. }
                | ExprKind::Call { .. }
                | ExprKind::New { .. }
        );
        if !allowed {
            self.error(
                ErrorCode::E2018,
                "Only assignment, call, increment, decrement, and new object expressions can be used as a statement",
                expr.span,
            );
        }
        let info = self.check_expr(id);
        if info.ty != Ty::VOID {
            self.builder.emit(Op::Pop);
        }
    }

    fn check_if(&mut self, cond: ExprId, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        let start = self.reachable;
        self.check_expr_as(cond, TypeTag::Bool);
        let to_else = self.builder.emit_jump(Op::JumpIfFalse);

        self.scoped_stmt(then_branch);
        let then_end = self.reachable;

        match else_branch {
            Some(else_branch) => {
                let to_end = self.builder.emit_jump(Op::Jump);
                self.builder.patch_jump(to_else);
                self.reachable = start;
                self.scoped_stmt(else_branch);
                self.builder.patch_jump(to_end);
                self.reachable = then_end || self.reachable;
            }
            None => {
                self.builder.patch_jump(to_else);
                self.reachable = then_end || start;
            }
        }
    }

    /// The body of `if` and the loops gets its own scope even when it is a
    /// single statement.
    fn scoped_stmt(&mut self, stmt: &Stmt) {
        self.scopes.push();
        self.check_stmt(stmt);
        self.scopes.pop();
    }

    fn check_while(&mut self, cond: ExprId, body: &Stmt) {
        let start = self.reachable;
        let top = self.builder.here();
        self.check_expr_as(cond, TypeTag::Bool);
        let exit = self.builder.emit_jump(Op::JumpIfFalse);

        let ctx = self.check_loop_body(body);
        self.patch_continues(&ctx, top);
        let back = self.builder.emit_jump(Op::Jump);
        self.builder.patch_jump_to(back, top);
        self.builder.patch_jump(exit);
        self.patch_breaks(&ctx);

        self.reachable = (start && !self.is_true_literal(Some(cond))) || ctx.broke;
    }

    fn check_do_while(&mut self, body: &Stmt, cond: ExprId) {
        let start = self.reachable;
        let top = self.builder.here();
        let ctx = self.check_loop_body(body);

        let cond_at = self.builder.here();
        self.patch_continues(&ctx, cond_at);
        self.check_expr_as(cond, TypeTag::Bool);
        let back = self.builder.emit_jump(Op::JumpIfTrue);
        self.builder.patch_jump_to(back, top);
        self.patch_breaks(&ctx);

        self.reachable = (start && !self.is_true_literal(Some(cond))) || ctx.broke;
    }

    fn check_for(
        &mut self,
        init: Option<&ForInit>,
        cond: Option<ExprId>,
        step: &[ExprId],
        body: &Stmt,
    ) {
        let start = self.reachable;
        self.scopes.push();
        match init {
            Some(ForInit::Local(local)) => self.check_local(local),
            Some(ForInit::Exprs(exprs)) => {
                for &expr in exprs {
                    self.check_expr_stmt(expr);
                }
            }
            None => {}
        }

        let top = self.builder.here();
        let exit = cond.map(|cond| {
            self.check_expr_as(cond, TypeTag::Bool);
            self.builder.emit_jump(Op::JumpIfFalse)
        });

        let ctx = self.check_loop_body(body);
        let step_at = self.builder.here();
        self.patch_continues(&ctx, step_at);
        for &expr in step {
            self.check_expr_stmt(expr);
        }
        let back = self.builder.emit_jump(Op::Jump);
        self.builder.patch_jump_to(back, top);
        if let Some(exit) = exit {
            self.builder.patch_jump(exit);
        }
        self.patch_breaks(&ctx);
        self.scopes.pop();

        self.reachable = (start && !self.is_true_literal(cond)) || ctx.broke;
    }

    fn check_loop_body(&mut self, body: &Stmt) -> LoopContext {
        self.loops.push(LoopContext::default());
        self.scoped_stmt(body);
        self.loops.pop().unwrap_or_default()
    }

    fn patch_continues(&mut self, ctx: &LoopContext, target: u32) {
        for &jump in &ctx.continues {
            self.builder.patch_jump_to(jump, target);
        }
    }

    fn patch_breaks(&mut self, ctx: &LoopContext) {
        for &jump in &ctx.breaks {
            self.builder.patch_jump(jump);
        }
    }

    /// A missing condition or the literal `true` never ends a loop.
    fn is_true_literal(&self, cond: Option<ExprId>) -> bool {
        match cond {
            None => true,
            Some(id) => matches!(self.expr(id).kind, ExprKind::Literal(Literal::Bool(true))),
        }
    }

    fn check_return(&mut self, value: Option<ExprId>, stmt: &Stmt) {
        let return_type = self.method.return_type;
        match (value, return_type) {
            (Some(value), TypeTag::Void) => {
                let described = self.current_class().describe(self.method);
                self.error(
                    ErrorCode::E2015,
                    format!(
                        "Since '{described}' returns void, a return keyword must not be followed by an object expression"
                    ),
                    stmt.span,
                );
                self.check_expr(value);
            }
            (Some(value), ty) => {
                self.check_expr_as(value, ty);
                self.builder.emit(Op::Return);
            }
            (None, TypeTag::Void) => {
                self.builder.emit(Op::ReturnVoid);
            }
            (None, ty) => {
                self.error(
                    ErrorCode::E2015,
                    format!("An object of a type convertible to '{ty}' is required"),
                    stmt.span,
                );
            }
        }
        self.reachable = false;
    }

    fn check_throw(&mut self, value: ExprId) {
        let info = self.check_expr(value);
        let throwable = matches!(
            info.ty,
            Ty::Tag(TypeTag::Exception(_)) | Ty::Null | Ty::Error
        );
        if !throwable {
            self.error(
                ErrorCode::E2017,
                "The type caught or thrown must be derived from System.Exception",
                self.expr(value).span,
            );
        }
        self.builder.emit(Op::Throw);
        self.reachable = false;
    }

    fn check_break(&mut self, stmt: &Stmt) {
        let reachable = self.reachable;
        let jump = self.builder.emit_jump(Op::Jump);
        match self.loops.last_mut() {
            Some(ctx) => {
                ctx.breaks.push(jump);
                ctx.broke |= reachable;
            }
            None => self.report_no_loop(stmt),
        }
        self.reachable = false;
    }

    fn check_continue(&mut self, stmt: &Stmt) {
        let jump = self.builder.emit_jump(Op::Jump);
        match self.loops.last_mut() {
            Some(ctx) => ctx.continues.push(jump),
            None => self.report_no_loop(stmt),
        }
        self.reachable = false;
    }

    fn report_no_loop(&mut self, stmt: &Stmt) {
        self.error(
            ErrorCode::E2011,
            "No enclosing loop out of which to break or continue",
            stmt.span,
        );
    }
}
