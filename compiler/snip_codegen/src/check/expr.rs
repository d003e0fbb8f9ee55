//! Expressions.

use snip_diagnostic::ErrorCode;
use snip_ir::{Constant, Intrinsic, Op, Span, TypeTag};
use snip_parse::ast::{BinaryOp, ExprId, ExprKind, Ident, Literal, TypeRef, UnaryOp};
use snip_stack::ensure_sufficient_stack;

use super::{conversion_op, MethodChecker};
use crate::library::{self, StaticOwner};
use crate::scope::Local;
use crate::signatures::predefined_tag;
use crate::ty::{self, Conversion, ExprInfo, Ty};

const ASSIGN_TARGET: &str = "The left-hand side of an assignment must be a variable, property or indexer";
const INC_DEC_TARGET: &str =
    "The operand of an increment or decrement operator must be a variable, property or indexer";

impl MethodChecker<'_> {
    /// Check an expression and emit code leaving its value on the stack
    /// (nothing for `void`).
    pub(super) fn check_expr(&mut self, id: ExprId) -> ExprInfo {
        ensure_sufficient_stack(|| self.check_expr_inner(id))
    }

    fn check_expr_inner(&mut self, id: ExprId) -> ExprInfo {
        let expr = self.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(literal) => self.check_literal(literal, span),
            ExprKind::Name(name) => self.check_name(name, span),
            ExprKind::TypeKeyword(predefined) => {
                self.error(
                    ErrorCode::E2001,
                    format!(
                        "'{}' is a type, which is not valid in the given context",
                        predefined.keyword()
                    ),
                    span,
                );
                ExprInfo::ERROR
            }
            ExprKind::Member { receiver, name } => self.check_member(*receiver, name),
            ExprKind::Call { callee, args } => self.check_call(*callee, args),
            ExprKind::Index { receiver, index } => self.check_index(*receiver, *index),
            ExprKind::New { ty, args } => self.check_new(ty, args, span),
            ExprKind::Unary { op, operand } => self.check_unary(*op, *operand, span),
            ExprKind::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => self.check_logical(*op, *left, *right, span),
            ExprKind::Binary { op, left, right } => self.check_binary(*op, *left, *right, span),
            ExprKind::Assign { op, target, value } => self.check_assign(*op, *target, *value, span),
            ExprKind::IncDec {
                target,
                increment,
                prefix,
            } => self.check_inc_dec(*target, *increment, *prefix),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => self.check_conditional(*cond, *then_expr, *else_expr, span),
            ExprKind::Cast { ty, operand } => self.check_cast(ty, *operand),
            ExprKind::Error => ExprInfo::ERROR,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn check_literal(&mut self, literal: &Literal, span: Span) -> ExprInfo {
        let (constant, ty) = match literal {
            Literal::Int { value, long } => return self.int_literal(*value, *long, false, span),
            Literal::Real {
                value,
                single: true,
            } => (Constant::Single(*value as f32), Ty::Tag(TypeTag::Single)),
            Literal::Real {
                value,
                single: false,
            } => (Constant::Double(*value), Ty::Tag(TypeTag::Double)),
            Literal::Str(s) => (Constant::Str(s.clone()), Ty::STRING),
            Literal::Char(c) => (Constant::Char(*c), Ty::Tag(TypeTag::Char)),
            Literal::Bool(b) => (Constant::Bool(*b), Ty::BOOL),
            Literal::Null => (Constant::Null, Ty::Null),
        };
        self.builder.constant(constant);
        ExprInfo::of(ty)
    }

    /// An integer literal, negated when it is the operand of unary minus
    /// (so `-2147483648` is an `int`).
    fn int_literal(&mut self, value: u64, long: bool, negate: bool, span: Span) -> ExprInfo {
        let magnitude = i128::from(value);
        let signed = if negate { -magnitude } else { magnitude };
        if !long {
            if let Ok(n) = i32::try_from(signed) {
                self.builder.constant(Constant::Int32(n));
                return ExprInfo {
                    ty: Ty::INT,
                    constant: Some(i64::from(n)),
                };
            }
        }
        if let Ok(n) = i64::try_from(signed) {
            self.builder.constant(Constant::Int64(n));
            return ExprInfo::tag(TypeTag::Int64);
        }
        self.error(
            ErrorCode::E2003,
            format!("Constant value '{signed}' cannot be converted to a 'long'"),
            span,
        );
        ExprInfo::ERROR
    }

    fn check_name(&mut self, name: &str, span: Span) -> ExprInfo {
        if let Some(local) = self.scopes.lookup(name) {
            self.builder.emit(Op::LoadLocal(local.slot));
            return ExprInfo::tag(local.ty);
        }
        let message = if let Some((_, method)) = self.current_class().method(name) {
            let described = self.current_class().describe(method);
            format!("'{described}' is a method, which is not valid in the given context")
        } else if self.env.static_owner(name).is_some() {
            format!("'{name}' is a type, which is not valid in the given context")
        } else if name == "System" {
            "'System' is a namespace but is used like a variable".to_string()
        } else {
            format!("The name '{name}' does not exist in the current context")
        };
        self.error(ErrorCode::E2001, message, span);
        ExprInfo::ERROR
    }

    /// If `id` names a type or library class rather than a value, resolve
    /// it. Locals shadow type names.
    pub(super) fn static_receiver(&self, id: ExprId) -> Option<StaticOwner> {
        match &self.expr(id).kind {
            ExprKind::TypeKeyword(predefined) => Some(StaticOwner::Type(predefined_tag(*predefined))),
            ExprKind::Name(name) if self.scopes.lookup(name).is_none() => {
                self.env.static_owner(name)
            }
            ExprKind::Member { receiver, name } => match &self.expr(*receiver).kind {
                ExprKind::Name(namespace)
                    if namespace == "System"
                        && self.scopes.lookup(namespace).is_none()
                        && self.env.class_index(namespace).is_none() =>
                {
                    library::system_name(&name.name)
                }
                _ => None,
            },
            _ => None,
        }
    }

    pub(super) fn owner_display(&self, owner: StaticOwner) -> String {
        match owner {
            StaticOwner::Class(index) => self.env.classes[index].name.clone(),
            StaticOwner::Type(tag) => tag.display_name(),
            StaticOwner::Math => "Math".to_string(),
            StaticOwner::Convert => "Convert".to_string(),
            StaticOwner::Console => "Console".to_string(),
        }
    }

    pub(super) fn report_missing_member(&mut self, owner: &str, name: &Ident) {
        self.error(
            ErrorCode::E2007,
            format!(
                "'{owner}' does not contain a definition for '{}'",
                name.name
            ),
            name.span,
        );
    }

    fn report_method_group(&mut self, owner: &str, name: &Ident) {
        self.error(
            ErrorCode::E2001,
            format!(
                "'{owner}.{}' is a method, which is not valid in the given context",
                name.name
            ),
            name.span,
        );
    }

    pub(super) fn report_null_receiver(&mut self, span: Span) {
        self.error(
            ErrorCode::E2005,
            "Operator '.' cannot be applied to operand of type '<null>'",
            span,
        );
    }

    /// `receiver.name` used as a value.
    fn check_member(&mut self, receiver: ExprId, name: &Ident) -> ExprInfo {
        if let Some(owner) = self.static_receiver(receiver) {
            return self.check_static_member(owner, name);
        }
        let info = self.check_expr(receiver);
        match info.ty {
            Ty::Error => ExprInfo::ERROR,
            Ty::Null => {
                self.report_null_receiver(name.span);
                ExprInfo::ERROR
            }
            Ty::Tag(tag) => {
                if let Some((intrinsic, ty)) = library::instance_property(tag, &name.name) {
                    self.builder.emit(Op::Intrinsic(intrinsic));
                    return ExprInfo::tag(ty);
                }
                let owner = tag.display_name();
                if library::instance_methods(tag, &name.name).is_some() {
                    self.report_method_group(&owner, name);
                } else {
                    self.report_missing_member(&owner, name);
                }
                ExprInfo::ERROR
            }
        }
    }

    fn check_static_member(&mut self, owner: StaticOwner, name: &Ident) -> ExprInfo {
        if let Some((constant, ty)) = library::static_field(owner, &name.name) {
            self.builder.constant(constant);
            return ExprInfo::tag(ty);
        }
        let is_method = match owner {
            StaticOwner::Class(index) => self.env.classes[index].method(&name.name).is_some(),
            _ => library::static_methods(owner, &name.name).is_some(),
        };
        let display = self.owner_display(owner);
        if is_method {
            self.report_method_group(&display, name);
        } else {
            self.report_missing_member(&display, name);
        }
        ExprInfo::ERROR
    }

    /// `s[i]`: only strings are indexable.
    fn check_index(&mut self, receiver: ExprId, index: ExprId) -> ExprInfo {
        let info = self.check_expr(receiver);
        match info.ty {
            Ty::Error => {
                self.check_expr(index);
                ExprInfo::ERROR
            }
            Ty::Tag(TypeTag::String) => {
                self.check_expr_as(index, TypeTag::Int32);
                self.builder.emit(Op::Intrinsic(Intrinsic::StrCharAt));
                ExprInfo::tag(TypeTag::Char)
            }
            other => {
                self.error(
                    ErrorCode::E2005,
                    format!("Cannot apply indexing with [] to an expression of type '{other}'"),
                    self.expr(receiver).span,
                );
                ExprInfo::ERROR
            }
        }
    }

    /// `new E()` / `new E(message)`: only exception types are constructible.
    fn check_new(&mut self, ty: &TypeRef, args: &[ExprId], span: Span) -> ExprInfo {
        let Some(tag) = self.env.resolve_type(ty, &mut self.diagnostics) else {
            return ExprInfo::ERROR;
        };
        match (tag, args) {
            (TypeTag::Exception(kind), []) => {
                self.builder
                    .emit(Op::Intrinsic(Intrinsic::NewExceptionDefault(kind)));
                ExprInfo::tag(tag)
            }
            (TypeTag::Exception(kind), [message]) => {
                self.check_args(&[*message], &[TypeTag::String]);
                self.builder.emit(Op::Intrinsic(Intrinsic::NewException(kind)));
                ExprInfo::tag(tag)
            }
            _ => {
                self.error(
                    ErrorCode::E2008,
                    format!(
                        "'{tag}' does not contain a constructor that takes {} arguments",
                        args.len()
                    ),
                    span,
                );
                ExprInfo::ERROR
            }
        }
    }

    fn check_unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> ExprInfo {
        if op == UnaryOp::Neg {
            if let ExprKind::Literal(Literal::Int { value, long }) = self.expr(operand).kind {
                return self.int_literal(value, long, true, span);
            }
        }

        let info = self.check_expr(operand);
        let tag = match info.ty {
            Ty::Error => return ExprInfo::ERROR,
            Ty::Tag(tag) => Some(tag),
            Ty::Null => None,
        };
        let result = tag.and_then(|tag| match op {
            UnaryOp::Neg | UnaryOp::Plus => ty::unary_promotion(tag),
            UnaryOp::Not => (tag == TypeTag::Bool).then_some(TypeTag::Bool),
            UnaryOp::BitNot if ty::is_integral_like(tag) => ty::unary_promotion(tag),
            UnaryOp::BitNot => None,
        });
        let (Some(tag), Some(result)) = (tag, result) else {
            self.error(
                ErrorCode::E2005,
                format!(
                    "Operator '{}' cannot be applied to operand of type '{}'",
                    op.symbol(),
                    info.ty
                ),
                span,
            );
            return ExprInfo::ERROR;
        };

        match op {
            UnaryOp::Neg => {
                self.builder.emit(Op::Neg);
            }
            UnaryOp::Plus => {
                if result != tag {
                    self.builder.emit(Op::Convert(result));
                }
            }
            UnaryOp::Not => {
                self.builder.emit(Op::Not);
            }
            UnaryOp::BitNot => {
                self.builder.emit(Op::BitNot);
            }
        }
        ExprInfo {
            ty: Ty::Tag(result),
            constant: if op == UnaryOp::Plus { info.constant } else { None },
        }
    }

    fn report_binary(&mut self, op: BinaryOp, left: Ty, right: Ty, span: Span) {
        self.error(
            ErrorCode::E2005,
            format!(
                "Operator '{}' cannot be applied to operands of type '{left}' and '{right}'",
                op.symbol()
            ),
            span,
        );
    }

    fn check_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, span: Span) -> ExprInfo {
        let l = self.check_expr(left);
        let r = self.check_expr(right);
        if l.ty.is_error() || r.ty.is_error() {
            return ExprInfo::ERROR;
        }
        match ty::binary(op, l.ty, r.ty) {
            Some((result, instruction)) => {
                self.builder.emit(instruction);
                ExprInfo::tag(result)
            }
            None => {
                self.report_binary(op, l.ty, r.ty, span);
                ExprInfo::ERROR
            }
        }
    }

    /// `&&` / `||`: the right operand runs only when the left one does not
    /// decide the result.
    fn check_logical(&mut self, op: BinaryOp, left: ExprId, right: ExprId, span: Span) -> ExprInfo {
        let l = self.check_expr(left);
        self.builder.emit(Op::Dup);
        let short_circuit = if op == BinaryOp::And {
            self.builder.emit_jump(Op::JumpIfFalse)
        } else {
            self.builder.emit_jump(Op::JumpIfTrue)
        };
        self.builder.emit(Op::Pop);
        let r = self.check_expr(right);
        self.builder.patch_jump(short_circuit);

        if l.ty.is_error() || r.ty.is_error() {
            return ExprInfo::ERROR;
        }
        if l.ty == Ty::BOOL && r.ty == Ty::BOOL {
            ExprInfo::of(Ty::BOOL)
        } else {
            self.report_binary(op, l.ty, r.ty, span);
            ExprInfo::ERROR
        }
    }

    /// Resolve an assignment or increment target; only locals and
    /// parameters are assignable.
    fn assignable_local(&mut self, target: ExprId, message: &str) -> Option<Local> {
        let expr = self.expr(target);
        if let ExprKind::Name(name) = &expr.kind {
            if let Some(local) = self.scopes.lookup(name) {
                return Some(local);
            }
            if self.current_class().method(name).is_none() && self.env.static_owner(name).is_none()
            {
                self.error(
                    ErrorCode::E2001,
                    format!("The name '{name}' does not exist in the current context"),
                    expr.span,
                );
                return None;
            }
        }
        self.error(ErrorCode::E2014, message, expr.span);
        None
    }

    fn check_assign(
        &mut self,
        op: Option<BinaryOp>,
        target: ExprId,
        value: ExprId,
        span: Span,
    ) -> ExprInfo {
        let Some(local) = self.assignable_local(target, ASSIGN_TARGET) else {
            return ExprInfo::ERROR;
        };

        match op {
            None => self.check_expr_as(value, local.ty),
            Some(op) => {
                self.builder.emit(Op::LoadLocal(local.slot));
                let r = self.check_expr(value);
                if r.ty.is_error() {
                    return ExprInfo::ERROR;
                }
                let Some((result, instruction)) = ty::binary(op, Ty::Tag(local.ty), r.ty) else {
                    self.report_binary(op, Ty::Tag(local.ty), r.ty, span);
                    return ExprInfo::ERROR;
                };
                self.builder.emit(instruction);

                // `x op= y` narrows back to the type of `x` when `y` itself
                // converts to it.
                let result_info = ExprInfo::tag(result);
                let conversion = ty::implicit(result_info, local.ty);
                if conversion.is_valid() {
                    self.emit_conversion(conversion, local.ty);
                } else if ty::explicit(result_info, local.ty) == Conversion::Numeric
                    && (ty::implicit(r, local.ty).is_valid()
                        || matches!(op, BinaryOp::Shl | BinaryOp::Shr))
                {
                    self.builder.emit(Op::Convert(local.ty));
                } else {
                    self.report_conversion(result_info, local.ty, span);
                    return ExprInfo::ERROR;
                }
            }
        }

        self.builder.emit(Op::Dup);
        self.builder.emit(Op::StoreLocal(local.slot));
        ExprInfo::tag(local.ty)
    }

    /// `x++`, `--x`: the value is the old one for postfix, the new one for
    /// prefix.
    fn check_inc_dec(&mut self, target: ExprId, increment: bool, prefix: bool) -> ExprInfo {
        let Some(local) = self.assignable_local(target, INC_DEC_TARGET) else {
            return ExprInfo::ERROR;
        };
        let promoted = if ty::is_arithmetic(local.ty) {
            ty::binary_promotion(local.ty, TypeTag::Int32)
        } else {
            None
        };
        let Some(promoted) = promoted else {
            self.error(
                ErrorCode::E2005,
                format!(
                    "Operator '{}' cannot be applied to operand of type '{}'",
                    if increment { "++" } else { "--" },
                    local.ty
                ),
                self.expr(target).span,
            );
            return ExprInfo::ERROR;
        };

        self.builder.emit(Op::LoadLocal(local.slot));
        if !prefix {
            self.builder.emit(Op::Dup);
        }
        self.builder.constant(Constant::Int32(1));
        self.builder
            .emit(if increment { Op::Add } else { Op::Sub });
        if promoted != local.ty {
            self.builder.emit(Op::Convert(local.ty));
        }
        if prefix {
            self.builder.emit(Op::Dup);
        }
        self.builder.emit(Op::StoreLocal(local.slot));
        ExprInfo::tag(local.ty)
    }

    /// `c ? a : b`. Each branch ends in a placeholder that becomes the
    /// conversion to the common type once both branch types are known.
    fn check_conditional(
        &mut self,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        span: Span,
    ) -> ExprInfo {
        self.check_expr_as(cond, TypeTag::Bool);
        let to_else = self.builder.emit_jump(Op::JumpIfFalse);
        let a = self.check_expr(then_expr);
        let a_fix = self.builder.emit(Op::Nop);
        let to_end = self.builder.emit_jump(Op::Jump);
        self.builder.patch_jump(to_else);
        let b = self.check_expr(else_expr);
        let b_fix = self.builder.emit(Op::Nop);
        self.builder.patch_jump(to_end);

        if a.ty.is_error() || b.ty.is_error() {
            return ExprInfo::ERROR;
        }
        if a.ty == b.ty {
            return ExprInfo::of(a.ty);
        }

        let a_to_b = branch_conversion(a.ty, b.ty);
        let b_to_a = branch_conversion(b.ty, a.ty);
        match (a_to_b, b_to_a) {
            (Some((conversion, target)), None) => {
                self.builder.replace(a_fix, conversion_op(conversion, target));
                ExprInfo::of(b.ty)
            }
            (None, Some((conversion, target))) => {
                self.builder.replace(b_fix, conversion_op(conversion, target));
                ExprInfo::of(a.ty)
            }
            _ => {
                self.error(
                    ErrorCode::E2003,
                    format!(
                        "Type of conditional expression cannot be determined because there is no implicit conversion between '{}' and '{}'",
                        a.ty, b.ty
                    ),
                    span,
                );
                ExprInfo::ERROR
            }
        }
    }

    fn check_cast(&mut self, ty: &TypeRef, operand: ExprId) -> ExprInfo {
        let target = self.env.resolve_type(ty, &mut self.diagnostics);
        let info = self.check_expr(operand);
        let Some(target) = target else {
            return ExprInfo::ERROR;
        };
        if info.ty.is_error() {
            return ExprInfo::ERROR;
        }
        let span = ty.span.merge(self.expr(operand).span);

        let conversion = ty::explicit(info, target);
        if !conversion.is_valid() {
            self.error(
                ErrorCode::E2004,
                format!("Cannot convert type '{}' to '{target}'", info.ty),
                span,
            );
            return ExprInfo::ERROR;
        }
        if let Some(value) = info.constant {
            if conversion == Conversion::Numeric && !constant_in_range(value, target) {
                self.error(
                    ErrorCode::E2004,
                    format!(
                        "Constant value '{value}' cannot be converted to a '{target}' (use 'unchecked' syntax to override)"
                    ),
                    span,
                );
                return ExprInfo::ERROR;
            }
        }
        self.emit_conversion(conversion, target);
        let constant = if target == TypeTag::Int32 { info.constant } else { None };
        ExprInfo {
            ty: Ty::Tag(target),
            constant,
        }
    }
}

/// Conversion from one branch type of `?:` to the other. Constant values
/// are ignored, so `c ? 1 : b` with a `byte` b is an `int`.
fn branch_conversion(from: Ty, to: Ty) -> Option<(Conversion, TypeTag)> {
    let target = to.tag()?;
    let conversion = ty::implicit(ExprInfo::of(from), target);
    conversion.is_valid().then_some((conversion, target))
}

/// Whether an `int` constant survives a cast to an integral type.
fn constant_in_range(value: i64, target: TypeTag) -> bool {
    match target {
        TypeTag::Byte => u8::try_from(value).is_ok(),
        TypeTag::Int16 => i16::try_from(value).is_ok(),
        TypeTag::Char => u16::try_from(value).is_ok(),
        _ => true,
    }
}
